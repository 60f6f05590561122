// src/routes/arrets.rs

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use sqlx::{query, query_as};
use tracing::Level;

use crate::{
    error::ApiError,
    logging,
    middleware::JsonBody,
    models::{Arret, ArretFields, ArretWrite, Deleted},
    normalizer::{format_for_output, rename_keys, AliasTable, Record},
    response::ApiOk,
    validation, AppState,
};

#[derive(Deserialize)]
pub struct ListQ {
    pub adherent_number: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Boundary conversion
// ─────────────────────────────────────────────────────────────────────────────

fn to_external(rows: &[Arret], aliases: &AliasTable) -> Result<Vec<Record>, ApiError> {
    let renamed = rows
        .iter()
        .map(|row| {
            let value = serde_json::to_value(row).map_err(|e| ApiError::BadRequest(format!("cannot encode arrêt: {e}")))?;
            let record = Record::try_from(value).map_err(|e| ApiError::BadRequest(format!("cannot encode arrêt: {e}")))?;
            Ok(rename_keys(&record, aliases))
        })
        .collect::<Result<Vec<_>, ApiError>>()?;
    Ok(format_for_output(&renamed))
}

fn one_external(row: Arret, aliases: &AliasTable) -> Result<ApiOk<Record>, ApiError> {
    let mut out = to_external(std::slice::from_ref(&row), aliases)?;
    out.pop()
        .map(ApiOk)
        .ok_or_else(|| ApiError::BadRequest("cannot encode arrêt".into()))
}

fn inbound_fields(state: &AppState, body: &Record) -> Result<ArretFields, ApiError> {
    validation::parse_fields(rename_keys(body, &state.inbound), &state.aliases)
}

fn missing(id: i64) -> ApiError {
    ApiError::NotFound(format!("arrêt {id} not found"))
}

async fn find(state: &AppState, id: i64) -> Result<Arret, ApiError> {
    query_as::<_, Arret>(r#"SELECT * FROM public.arrets WHERE id = $1"#)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| missing(id))
}

/// Lays a partial body over the stored row and revalidates the result,
/// recomputing the day count.
fn merge_update(existing: &Arret, patch: ArretFields, aliases: &AliasTable) -> Result<ArretWrite, ApiError> {
    validation::validate(ArretFields::from_row(existing).merged_with(patch), aliases)
}

fn deleted(rows_affected: u64, id: i64) -> Result<Deleted, ApiError> {
    if rows_affected == 0 {
        return Err(missing(id));
    }
    Ok(Deleted { deleted: true })
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/arrets
pub async fn list_arrets(
    State(state): State<AppState>,
    Query(q): Query<ListQ>,
) -> Result<ApiOk<Vec<Record>>, ApiError> {
    let limit = q.limit.unwrap_or(50).clamp(1, 500);
    let offset = q.offset.unwrap_or(0).max(0);

    let rows = if let Some(number) = q.adherent_number {
        query_as::<_, Arret>(
            r#"SELECT * FROM public.arrets
               WHERE adherent_number = $1
               ORDER BY date_start, id
               LIMIT $2 OFFSET $3"#,
        )
        .bind(number)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?
    } else {
        query_as::<_, Arret>(
            r#"SELECT * FROM public.arrets ORDER BY date_start, id LIMIT $1 OFFSET $2"#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?
    };

    Ok(ApiOk(to_external(&rows, &state.aliases)?))
}

/// GET /api/arrets/:id
pub async fn get_arret(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiOk<Record>, ApiError> {
    let row = find(&state, id).await?;
    one_external(row, &state.aliases)
}

/// POST /api/arrets
pub async fn create_arret(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Record>,
) -> Result<ApiOk<Record>, ApiError> {
    let write = validation::validate(inbound_fields(&state, &body)?, &state.aliases)?;
    let f = &write.fields;

    let row = query_as::<_, Arret>(
        r#"
        INSERT INTO public.arrets
            (adherent_number, date_start, date_end, date_end_init, date_declaration,
             dt_excused, date_deb_droit, date_deb_dr_force, code_pathologie,
             date_prolongation, date_naissance, indemnisation_from_line,
             indemnisation_to_line, taux_line, is_rechute, arret_diff)
        VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16)
        RETURNING *
        "#,
    )
    .bind(&write.adherent_number)
    .bind(write.date_start)
    .bind(write.date_end)
    .bind(f.date_end_init)
    .bind(f.date_declaration)
    .bind(f.dt_excused.unwrap_or(false))
    .bind(f.date_deb_droit)
    .bind(f.date_deb_dr_force)
    .bind(&f.code_pathologie)
    .bind(f.date_prolongation)
    .bind(f.date_naissance)
    .bind(f.indemnisation_from_line)
    .bind(f.indemnisation_to_line)
    .bind(f.taux_line)
    .bind(f.is_rechute.unwrap_or(false))
    .bind(write.arret_diff)
    .fetch_one(&state.pool)
    .await?;

    logging::log(
        Level::INFO,
        &["arrets", "create"],
        format!("arret {} saved for adherent {} ({} days)", row.id, row.adherent_number, row.arret_diff),
    );
    one_external(row, &state.aliases)
}

/// PUT|PATCH /api/arrets/:id. Absent fields keep their stored value.
pub async fn update_arret(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(body): JsonBody<Record>,
) -> Result<ApiOk<Record>, ApiError> {
    let patch = inbound_fields(&state, &body)?;
    let existing = find(&state, id).await?;
    let ArretWrite { adherent_number, date_start, date_end, arret_diff, fields: f } =
        merge_update(&existing, patch, &state.aliases)?;

    let row = query_as::<_, Arret>(
        r#"
        UPDATE public.arrets SET
            adherent_number = $2,
            date_start = $3,
            date_end = $4,
            date_end_init = $5,
            date_declaration = $6,
            dt_excused = $7,
            date_deb_droit = $8,
            date_deb_dr_force = $9,
            code_pathologie = $10,
            date_prolongation = $11,
            date_naissance = $12,
            indemnisation_from_line = $13,
            indemnisation_to_line = $14,
            taux_line = $15,
            is_rechute = $16,
            arret_diff = $17,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(adherent_number)
    .bind(date_start)
    .bind(date_end)
    .bind(f.date_end_init)
    .bind(f.date_declaration)
    .bind(f.dt_excused.unwrap_or(false))
    .bind(f.date_deb_droit)
    .bind(f.date_deb_dr_force)
    .bind(f.code_pathologie)
    .bind(f.date_prolongation)
    .bind(f.date_naissance)
    .bind(f.indemnisation_from_line)
    .bind(f.indemnisation_to_line)
    .bind(f.taux_line)
    .bind(f.is_rechute.unwrap_or(false))
    .bind(arret_diff)
    .fetch_one(&state.pool)
    .await?;

    logging::log(Level::INFO, &["arrets", "update"], format!("arret {id} updated"));
    one_external(row, &state.aliases)
}

/// DELETE /api/arrets/:id
pub async fn delete_arret(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiOk<Deleted>, ApiError> {
    let res = query(r#"DELETE FROM public.arrets WHERE id = $1"#)
        .bind(id)
        .execute(&state.pool)
        .await?;
    let out = deleted(res.rows_affected(), id)?;
    logging::log(Level::INFO, &["arrets", "delete"], format!("arret {id} deleted"));
    Ok(ApiOk(out))
}
