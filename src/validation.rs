// src/validation.rs
//
// Inbound arrêt bodies, after renaming to internal names.

use serde_json::Value;

use crate::{
    dates::{self, DISPLAY_FORMAT},
    error::{ApiError, FieldErrors},
    models::{ArretFields, ArretWrite},
    normalizer::{AliasTable, Field, Record, Scalar},
};

/// Older clients send these instead of `date_start`/`date_end`.
const LEGACY_DATE_KEYS: &[(&str, &str)] = &[("debutArret", "date_start"), ("finArret", "date_end")];

const DATE_FIELDS: &[&str] = &[
    "date_start",
    "date_end",
    "date_end_init",
    "date_declaration",
    "date_deb_droit",
    "date_deb_dr_force",
    "date_prolongation",
    "date_naissance",
    "indemnisation_from_line",
    "indemnisation_to_line",
];

fn external<'a>(aliases: &'a AliasTable, internal: &'a str) -> &'a str {
    aliases.resolve(internal).unwrap_or(internal)
}

/// Moves legacy keys onto their current names. If both are present the
/// later key wins, as in renaming.
fn fold_legacy_keys(record: &Record) -> Record {
    record
        .iter()
        .map(|(key, value)| {
            let target = LEGACY_DATE_KEYS
                .iter()
                .find_map(|&(legacy, current)| (legacy == key).then_some(current))
                .unwrap_or(key);
            (target.to_owned(), value.clone())
        })
        .collect()
}

/// Rewrites every known date to `YYYY-MM-DD` (empty strings become null)
/// and reports the ones that do not parse.
fn normalize_dates(record: &mut Record, aliases: &AliasTable, errors: &mut FieldErrors) {
    for &key in DATE_FIELDS {
        let normalized = match record.get(key) {
            None => continue,
            Some(f) if f.is_null() => continue,
            Some(Field::Scalar(Scalar::String(s))) if s.trim().is_empty() => Field::Scalar(Scalar::Null),
            Some(Field::Scalar(Scalar::String(s))) => match dates::parse_date(s) {
                Ok(d) => Field::from(d.to_string().as_str()),
                Err(_) => {
                    errors.insert(external(aliases, key).to_owned(), "must be a valid date".into());
                    continue;
                }
            },
            Some(_) => {
                errors.insert(external(aliases, key).to_owned(), "must be a date string".into());
                continue;
            }
        };
        record.insert(key, normalized);
    }
}

/// Turns an internal-named body into typed fields. `aliases` is the
/// internal → external table, used to name fields in error details.
pub fn parse_fields(record: Record, aliases: &AliasTable) -> Result<ArretFields, ApiError> {
    let mut record = fold_legacy_keys(&record);
    let mut errors = FieldErrors::new();
    normalize_dates(&mut record, aliases, &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    serde_json::from_value(Value::from(record)).map_err(|e| ApiError::BadRequest(format!("invalid arrêt: {e}")))
}

/// Checks a complete set of fields and derives the day count.
pub fn validate(fields: ArretFields, aliases: &AliasTable) -> Result<ArretWrite, ApiError> {
    let mut errors = FieldErrors::new();
    let mut required = |key: &str| {
        errors.insert(external(aliases, key).to_owned(), "is required".into());
    };

    let adherent_number = fields.adherent_number.as_deref().map(str::trim).filter(|s| !s.is_empty());
    if adherent_number.is_none() {
        required("adherent_number");
    }
    if fields.date_start.is_none() {
        required("date_start");
    }
    if fields.date_end.is_none() {
        required("date_end");
    }

    let (Some(adherent_number), Some(start), Some(end)) = (adherent_number, fields.date_start, fields.date_end) else {
        return Err(ApiError::Validation(errors));
    };

    if end < start {
        let shown = dates::format_date(start, DISPLAY_FORMAT);
        errors.insert(external(aliases, "date_end").to_owned(), format!("must not be before {shown}"));
        return Err(ApiError::Validation(errors));
    }

    let arret_diff = dates::day_span(start, end, 1)
        .and_then(|days| i32::try_from(days).ok())
        .ok_or_else(|| {
            errors.insert(external(aliases, "date_end").to_owned(), "period is too long".into());
            ApiError::Validation(errors)
        })?;

    Ok(ArretWrite {
        adherent_number: adherent_number.to_owned(),
        date_start: start,
        date_end: end,
        arret_diff,
        fields,
    })
}
