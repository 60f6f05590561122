// src/models/mod.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ───────────────────────────────────────
// Arrêts (leave periods)
// ───────────────────────────────────────
// Serialized with internal names; the normalizer maps them to the external
// contract on the way out.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Arret {
    pub id: i64,
    pub adherent_number: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub date_end_init: Option<NaiveDate>,
    pub date_declaration: Option<NaiveDate>,
    #[serde(rename = "DT_excused")]
    pub dt_excused: bool,
    pub date_deb_droit: Option<NaiveDate>,
    pub date_deb_dr_force: Option<NaiveDate>,
    pub code_pathologie: Option<String>,
    pub date_prolongation: Option<NaiveDate>,
    pub date_naissance: Option<NaiveDate>,
    pub indemnisation_from_line: Option<NaiveDate>,
    pub indemnisation_to_line: Option<NaiveDate>,
    pub taux_line: Option<i32>,
    pub is_rechute: bool,
    pub arret_diff: i32,                 // inclusive day count, derived
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable part of an arrêt, internal names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArretFields {
    pub adherent_number: Option<String>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub date_end_init: Option<NaiveDate>,
    pub date_declaration: Option<NaiveDate>,
    #[serde(rename = "DT_excused")]
    pub dt_excused: Option<bool>,
    pub date_deb_droit: Option<NaiveDate>,
    pub date_deb_dr_force: Option<NaiveDate>,
    pub code_pathologie: Option<String>,
    pub date_prolongation: Option<NaiveDate>,
    pub date_naissance: Option<NaiveDate>,
    pub indemnisation_from_line: Option<NaiveDate>,
    pub indemnisation_to_line: Option<NaiveDate>,
    pub taux_line: Option<i32>,
    pub is_rechute: Option<bool>,
}

impl ArretFields {
    /// Fields of an existing row, for merging a partial update onto it.
    pub fn from_row(row: &Arret) -> Self {
        Self {
            adherent_number: Some(row.adherent_number.clone()),
            date_start: Some(row.date_start),
            date_end: Some(row.date_end),
            date_end_init: row.date_end_init,
            date_declaration: row.date_declaration,
            dt_excused: Some(row.dt_excused),
            date_deb_droit: row.date_deb_droit,
            date_deb_dr_force: row.date_deb_dr_force,
            code_pathologie: row.code_pathologie.clone(),
            date_prolongation: row.date_prolongation,
            date_naissance: row.date_naissance,
            indemnisation_from_line: row.indemnisation_from_line,
            indemnisation_to_line: row.indemnisation_to_line,
            taux_line: row.taux_line,
            is_rechute: Some(row.is_rechute),
        }
    }

    /// Values in `patch` win; everything it leaves out is kept.
    pub fn merged_with(self, patch: ArretFields) -> Self {
        Self {
            adherent_number: patch.adherent_number.or(self.adherent_number),
            date_start: patch.date_start.or(self.date_start),
            date_end: patch.date_end.or(self.date_end),
            date_end_init: patch.date_end_init.or(self.date_end_init),
            date_declaration: patch.date_declaration.or(self.date_declaration),
            dt_excused: patch.dt_excused.or(self.dt_excused),
            date_deb_droit: patch.date_deb_droit.or(self.date_deb_droit),
            date_deb_dr_force: patch.date_deb_dr_force.or(self.date_deb_dr_force),
            code_pathologie: patch.code_pathologie.or(self.code_pathologie),
            date_prolongation: patch.date_prolongation.or(self.date_prolongation),
            date_naissance: patch.date_naissance.or(self.date_naissance),
            indemnisation_from_line: patch.indemnisation_from_line.or(self.indemnisation_from_line),
            indemnisation_to_line: patch.indemnisation_to_line.or(self.indemnisation_to_line),
            taux_line: patch.taux_line.or(self.taux_line),
            is_rechute: patch.is_rechute.or(self.is_rechute),
        }
    }
}

/// A validated arrêt ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ArretWrite {
    pub adherent_number: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub arret_diff: i32,
    pub fields: ArretFields,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted { pub deleted: bool }
