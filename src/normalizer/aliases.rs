// src/normalizer/aliases.rs

use std::collections::HashMap;

/// Version of [`ARRET_FIELD_ALIASES`]. Bump when an external name changes.
pub const ARRET_ALIASES_VERSION: u32 = 2;

/// Internal column name → external JSON name for arrêt records.
pub const ARRET_FIELD_ALIASES: &[(&str, &str)] = &[
    ("debutArret", "debut-arret"),
    ("finArret", "fin-arret"),
    ("date_end_init", "arret-to-line-init"),
    ("date_start", "arret-from-line"),
    ("date_end", "arret-to-line"),
    ("date_declaration", "declaration-date-line"),
    ("DT_excused", "dt-line"),
    ("date_deb_droit", "date-effet"),
    ("code_pathologie", "code-pathologie-line"),
    ("date_deb_dr_force", "date-effet-forced"),
    ("date_prolongation", "prolongation-date-line"),
    ("date_naissance", "birth_date"),
    ("adherent_number", "adherent-number"),
    ("indemnisation_from_line", "indemnisation-from-line"),
    ("indemnisation_to_line", "indemnisation-to-line"),
    ("taux_line", "taux-line"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AliasTableError {
    #[error("field '{0}' is aliased more than once")]
    DuplicateSourceKey(String),
    #[error("fields '{first}' and '{second}' both map to '{target}'")]
    DuplicateTargetKey { first: String, second: String, target: String },
}

/// Immutable old-name → new-name mapping used by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    version: u32,
    entries: HashMap<String, String>,
}

impl AliasTable {
    /// Builds a table, refusing pairs that would make renaming lossy.
    pub fn from_pairs<K, V>(version: u32, pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, AliasTableError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = HashMap::new();
        let mut targets: HashMap<String, String> = HashMap::new();
        for (from, to) in pairs {
            let (from, to) = (from.into(), to.into());
            if entries.contains_key(&from) {
                return Err(AliasTableError::DuplicateSourceKey(from));
            }
            if let Some(first) = targets.get(&to) {
                return Err(AliasTableError::DuplicateTargetKey {
                    first: first.clone(),
                    second: from,
                    target: to,
                });
            }
            targets.insert(to.clone(), from.clone());
            entries.insert(from, to);
        }
        Ok(Self { version, entries })
    }

    /// The arrêt table, internal → external.
    pub fn arrets() -> Result<Self, AliasTableError> {
        Self::from_pairs(ARRET_ALIASES_VERSION, ARRET_FIELD_ALIASES.iter().copied())
    }

    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Swaps direction (external → internal). Targets are unique, so the
    /// result is a valid table of the same size.
    pub fn inverse(&self) -> Self {
        Self {
            version: self.version,
            entries: self.entries.iter().map(|(k, v)| (v.clone(), k.clone())).collect(),
        }
    }
}
