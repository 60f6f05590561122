// src/config.rs

use std::env;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set (environment or .env file)")]
    Missing(&'static str),
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            port: parse_or(&get, "PORT", 8080)?,
            max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10)?,
            cors_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|s| parse_origins(&s))
                .unwrap_or_default(),
            run_migrations: parse_bool_or(&get, "RUN_MIGRATIONS", true)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
        None => Ok(default),
    }
}

fn parse_bool_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match get(key).as_deref().map(str::trim) {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::Invalid { key, value: other.to_owned() }),
    }
}

// "*" anywhere in the list allows every origin
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();
    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let cfg = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/arrets")])).unwrap();
        assert_eq!(
            cfg,
            Config {
                database_url: "postgres://localhost/arrets".into(),
                port: 8080,
                max_connections: 10,
                cors_origins: vec![],
                run_migrations: true,
            }
        );
    }

    #[test]
    fn database_url_is_required() {
        assert_eq!(Config::from_lookup(lookup(&[])).unwrap_err(), ConfigError::Missing("DATABASE_URL"));
        assert_eq!(
            Config::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/arrets"),
            ("PORT", "9000"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("RUN_MIGRATIONS", "off"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.max_connections, 4);
        assert_eq!(cfg.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert!(!cfg.run_migrations);
    }

    #[test]
    fn wildcard_origin_means_any() {
        let cfg = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/arrets"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example,*"),
        ]))
        .unwrap();
        assert!(cfg.cors_origins.is_empty());
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "x"), ("PORT", "eighty")])).unwrap_err();
        assert_eq!(err, ConfigError::Invalid { key: "PORT", value: "eighty".into() });
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "x"), ("RUN_MIGRATIONS", "maybe")])).unwrap_err();
        assert_eq!(err, ConfigError::Invalid { key: "RUN_MIGRATIONS", value: "maybe".into() });
    }
}
