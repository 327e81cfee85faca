//! Runtime configuration, read from environment variables.
//!
//! | Variable          | Default      | Meaning                              |
//! |-------------------|--------------|--------------------------------------|
//! | `FLASHCARDS_DB`   | `db.sqlite3` | SQLite database file                 |
//! | `FLASHCARDS_LOG`  | `info`       | default log filter (`RUST_LOG` wins) |
//! | `FLASHCARDS_SEED` | `true`       | add sample cards to an empty store   |
//!
//! Scheduling constants are part of the algorithm and are not configurable.

use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "FLASHCARDS_DB";
pub const LOG_FILTER_VAR: &str = "FLASHCARDS_LOG";
pub const SEED_VAR: &str = "FLASHCARDS_SEED";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub log_filter: String,
    /// Initial window size in points
    pub window_size: [f32; 2],
    pub seed_sample_cards: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("db.sqlite3"),
            log_filter: "info".to_string(),
            window_size: [520.0, 720.0],
            seed_sample_cards: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Unset or blank
    /// variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            database_path: get(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            log_filter: get(LOG_FILTER_VAR).unwrap_or(defaults.log_filter),
            window_size: defaults.window_size,
            seed_sample_cards: get(SEED_VAR)
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(defaults.seed_sample_cards),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (DB_PATH_VAR, "/tmp/cards.sqlite3"),
            (LOG_FILTER_VAR, "debug"),
            (SEED_VAR, "off"),
        ]));

        assert_eq!(config.database_path, PathBuf::from("/tmp/cards.sqlite3"));
        assert_eq!(config.log_filter, "debug");
        assert!(!config.seed_sample_cards);
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[(DB_PATH_VAR, "  "), (SEED_VAR, "")]));
        assert_eq!(config.database_path, PathBuf::from("db.sqlite3"));
        assert!(config.seed_sample_cards);
    }

    #[test]
    fn test_seed_flag_values() {
        for (value, expected) in [("1", true), ("yes", true), ("FALSE", false), ("0", false)] {
            let config = AppConfig::from_lookup(lookup_from(&[(SEED_VAR, value)]));
            assert_eq!(config.seed_sample_cards, expected, "value {value:?}");
        }
    }
}
