//! User preferences persisted alongside the cards.
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub dark_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!settings.dark_mode);
    }

    #[test]
    fn test_stored_shape() {
        let json = serde_json::to_string(&Settings { dark_mode: true }).unwrap();
        assert_eq!(json, r#"{"darkMode":true}"#);
    }
}
