use serde::{Deserialize, Serialize};

/// Editor-wide settings, provided by the host page.
/// Every field is optional in JSON and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Duration of tweens created without one, in ms (default: 200).
    pub default_tween_ms: f64,
    /// Maximum level forwarded to the console logger (default: info).
    pub log_level: log::Level,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_tween_ms: crate::extensions::tween::DEFAULT_TOTAL_TIME,
            log_level: log::Level::Info,
        }
    }
}

impl EditorConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.default_tween_ms, 200.0);
        assert_eq!(config.log_level, log::Level::Info);
    }

    #[test]
    fn parses_overrides() {
        let json = r#"{ "default_tween_ms": 350, "log_level": "DEBUG" }"#;
        let config = EditorConfig::from_json(json).unwrap();
        assert_eq!(config.default_tween_ms, 350.0);
        assert_eq!(config.log_level, log::Level::Debug);
    }

    #[test]
    fn rejects_bad_types() {
        assert!(EditorConfig::from_json(r#"{ "default_tween_ms": "slow" }"#).is_err());
    }
}
