use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::adapters::Options;

/// Per-adapter default options plus the adapter used when none is named
///
/// ```json
/// {
///   "default_adapter": "tomtom",
///   "adapters": {
///     "tomtom": { "key": "my-key", "qps_limit": 5 },
///     "google": { "client_id": "gme-client", "key": "c2lnbmluZy1rZXk=" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Adapter used when a call does not name one
    pub default_adapter: Option<String>,
    /// Default options keyed by adapter name
    pub adapters: HashMap<String, Options>,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Configured options for `adapter` overlaid with call-site `overrides`
    pub fn merged_options(&self, adapter: &str, overrides: Options) -> Options {
        match self.adapters.get(adapter) {
            Some(base) => merge(base, overrides),
            None => overrides,
        }
    }
}

/// Shallow merge; keys in `overrides` win
pub fn merge(base: &Options, overrides: Options) -> Options {
    let mut merged = base.clone();
    merged.extend(overrides);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn options(value: serde_json::Value) -> Options {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("options must be an object"),
        }
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base = options(json!({"key": "lol-key", "qps_limit": 5}));
        let merged = merge(&base, options(json!({"key": "sad-key"})));

        assert_eq!(merged, options(json!({"key": "sad-key", "qps_limit": 5})));
    }

    #[test]
    fn test_merge_is_shallow() {
        let base = options(json!({"nested": {"a": 1, "b": 2}}));
        let merged = merge(&base, options(json!({"nested": {"a": 3}})));

        assert_eq!(merged["nested"], json!({"a": 3}));
    }

    #[test]
    fn test_merged_options_without_config() {
        let config = Config::default();
        let merged = config.merged_options("tomtom", options(json!({"key": "k"})));
        assert_eq!(merged, options(json!({"key": "k"})));
    }

    #[test]
    fn test_load_config_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("geoloco.json");
        fs::write(
            &path,
            r#"{
                "default_adapter": "tomtom",
                "adapters": {"tomtom": {"key": "lol-key", "qps_limit": 2}}
            }"#,
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.default_adapter.as_deref(), Some("tomtom"));
        assert_eq!(config.adapters["tomtom"]["key"], "lol-key");
        assert_eq!(config.adapters["tomtom"]["qps_limit"], 2);

        Ok(())
    }

    #[test]
    fn test_load_partial_config_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("geoloco.json");
        fs::write(&path, r#"{"adapters": {}}"#)?;

        assert_eq!(Config::load(&path)?, Config::default());

        Ok(())
    }

    #[test]
    fn test_load_reports_the_path() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("missing.json");

        let err = Config::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.json"));

        fs::write(&path, "not json")?;
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));

        Ok(())
    }
}
