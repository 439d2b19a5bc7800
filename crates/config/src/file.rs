//! Config file parsing.
//!
//! The raw shapes mirror the JSON file as-is; all values stay optional
//! until [`crate::validate`] turns them into a checked [`crate::Config`].
//! Unknown keys are tolerated with a warning so a newer config file does
//! not break an older CLI.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::{ConfigError, docs};

/// One device entry as written in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDevice {
    pub id: Option<String>,
    pub os_version: Option<String>,
    pub os_theme: Option<String>,
    pub os_locale: Option<String>,
    pub font_scale: Option<String>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

/// The config file as parsed, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub token: Option<String>,
    pub android: Option<String>,
    pub ios: Option<String>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub devices: Option<Vec<RawDevice>>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

/// Reads and parses a config file, warning about unsupported keys.
pub fn load_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: RawConfig =
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    for key in config.unknown.keys() {
        warn!(
            property = %key,
            learn_more = docs::CONFIG_PROPERTIES,
            "unsupported config property"
        );
    }
    for device in config.devices.iter().flatten() {
        for key in device.unknown.keys() {
            warn!(
                property = %key,
                learn_more = docs::CONFIG_DEVICES,
                "unsupported device property (supported: `id`, `osVersion`, `osLocale`, `osTheme`, `fontScale`)"
            );
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("glance.config.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn parses_full_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "token": "abc",
                "android": "build/app.apk",
                "ios": "build/Demo.app",
                "include": ["Button"],
                "devices": [
                    {"id": "pixel.8", "osVersion": "14", "osTheme": "dark", "osLocale": "en_US"}
                ]
            }"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.android.as_deref(), Some("build/app.apk"));
        assert_eq!(config.include.as_deref(), Some(&["Button".to_string()][..]));
        let devices = config.devices.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].id.as_deref(), Some("pixel.8"));
        assert_eq!(devices[0].os_theme.as_deref(), Some("dark"));
    }

    #[test]
    fn unknown_keys_survive_parsing() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"token": "abc", "devices": [{"id": "pixel.8", "osVersion": "14", "rotation": "landscape"}], "theme": "x"}"#,
        );

        let config = load_config(&path).unwrap();
        assert!(config.unknown.contains_key("theme"));
        let devices = config.devices.unwrap();
        assert!(devices[0].unknown.contains_key("rotation"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "{not json");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
