//! Config validation.
//!
//! Turns a [`RawConfig`] plus CLI flag overrides into a checked
//! [`Config`]. Every failure is a [`ConfigError`] with a documentation
//! link; nothing here talks to the network.

use std::path::{Path, PathBuf};

use glance_api::{Platform, token_parts};
use glance_resolve::RunIntent;

use crate::devices::{catalog, device_platform};
use crate::file::{RawConfig, RawDevice};
use crate::ConfigError;

const DEFAULT_LOCALE: &str = "en_US";
const DEFAULT_THEME: &str = "light";

/// A validated device entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    pub os_version: String,
    pub os_locale: String,
    pub os_theme: String,
    pub font_scale: Option<String>,
}

/// Validated invocation configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    pub android: Option<PathBuf>,
    pub ios: Option<PathBuf>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub devices: Vec<Device>,
}

impl Config {
    /// Platforms covered by the configured devices, Android first.
    pub fn platforms_to_test(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|&platform| {
                self.devices
                    .iter()
                    .any(|d| device_platform(&d.id) == Some(platform))
            })
            .collect()
    }

    /// Build path configured for a platform, if any.
    pub fn path_for(&self, platform: Platform) -> Option<&PathBuf> {
        match platform {
            Platform::Android => self.android.as_ref(),
            Platform::Ios => self.ios.as_ref(),
        }
    }
}

/// CLI flag values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub android: Option<PathBuf>,
    pub ios: Option<PathBuf>,
}

/// Platforms the given intent will actually test.
pub fn platforms_for_intent(config: &Config, intent: &RunIntent) -> Vec<Platform> {
    match intent {
        RunIntent::CloudBuild { platform, .. } => vec![*platform],
        _ => config.platforms_to_test(),
    }
}

/// Validates the raw config against the intent's requirements.
pub fn validated_config(
    raw: RawConfig,
    overrides: Overrides,
    project_root: &Path,
    intent: &RunIntent,
) -> Result<Config, ConfigError> {
    let token = overrides
        .token
        .clone()
        .or_else(|| raw.token.clone())
        .ok_or(ConfigError::MissingToken)?;
    token_parts(&token).map_err(|_| ConfigError::InvalidToken)?;

    let devices = validate_devices(raw.devices.clone())?;

    let (android, ios) = build_paths(&raw, &overrides, project_root, intent);

    let config = Config {
        token,
        android,
        ios,
        include: raw.include,
        exclude: raw.exclude,
        devices,
    };

    validate_platform_paths(&config, intent)?;

    Ok(config)
}

fn build_paths(
    raw: &RawConfig,
    overrides: &Overrides,
    project_root: &Path,
    intent: &RunIntent,
) -> (Option<PathBuf>, Option<PathBuf>) {
    if let RunIntent::CloudBuild {
        platform,
        build_path,
    } = intent
    {
        let path = Some(resolve_path(project_root, build_path));
        return match platform {
            Platform::Android => (path, None),
            Platform::Ios => (None, path),
        };
    }

    let android = overrides
        .android
        .clone()
        .or_else(|| raw.android.as_deref().map(PathBuf::from))
        .map(|p| resolve_path(project_root, &p));
    let ios = overrides
        .ios
        .clone()
        .or_else(|| raw.ios.as_deref().map(PathBuf::from))
        .map(|p| resolve_path(project_root, &p));
    (android, ios)
}

fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

fn validate_devices(devices: Option<Vec<RawDevice>>) -> Result<Vec<Device>, ConfigError> {
    let devices = devices.ok_or(ConfigError::MissingDevices)?;
    if devices.is_empty() {
        return Err(ConfigError::EmptyDevices);
    }

    devices
        .into_iter()
        .map(|device| {
            let (Some(id), Some(os_version)) = (device.id, device.os_version) else {
                return Err(ConfigError::RequiredDeviceProps);
            };

            let spec = catalog()
                .get(&id)
                .ok_or_else(|| ConfigError::UnknownDeviceId(id.clone()))?;

            if !spec.os_versions.contains(&os_version) {
                return Err(ConfigError::UnsupportedOsVersion { id, os_version });
            }

            let os_locale = device.os_locale.unwrap_or_else(|| DEFAULT_LOCALE.into());
            if !is_valid_locale(&os_locale) {
                return Err(ConfigError::InvalidLocale(os_locale));
            }

            let os_theme = device.os_theme.unwrap_or_else(|| DEFAULT_THEME.into());
            if os_theme != "light" && os_theme != "dark" {
                return Err(ConfigError::InvalidTheme(os_theme));
            }

            Ok(Device {
                id,
                os_version,
                os_locale,
                os_theme,
                font_scale: device.font_scale,
            })
        })
        .collect()
}

/// Locale must look like `xx_XX` (e.g. `en_US`).
fn is_valid_locale(locale: &str) -> bool {
    let bytes = locale.as_bytes();
    bytes.len() == 5
        && bytes[0].is_ascii_lowercase()
        && bytes[1].is_ascii_lowercase()
        && bytes[2] == b'_'
        && bytes[3].is_ascii_uppercase()
        && bytes[4].is_ascii_uppercase()
}

fn validate_platform_paths(config: &Config, intent: &RunIntent) -> Result<(), ConfigError> {
    let policy = intent.policy();

    for platform in platforms_for_intent(config, intent) {
        let Some(path) = config.path_for(platform) else {
            if policy.requires_platform_paths {
                return Err(ConfigError::MissingPlatformPath(platform));
            }
            continue;
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (valid, expected) = match platform {
            Platform::Android => (name.ends_with(".apk"), "a `.apk` file"),
            Platform::Ios => (
                name.ends_with(".app") || name.ends_with(".tar") || name.ends_with(".tar.gz"),
                "a `.app` directory, `.tar`, or `.tar.gz` archive",
            ),
        };
        if !valid {
            return Err(ConfigError::InvalidPlatformPath {
                platform,
                path: path.to_string_lossy().into_owned(),
                expected,
            });
        }

        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                platform,
                path: path.to_string_lossy().into_owned(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid_token() -> String {
        format!("{}{}1", "a".repeat(40), "b".repeat(16))
    }

    fn raw_device(id: &str, os_version: &str) -> RawDevice {
        RawDevice {
            id: Some(id.into()),
            os_version: Some(os_version.into()),
            ..Default::default()
        }
    }

    fn raw_config(devices: Vec<RawDevice>) -> RawConfig {
        RawConfig {
            token: Some(valid_token()),
            devices: Some(devices),
            ..Default::default()
        }
    }

    fn make_apk(dir: &Path) -> PathBuf {
        let path = dir.join("app.apk");
        std::fs::write(&path, b"apk").unwrap();
        path
    }

    #[test]
    fn accepts_valid_config() {
        let dir = TempDir::new().unwrap();
        let apk = make_apk(dir.path());

        let mut raw = raw_config(vec![raw_device("pixel.8", "14")]);
        raw.android = Some(apk.to_string_lossy().into_owned());

        let config = validated_config(
            raw,
            Overrides::default(),
            dir.path(),
            &RunIntent::Standard,
        )
        .unwrap();
        assert_eq!(config.platforms_to_test(), vec![Platform::Android]);
        assert_eq!(config.devices[0].os_locale, DEFAULT_LOCALE);
        assert_eq!(config.devices[0].os_theme, DEFAULT_THEME);
    }

    #[test]
    fn missing_token_is_config_error() {
        let dir = TempDir::new().unwrap();
        let mut raw = raw_config(vec![raw_device("pixel.8", "14")]);
        raw.token = None;

        let err = validated_config(
            raw,
            Overrides::default(),
            dir.path(),
            &RunIntent::LiveUpdate,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn token_flag_beats_config_file() {
        let dir = TempDir::new().unwrap();
        let mut raw = raw_config(vec![raw_device("pixel.8", "14")]);
        raw.token = Some("garbage".into());

        let overrides = Overrides {
            token: Some(valid_token()),
            ..Default::default()
        };
        let config =
            validated_config(raw, overrides, dir.path(), &RunIntent::LiveUpdate).unwrap();
        assert_eq!(config.token, valid_token());
    }

    #[test]
    fn malformed_token_rejected() {
        let dir = TempDir::new().unwrap();
        let mut raw = raw_config(vec![raw_device("pixel.8", "14")]);
        raw.token = Some("not-a-real-token".into());

        let err = validated_config(
            raw,
            Overrides::default(),
            dir.path(),
            &RunIntent::LiveUpdate,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidToken));
    }

    #[test]
    fn unknown_device_id_named_in_error() {
        let dir = TempDir::new().unwrap();
        let raw = raw_config(vec![raw_device("unknown.device", "9")]);

        let err = validated_config(
            raw,
            Overrides::default(),
            dir.path(),
            &RunIntent::LiveUpdate,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDeviceId(id) if id == "unknown.device"));
    }

    #[test]
    fn unsupported_os_version_rejected() {
        let dir = TempDir::new().unwrap();
        let raw = raw_config(vec![raw_device("pixel.8", "9")]);

        let err = validated_config(
            raw,
            Overrides::default(),
            dir.path(),
            &RunIntent::LiveUpdate,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedOsVersion { id, os_version } if id == "pixel.8" && os_version == "9"
        ));
    }

    #[test]
    fn device_without_id_rejected() {
        let dir = TempDir::new().unwrap();
        let raw = raw_config(vec![RawDevice {
            os_version: Some("14".into()),
            ..Default::default()
        }]);

        let err = validated_config(
            raw,
            Overrides::default(),
            dir.path(),
            &RunIntent::LiveUpdate,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::RequiredDeviceProps));
    }

    #[test]
    fn invalid_locale_rejected() {
        let dir = TempDir::new().unwrap();
        let mut device = raw_device("pixel.8", "14");
        device.os_locale = Some("english".into());
        let raw = raw_config(vec![device]);

        let err = validated_config(
            raw,
            Overrides::default(),
            dir.path(),
            &RunIntent::LiveUpdate,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLocale(l) if l == "english"));
    }

    #[test]
    fn invalid_theme_rejected() {
        let dir = TempDir::new().unwrap();
        let mut device = raw_device("pixel.8", "14");
        device.os_theme = Some("midnight".into());
        let raw = raw_config(vec![device]);

        let err = validated_config(
            raw,
            Overrides::default(),
            dir.path(),
            &RunIntent::LiveUpdate,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTheme(t) if t == "midnight"));
    }

    #[test]
    fn standard_run_requires_path_for_tested_platform() {
        let dir = TempDir::new().unwrap();
        let raw = raw_config(vec![raw_device("pixel.8", "14")]);

        let err = validated_config(
            raw,
            Overrides::default(),
            dir.path(),
            &RunIntent::Standard,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingPlatformPath(Platform::Android)
        ));
    }

    #[test]
    fn live_update_tolerates_missing_paths() {
        let dir = TempDir::new().unwrap();
        let raw = raw_config(vec![raw_device("pixel.8", "14")]);

        assert!(
            validated_config(
                raw,
                Overrides::default(),
                dir.path(),
                &RunIntent::LiveUpdate,
            )
            .is_ok()
        );
    }

    #[test]
    fn wrong_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.aab");
        std::fs::write(&path, b"x").unwrap();

        let mut raw = raw_config(vec![raw_device("pixel.8", "14")]);
        raw.android = Some(path.to_string_lossy().into_owned());

        let err = validated_config(
            raw,
            Overrides::default(),
            dir.path(),
            &RunIntent::Standard,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPlatformPath { .. }));
    }

    #[test]
    fn nonexistent_path_rejected() {
        let dir = TempDir::new().unwrap();
        let mut raw = raw_config(vec![raw_device("pixel.8", "14")]);
        raw.android = Some("missing/app.apk".into());

        let err = validated_config(
            raw,
            Overrides::default(),
            dir.path(),
            &RunIntent::Standard,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::PathNotFound { .. }));
    }

    #[test]
    fn cloud_build_tests_only_its_platform() {
        let dir = TempDir::new().unwrap();
        let apk = make_apk(dir.path());

        let raw = raw_config(vec![
            raw_device("pixel.8", "14"),
            raw_device("iphone.15", "17.5"),
        ]);
        let intent = RunIntent::CloudBuild {
            platform: Platform::Android,
            build_path: apk,
        };

        let config =
            validated_config(raw, Overrides::default(), dir.path(), &intent).unwrap();
        assert_eq!(platforms_for_intent(&config, &intent), vec![Platform::Android]);
        assert!(config.android.is_some());
        assert!(config.ios.is_none());
    }

    #[test]
    fn relative_paths_resolve_against_project_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("build")).unwrap();
        std::fs::write(dir.path().join("build/app.apk"), b"apk").unwrap();

        let mut raw = raw_config(vec![raw_device("pixel.8", "14")]);
        raw.android = Some("build/app.apk".into());

        let config = validated_config(
            raw,
            Overrides::default(),
            dir.path(),
            &RunIntent::Standard,
        )
        .unwrap();
        assert_eq!(config.android.unwrap(), dir.path().join("build/app.apk"));
    }
}
