//! Configuration: the `glance.config.json` file, its validation, and the
//! static device catalog.

use std::path::PathBuf;

use glance_api::Platform;

pub mod devices;
pub mod file;
pub mod validate;

pub use devices::{DeviceSpec, catalog, device_platform};
pub use file::{RawConfig, RawDevice, load_config};
pub use validate::{Config, Device, Overrides, platforms_for_intent, validated_config};

/// Default config file name, relative to the project root.
pub const DEFAULT_CONFIG_PATH: &str = "glance.config.json";

/// Documentation links attached to configuration errors.
pub mod docs {
    pub const CONFIG: &str = "https://docs.useglance.dev/getting-started/config";
    pub const CONFIG_PROPERTIES: &str =
        "https://docs.useglance.dev/getting-started/config#properties";
    pub const CONFIG_TOKEN: &str = "https://docs.useglance.dev/getting-started/config#token";
    pub const CONFIG_ANDROID: &str = "https://docs.useglance.dev/getting-started/config#android";
    pub const CONFIG_IOS: &str = "https://docs.useglance.dev/getting-started/config#ios";
    pub const CONFIG_DEVICES: &str = "https://docs.useglance.dev/getting-started/config#devices";
    pub const DEVICES: &str = "https://docs.useglance.dev/devices";
    pub const BUILDS: &str = "https://docs.useglance.dev/getting-started/builds";
}

/// User-fixable configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "required property `token` is missing; pass it with `--token` or add it to the config file"
    )]
    MissingToken,

    #[error(
        "invalid `token` value; make sure you copied it correctly or generate a new one in the Glance web app"
    )]
    InvalidToken,

    #[error("missing required `devices` in config file")]
    MissingDevices,

    #[error("config property `devices` must be a non-empty array")]
    EmptyDevices,

    #[error("each device in config must have required string properties `id` and `osVersion`")]
    RequiredDeviceProps,

    #[error("unknown device id in config: \"{0}\"")]
    UnknownDeviceId(String),

    #[error("unsupported OS version \"{os_version}\" for device \"{id}\" in config")]
    UnsupportedOsVersion { id: String, os_version: String },

    #[error("invalid device locale \"{0}\" in config; expected format xx_XX (example: en_US)")]
    InvalidLocale(String),

    #[error("invalid device theme \"{0}\" in config; expected \"light\" or \"dark\"")]
    InvalidTheme(String),

    #[error(
        "path to the {0} build is not provided, despite at least one {0} testing device being defined"
    )]
    MissingPlatformPath(Platform),

    #[error("invalid {platform} build path \"{path}\": expected {expected}")]
    InvalidPlatformPath {
        platform: Platform,
        path: String,
        expected: &'static str,
    },

    #[error("{platform} build path \"{path}\" does not exist")]
    PathNotFound { platform: Platform, path: String },
}

impl ConfigError {
    /// "Learn more" link rendered under the error message.
    pub fn docs_link(&self) -> Option<&'static str> {
        match self {
            ConfigError::Io { .. } | ConfigError::Parse { .. } => Some(docs::CONFIG),
            ConfigError::MissingToken | ConfigError::InvalidToken => Some(docs::CONFIG_TOKEN),
            ConfigError::MissingDevices
            | ConfigError::EmptyDevices
            | ConfigError::RequiredDeviceProps
            | ConfigError::InvalidLocale(_)
            | ConfigError::InvalidTheme(_) => Some(docs::CONFIG_DEVICES),
            ConfigError::UnknownDeviceId(_) | ConfigError::UnsupportedOsVersion { .. } => {
                Some(docs::DEVICES)
            }
            ConfigError::MissingPlatformPath(platform)
            | ConfigError::InvalidPlatformPath { platform, .. }
            | ConfigError::PathNotFound { platform, .. } => Some(match platform {
                Platform::Android => docs::CONFIG_ANDROID,
                Platform::Ios => docs::CONFIG_IOS,
            }),
        }
    }
}
