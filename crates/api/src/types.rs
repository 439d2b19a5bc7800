//! Wire types for the Glance registry API.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mobile platform under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Android, Platform::Ios];

    /// Human-facing label used in log and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A pair of optional per-platform values.
///
/// Most registry payloads carry data keyed by platform where either side
/// may be absent (only the platforms under test are populated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerPlatform<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios: Option<T>,
}

impl<T> Default for PerPlatform<T> {
    fn default() -> Self {
        Self {
            android: None,
            ios: None,
        }
    }
}

impl<T> PerPlatform<T> {
    pub fn get(&self, platform: Platform) -> Option<&T> {
        match platform {
            Platform::Android => self.android.as_ref(),
            Platform::Ios => self.ios.as_ref(),
        }
    }

    pub fn set(&mut self, platform: Platform, value: T) {
        match platform {
            Platform::Android => self.android = Some(value),
            Platform::Ios => self.ios = Some(value),
        }
    }

    pub fn take(&mut self, platform: Platform) -> Option<T> {
        match platform {
            Platform::Android => self.android.take(),
            Platform::Ios => self.ios.take(),
        }
    }

    /// Maps both sides by reference.
    pub fn map_ref<U>(&self, mut f: impl FnMut(&T) -> U) -> PerPlatform<U> {
        PerPlatform {
            android: self.android.as_ref().map(&mut f),
            ios: self.ios.as_ref().map(&mut f),
        }
    }
}

/// Registry-side knowledge about one platform binary.
///
/// All fields are optional on the wire: `upload_url` is present only when
/// an upload is required, `previous_run_index`/`created_at` only when the
/// binary can be reused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteBinaryInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_development_build: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_run_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Binary-reuse rule applied by the registry when matching hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryReuseMode {
    /// Reuse only a byte-identical, previously uploaded binary.
    #[serde(rename = "requireHashMatch")]
    RequireHashMatch,
    /// Reuse a hash match, or fall back to the latest development build.
    #[serde(rename = "requireHashMatchOrLatestDev")]
    RequireHashMatchOrLatestDev,
}

/// Request body for the batched binary-info query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRunInfoRequest {
    pub binary_hashes: PerPlatform<String>,
    pub platforms: Vec<Platform>,
    pub team_id: String,
    pub project_index: u32,
    pub binary_reuse_mode: BinaryReuseMode,
}

/// Response of the batched binary-info query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextRunInfo {
    pub binaries_info: PerPlatform<RemoteBinaryInfo>,
    pub next_run_index: u32,
}

/// One device entry in a run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunDevice {
    pub id: String,
    pub os_version: String,
    pub locale: String,
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_scale: Option<String>,
}

/// Per-platform section of a run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRunConfig {
    pub devices: Vec<RunDevice>,
    pub s3_key: String,
}

/// Full run configuration sent when opening a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<PlatformRunConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios: Option<PlatformRunConfig>,
}

/// Git metadata attached to a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitInfo {
    pub commit_hash: String,
    pub branch_name: String,
    pub commit_name: String,
}

impl Default for GitInfo {
    fn default() -> Self {
        Self {
            commit_hash: "unknown".into(),
            branch_name: "unknown".into(),
            commit_name: "unknown".into(),
        }
    }
}

/// Request body for opening a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRunRequest {
    pub team_id: String,
    pub project_index: u32,
    pub sdk_version: String,
    pub binary_hashes: PerPlatform<String>,
    pub run_config: RunConfig,
    pub git_info: GitInfo,
}

/// A run record as returned by the registry.
#[derive(Debug, Clone, Deserialize)]
pub struct RunRecord {
    pub index: u32,
}

/// Response of the open-run call.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenRunResponse {
    pub run: RunRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Platform::Android).unwrap(), "\"android\"");
        assert_eq!(serde_json::to_string(&Platform::Ios).unwrap(), "\"ios\"");
    }

    #[test]
    fn per_platform_skips_absent_sides() {
        let hashes = PerPlatform::<String> {
            android: Some("abc".into()),
            ios: None,
        };
        let json = serde_json::to_string(&hashes).unwrap();
        assert_eq!(json, r#"{"android":"abc"}"#);
    }

    #[test]
    fn remote_binary_info_tolerates_sparse_payload() {
        let info: RemoteBinaryInfo =
            serde_json::from_str(r#"{"s3Key":"builds/android/42","uploadUrl":"https://u"}"#)
                .unwrap();
        assert_eq!(info.s3_key.as_deref(), Some("builds/android/42"));
        assert_eq!(info.upload_url.as_deref(), Some("https://u"));
        assert!(info.hash.is_none());
        assert!(info.previous_run_index.is_none());
    }

    #[test]
    fn reuse_mode_wire_names() {
        assert_eq!(
            serde_json::to_string(&BinaryReuseMode::RequireHashMatch).unwrap(),
            "\"requireHashMatch\""
        );
        assert_eq!(
            serde_json::to_string(&BinaryReuseMode::RequireHashMatchOrLatestDev).unwrap(),
            "\"requireHashMatchOrLatestDev\""
        );
    }

    #[test]
    fn run_config_omits_empty_platforms() {
        let config = RunConfig {
            android: Some(PlatformRunConfig {
                devices: vec![RunDevice {
                    id: "pixel.8".into(),
                    os_version: "14".into(),
                    locale: "en_US".into(),
                    theme: "light".into(),
                    font_scale: None,
                }],
                s3_key: "builds/android/1".into(),
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("ios").is_none());
        assert!(json.get("include").is_none());
        assert_eq!(json["android"]["s3Key"], "builds/android/1");
    }
}
