//! Per-command validation policy.
//!
//! Every CLI command maps to one `RunIntent`; what each intent demands
//! from the builds under test is data in a policy table, consumed by the
//! generic resolution in [`crate::resolve`].

use std::path::PathBuf;

use glance_api::Platform;
use glance_api::types::BinaryReuseMode;

/// What the current invocation is testing.
///
/// Each variant carries exactly the fields valid for it; the intent is
/// resolved once at the CLI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunIntent {
    /// Test standard (release) builds from local paths.
    Standard,
    /// Test a live JavaScript update against development builds.
    LiveUpdate,
    /// Test a single platform build produced by a cloud build job.
    CloudBuild {
        platform: Platform,
        build_path: PathBuf,
    },
}

impl RunIntent {
    /// Command name as typed by the user, for error messages.
    pub fn command(&self) -> &'static str {
        match self {
            RunIntent::Standard => "test",
            RunIntent::LiveUpdate => "live-update",
            RunIntent::CloudBuild { .. } => "cloud-build",
        }
    }

    pub fn policy(&self) -> IntentPolicy {
        match self {
            RunIntent::Standard => IntentPolicy {
                requires_development_build: false,
                reuse_mode: BinaryReuseMode::RequireHashMatch,
                requires_platform_paths: true,
            },
            // Live updates run on top of a development client; an already
            // uploaded dev build may be reused even without local paths.
            RunIntent::LiveUpdate => IntentPolicy {
                requires_development_build: true,
                reuse_mode: BinaryReuseMode::RequireHashMatchOrLatestDev,
                requires_platform_paths: false,
            },
            RunIntent::CloudBuild { .. } => IntentPolicy {
                requires_development_build: false,
                reuse_mode: BinaryReuseMode::RequireHashMatch,
                requires_platform_paths: true,
            },
        }
    }
}

/// Validation requirements of one intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentPolicy {
    /// Whether builds must embed the development client.
    pub requires_development_build: bool,
    /// Reuse rule passed to the registry query.
    pub reuse_mode: BinaryReuseMode,
    /// Whether a local build path is mandatory for every tested platform.
    pub requires_platform_paths: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_requires_release_builds_and_paths() {
        let policy = RunIntent::Standard.policy();
        assert!(!policy.requires_development_build);
        assert!(policy.requires_platform_paths);
        assert_eq!(policy.reuse_mode, BinaryReuseMode::RequireHashMatch);
    }

    #[test]
    fn live_update_requires_dev_builds() {
        let policy = RunIntent::LiveUpdate.policy();
        assert!(policy.requires_development_build);
        assert!(!policy.requires_platform_paths);
        assert_eq!(
            policy.reuse_mode,
            BinaryReuseMode::RequireHashMatchOrLatestDev
        );
    }

    #[test]
    fn cloud_build_matches_standard_policy() {
        let intent = RunIntent::CloudBuild {
            platform: Platform::Android,
            build_path: "out/app.apk".into(),
        };
        assert_eq!(intent.policy(), RunIntent::Standard.policy());
        assert_eq!(intent.command(), "cloud-build");
    }
}
