//! Binary reuse and upload resolution.
//!
//! Decides, per tested platform, whether a previously uploaded binary can
//! be reused or a fresh upload is needed, and enforces the build-type and
//! SDK-version rules of the invoked command.

pub mod policy;
pub mod resolve;
pub mod semver;

pub use policy::{IntentPolicy, RunIntent};
pub use resolve::{ResolvedBinary, ReuseInfo, resolve};
pub use semver::MIN_SDK_VERSION;

use glance_api::Platform;

/// Errors produced during binary resolution.
///
/// All of these are fatal for the invocation and never retried; they
/// describe a build or configuration the operator has to fix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("{0} remote binary info is missing")]
    MissingRemoteInfo(Platform),

    #[error("{0} local binary info is missing")]
    MissingLocalInfo(Platform),

    #[error("{0} binary info is missing required fields")]
    IncompleteBinaryInfo(Platform),

    #[error(
        "invalid {platforms} build: the embedded testing SDK is missing; \
         install the Glance native module and create a new build"
    )]
    SdkMissing { platforms: String },

    #[error(
        "invalid {platforms} build: this command requires a development build; \
         create the build with a development profile"
    )]
    DevelopmentBuildRequired { platforms: String },

    #[error(
        "invalid {platforms} build: this command requires a release build; \
         create the build with a release or preview profile"
    )]
    ReleaseBuildRequired { platforms: String },

    #[error(
        "Android and iOS builds use different testing SDK versions \
         (Android: {android}, iOS: {ios}); rebuild both platforms"
    )]
    SdkVersionMismatch { android: String, ios: String },

    #[error(
        "{platforms} build uses an outdated testing SDK version: \
         found {found}, minimum required {required}; upgrade the SDK and rebuild"
    )]
    OutdatedSdk {
        platforms: String,
        found: String,
        required: String,
    },

    #[error("invalid version format \"{0}\": expected numeric major.minor.patch")]
    InvalidVersion(String),
}

/// Joins platform labels for error messages ("Android", "Android and iOS").
pub(crate) fn platform_labels(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(|p| p.label())
        .collect::<Vec<_>>()
        .join(" and ")
}
