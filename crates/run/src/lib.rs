//! Run launching.
//!
//! Assembles the final run configuration and drives one full invocation:
//! inspect local builds, query the registry, resolve reuse-or-upload,
//! upload what is missing, open the run.

pub mod launcher;
pub mod marker;
pub mod orchestrate;

pub use launcher::{APP_DOMAIN, RunOutcome, build_run_config, results_url};
pub use marker::write_run_marker;
pub use orchestrate::{RunRequest, execute_run};

use glance_api::Platform;

/// Aggregate error of a test-run invocation.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] glance_config::ConfigError),

    #[error(transparent)]
    Api(#[from] glance_api::ApiError),

    #[error("artifact error: {0}")]
    Artifact(#[from] glance_artifact::ArtifactError),

    #[error(transparent)]
    Resolve(#[from] glance_resolve::ResolveError),

    #[error(transparent)]
    Upload(#[from] glance_upload::UploadError),

    #[error("{0} build path is undefined")]
    MissingBuildPath(Platform),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
