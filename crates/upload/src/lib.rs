//! Build upload executor.
//!
//! PUTs compressed build payloads to presigned URLs handed out by the
//! registry, with bounded retries on transport failures.

pub mod uploader;

pub use uploader::{MAX_UPLOAD_ATTEMPTS, Uploader};

use glance_api::Platform;

/// Errors produced while uploading a build.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("artifact error: {0}")]
    Artifact(#[from] glance_artifact::ArtifactError),

    #[error("{platform} upload target has no presigned URL")]
    MissingUploadUrl { platform: Platform },

    #[error("failed to upload {platform} build after {attempts} attempts: {last_error}")]
    Failed {
        platform: Platform,
        attempts: u32,
        last_error: String,
    },
}
