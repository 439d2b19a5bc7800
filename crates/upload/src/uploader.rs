//! Presigned-URL uploader.

use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tracing::{info, warn};

use glance_artifact::BuildArtifact;
use glance_artifact::compress::upload_payload;
use glance_resolve::ResolvedBinary;

use crate::UploadError;

/// Attempts per artifact before the upload fails fatally.
pub const MAX_UPLOAD_ATTEMPTS: u32 = 3;

/// Per-request timeout. Large simulator bundles on slow links take a
/// while.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Uploads build payloads to presigned URLs.
///
/// Holds one keep-alive `reqwest::Client` reused across uploads of an
/// invocation.
pub struct Uploader {
    http: reqwest::Client,
}

impl Uploader {
    pub fn new() -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    /// Uploads one artifact to its resolved presigned target.
    ///
    /// Retries transport-level failures (network errors, non-2xx
    /// responses) up to [`MAX_UPLOAD_ATTEMPTS`] times.
    pub async fn upload(
        &self,
        artifact: &BuildArtifact,
        target: &ResolvedBinary,
    ) -> Result<(), UploadError> {
        let platform = artifact.platform;
        let url = target
            .upload_url
            .as_deref()
            .ok_or(UploadError::MissingUploadUrl { platform })?;

        let payload = upload_payload(artifact).await?;
        let size_mb = payload.len() as f64 / (1024.0 * 1024.0);
        info!(%platform, size_mb, "uploading build");

        let mut last_error = String::new();
        for attempt in 1..=MAX_UPLOAD_ATTEMPTS {
            let result = self
                .http
                .put(url)
                .header(CONTENT_TYPE, "application/octet-stream")
                .header(CONTENT_LENGTH, payload.len())
                .body(payload.clone())
                .send()
                .await;

            match result {
                Ok(resp) if resp.status().is_success() => {
                    info!(%platform, attempt, "upload finished");
                    return Ok(());
                }
                Ok(resp) => {
                    last_error = format!("unexpected status {}", resp.status());
                }
                Err(e) => {
                    last_error = e.to_string();
                }
            }

            warn!(%platform, attempt, error = %last_error, "upload attempt failed");
        }

        Err(UploadError::Failed {
            platform,
            attempts: MAX_UPLOAD_ATTEMPTS,
            last_error,
        })
    }
}
