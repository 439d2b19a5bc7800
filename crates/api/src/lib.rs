//! Glance API client.
//!
//! Wire types and an async HTTP client for the Glance registry: querying
//! which binaries can be reused, requesting presigned upload targets, and
//! opening test runs.

pub mod client;
pub mod token;
pub mod types;

pub use client::ApiClient;
pub use token::{MalformedToken, TokenParts, token_parts};
pub use types::{GitInfo, Platform, RemoteBinaryInfo, RunConfig};

/// Errors from the Glance API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid token")]
    Auth,

    #[error("snapshots limit is exceeded; contact the team owner to upgrade the plan")]
    SnapshotsLimitExceeded,

    #[error("your plan is inactive; contact the team owner to update the payment")]
    PlanInactive,

    #[error("malformed project token")]
    MalformedToken(#[from] MalformedToken),
}
