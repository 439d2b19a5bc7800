//! Local build artifacts.
//!
//! Content hashing, archive member access through system `tar`/`unzip`,
//! embedded testing-SDK inspection, and upload payload assembly.

use std::path::PathBuf;

use glance_api::Platform;

pub mod archive;
pub mod compress;
pub mod hash;
pub mod inspect;

pub use hash::hash_artifact;
pub use inspect::{ArtifactKind, LocalBinaryInfo, inspect};

/// A local build for one platform, as supplied by the caller.
///
/// Android builds are `.apk` files; iOS builds are `.app` directories,
/// `.tar`, or `.tar.gz` archives. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    pub path: PathBuf,
    pub platform: Platform,
}

impl BuildArtifact {
    pub fn new(path: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            path: path.into(),
            platform,
        }
    }
}

/// Errors produced by the artifact crate.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported build file format: {0}")]
    UnsupportedFormat(String),

    #[error("`{tool}` failed with status {code}: {stderr}")]
    Tool {
        tool: &'static str,
        code: i32,
        stderr: String,
    },
}
