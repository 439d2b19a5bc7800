//! Local binary inspection.
//!
//! Every Glance-enabled build embeds a small manifest
//! (`assets/glance.json`) written by the native module at build time, and
//! development builds additionally carry the dev-menu bundle. Inspection
//! derives the locally knowable part of a binary's identity: content
//! hash, development flag, and embedded SDK version.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::archive::{ArchiveKind, member_exists, read_member};
use crate::hash::hash_artifact;
use crate::{ArtifactError, BuildArtifact};
use glance_api::Platform;

/// Path of the embedded SDK manifest inside a build.
pub const SDK_MANIFEST_PATH: &str = "assets/glance.json";

/// Per-platform marker file present only in development builds.
fn dev_marker_path(platform: Platform) -> &'static str {
    match platform {
        Platform::Android => "assets/DevMenuApp.android.js",
        Platform::Ios => "DevMenu.bundle/DevMenuApp.ios.js",
    }
}

/// Physical layout of a build artifact on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Android application package (a zip archive).
    Apk,
    /// Uncompressed iOS simulator bundle directory.
    AppDir,
    /// iOS bundle packed as a tar archive.
    Tar,
    /// iOS bundle packed as a gzipped tar archive.
    TarGz,
}

impl ArtifactKind {
    /// Classifies an artifact by its file name.
    pub fn detect(path: &Path) -> Result<ArtifactKind, ArtifactError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if name.ends_with(".apk") {
            Ok(ArtifactKind::Apk)
        } else if name.ends_with(".tar.gz") {
            Ok(ArtifactKind::TarGz)
        } else if name.ends_with(".tar") {
            Ok(ArtifactKind::Tar)
        } else if name.ends_with(".app") {
            Ok(ArtifactKind::AppDir)
        } else {
            Err(ArtifactError::UnsupportedFormat(name))
        }
    }

    fn archive_kind(self) -> Option<ArchiveKind> {
        match self {
            ArtifactKind::Apk => Some(ArchiveKind::Zip),
            ArtifactKind::Tar | ArtifactKind::TarGz => Some(ArchiveKind::Tar),
            ArtifactKind::AppDir => None,
        }
    }
}

/// Locally derived identity of one platform binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBinaryInfo {
    pub hash: String,
    pub is_development_build: bool,
    pub sdk_version: Option<String>,
}

/// Inspects a local build: content hash, development flag, SDK version.
pub async fn inspect(artifact: &BuildArtifact) -> Result<LocalBinaryInfo, ArtifactError> {
    let kind = ArtifactKind::detect(&artifact.path)?;
    let hash = hash_artifact(&artifact.path)?;
    let marker = dev_marker_path(artifact.platform);

    let (is_development_build, manifest) = match kind.archive_kind() {
        None => {
            let is_dev = artifact.path.join(marker).exists();
            let manifest = match std::fs::read(artifact.path.join(SDK_MANIFEST_PATH)) {
                Ok(bytes) => Some(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => return Err(e.into()),
            };
            (is_dev, manifest)
        }
        Some(archive) => {
            let is_dev = member_exists(&artifact.path, marker, archive).await?;
            let manifest = read_member(&artifact.path, SDK_MANIFEST_PATH, archive).await?;
            (is_dev, manifest)
        }
    };

    let sdk_version = manifest
        .as_deref()
        .and_then(|bytes| manifest_version(&String::from_utf8_lossy(bytes)));

    debug!(
        platform = %artifact.platform,
        hash = %&hash[..8],
        is_development_build,
        sdk_version = sdk_version.as_deref().unwrap_or("-"),
        "inspected local build"
    );

    Ok(LocalBinaryInfo {
        hash,
        is_development_build,
        sdk_version,
    })
}

#[derive(Deserialize)]
struct SdkManifest {
    version: String,
}

/// Extracts the SDK version from manifest content.
///
/// Some extraction pipelines surround the JSON with noise; when a direct
/// parse fails, the first `{..}` span is tried before giving up.
fn manifest_version(content: &str) -> Option<String> {
    if let Ok(manifest) = serde_json::from_str::<SdkManifest>(content) {
        return Some(manifest.version);
    }

    let start = content.find('{')?;
    let end = content[start..].find('}')? + start;
    serde_json::from_str::<SdkManifest>(&content[start..=end])
        .ok()
        .map(|m| m.version)
}
