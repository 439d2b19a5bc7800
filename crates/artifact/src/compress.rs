//! Upload payload assembly.
//!
//! The registry expects Android builds as raw `.apk` bytes and iOS builds
//! as gzipped tar archives. Compression goes through the system `tar` and
//! `gzip` tools; a `.app` directory is archived with its parent as the
//! tar base so the bundle stays the sole top-level entry.

use tokio::process::Command;
use tracing::info;

use crate::inspect::ArtifactKind;
use crate::{ArtifactError, BuildArtifact};

/// Produces the bytes to PUT for one build artifact.
pub async fn upload_payload(artifact: &BuildArtifact) -> Result<Vec<u8>, ArtifactError> {
    match ArtifactKind::detect(&artifact.path)? {
        ArtifactKind::Apk | ArtifactKind::TarGz => Ok(tokio::fs::read(&artifact.path).await?),
        ArtifactKind::Tar => {
            info!(platform = %artifact.platform, "compressing build");
            gzip_file(artifact).await
        }
        ArtifactKind::AppDir => {
            info!(platform = %artifact.platform, "compressing build");
            tar_gzip_dir(artifact).await
        }
    }
}

/// Gzips an existing `.tar` file to memory.
async fn gzip_file(artifact: &BuildArtifact) -> Result<Vec<u8>, ArtifactError> {
    let output = Command::new("gzip")
        .arg("-c")
        .arg(&artifact.path)
        .output()
        .await?;
    expect_success(output, "gzip")
}

/// Packs a `.app` directory into a gzipped tar archive in memory.
///
/// The parent directory is the tar base, so relative paths inside the
/// archive all start with the bundle's own name.
async fn tar_gzip_dir(artifact: &BuildArtifact) -> Result<Vec<u8>, ArtifactError> {
    let parent = artifact.path.parent().unwrap_or(std::path::Path::new("."));
    let name = artifact
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let output = Command::new("tar")
        .args(["-czf", "-", "-C"])
        .arg(parent)
        .arg(&name)
        .output()
        .await?;
    expect_success(output, "tar")
}

fn expect_success(
    output: std::process::Output,
    tool: &'static str,
) -> Result<Vec<u8>, ArtifactError> {
    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(ArtifactError::Tool {
            tool,
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
