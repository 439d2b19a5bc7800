//! Archive member access through system tools.
//!
//! Android `.apk` files are zip archives read with `unzip`; iOS `.tar`
//! and `.tar.gz` builds are read with `tar`. Both tools signal "member
//! not found" through well-known exit codes, which callers treat as an
//! ordinary negative answer rather than a failure.

use std::path::Path;
use std::process::Output;

use tokio::process::Command;

use crate::ArtifactError;

/// Kind of archive a build artifact is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Tar,
}

/// Installed `tar` variant. GNU tar needs `--wildcards` for the member
/// patterns used here; BSD tar matches them by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TarFlavor {
    Gnu,
    Bsd,
}

/// Detects the installed `tar` flavor via `tar --version`.
///
/// Anything that does not identify itself as GNU is treated as BSD.
pub async fn detect_tar_flavor() -> Result<TarFlavor, ArtifactError> {
    let output = Command::new("tar").arg("--version").output().await?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    if stdout.to_uppercase().contains("GNU") {
        Ok(TarFlavor::Gnu)
    } else {
        Ok(TarFlavor::Bsd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Read,
    Exists,
}

/// Returns whether `member` exists inside the archive.
pub async fn member_exists(
    archive: &Path,
    member: &str,
    kind: ArchiveKind,
) -> Result<bool, ArtifactError> {
    let flavor = detect_tar_flavor().await?;
    let output = run_tool(archive, member, kind, flavor, Operation::Exists).await?;
    match classify(&output, kind, flavor)? {
        Some(_) => Ok(true),
        None => Ok(false),
    }
}

/// Reads `member` from the archive. Returns `None` when the member is
/// absent.
pub async fn read_member(
    archive: &Path,
    member: &str,
    kind: ArchiveKind,
) -> Result<Option<Vec<u8>>, ArtifactError> {
    let flavor = detect_tar_flavor().await?;
    let output = run_tool(archive, member, kind, flavor, Operation::Read).await?;
    classify(&output, kind, flavor)
}

async fn run_tool(
    archive: &Path,
    member: &str,
    kind: ArchiveKind,
    flavor: TarFlavor,
    operation: Operation,
) -> Result<Output, ArtifactError> {
    let (tool, args) = tool_args(archive, member, kind, flavor, operation);
    Ok(Command::new(tool).args(args).output().await?)
}

/// Builds the `(program, args)` pair for one archive access.
fn tool_args(
    archive: &Path,
    member: &str,
    kind: ArchiveKind,
    flavor: TarFlavor,
    operation: Operation,
) -> (&'static str, Vec<String>) {
    let archive = archive.to_string_lossy().into_owned();
    match kind {
        ArchiveKind::Zip => {
            let flag = match operation {
                Operation::Read => "-p",
                Operation::Exists => "-t",
            };
            ("unzip", vec![flag.into(), archive, member.into()])
        }
        ArchiveKind::Tar => {
            let mut args: Vec<String> = Vec::new();
            if flavor == TarFlavor::Gnu {
                args.push("--wildcards".into());
            }
            let flag = match operation {
                Operation::Read => "-xOf",
                Operation::Exists => "-tf",
            };
            args.push(flag.into());
            args.push(archive);
            // Builds prefix members with the bundle directory, so match by
            // suffix.
            args.push(format!("*{member}"));
            ("tar", args)
        }
    }
}

/// Separates "member not found" exit codes from real tool failures.
///
/// Expected codes: BSD tar 1, GNU tar 2, unzip 11.
fn classify(
    output: &Output,
    kind: ArchiveKind,
    flavor: TarFlavor,
) -> Result<Option<Vec<u8>>, ArtifactError> {
    if output.status.success() {
        return Ok(Some(output.stdout.clone()));
    }

    let code = output.status.code().unwrap_or(-1);
    let missing_code = match (kind, flavor) {
        (ArchiveKind::Zip, _) => 11,
        (ArchiveKind::Tar, TarFlavor::Bsd) => 1,
        (ArchiveKind::Tar, TarFlavor::Gnu) => 2,
    };

    if code == missing_code {
        Ok(None)
    } else {
        Err(ArtifactError::Tool {
            tool: match kind {
                ArchiveKind::Zip => "unzip",
                ArchiveKind::Tar => "tar",
            },
            code,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
