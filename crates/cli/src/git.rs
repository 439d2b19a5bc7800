//! Best-effort git metadata for run records.

use std::path::Path;
use std::process::Command;

use glance_api::GitInfo;

const UNKNOWN: &str = "unknown";

/// Collects commit hash, branch name, and commit message from the
/// repository at `root`. Any value git cannot provide falls back to
/// `"unknown"`; a missing git binary or non-repository is not an error.
pub fn collect(root: &Path) -> GitInfo {
    GitInfo {
        commit_hash: git(root, &["rev-parse", "HEAD"]),
        branch_name: git(root, &["rev-parse", "--abbrev-ref", "HEAD"]),
        commit_name: git(root, &["log", "-1", "--pretty=%B"]),
    }
}

fn git(root: &Path, args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
