//! Transient run marker.
//!
//! Cloud-build jobs run the CLI in a detached step; the marker file lets
//! the surrounding tooling pick up the run index and results URL after
//! the process exits.

use std::path::Path;

use crate::launcher::RunOutcome;

/// Directory the marker is written into, under the project root.
pub const RUN_MARKER_DIR: &str = ".glance";

/// Marker file name.
pub const RUN_MARKER_FILE: &str = "run.json";

/// Writes `{runIndex, url}` to `<project_root>/.glance/run.json`.
pub fn write_run_marker(project_root: &Path, outcome: &RunOutcome) -> std::io::Result<()> {
    let dir = project_root.join(RUN_MARKER_DIR);
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string(outcome).map_err(std::io::Error::other)?;
    std::fs::write(dir.join(RUN_MARKER_FILE), json)
}
