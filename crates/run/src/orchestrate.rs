//! One full test-run invocation.
//!
//! Pipeline: inspect local builds, query the registry (one batched call),
//! resolve reuse-or-upload per platform, upload what is missing (Android
//! before iOS), open the run. Fatal errors abort immediately; nothing is
//! recorded remotely beyond uploads that already completed.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::info;

use glance_api::types::{PerPlatform, QueryRunInfoRequest};
use glance_api::{ApiClient, GitInfo, Platform, token_parts};
use glance_artifact::{BuildArtifact, LocalBinaryInfo, inspect};
use glance_config::{Config, ConfigError, platforms_for_intent};
use glance_resolve::{RunIntent, resolve};
use glance_upload::Uploader;

use crate::RunError;
use crate::launcher::{RunOutcome, build_run_config, open_run};
use crate::marker::write_run_marker;

/// Everything one invocation needs, assembled at the CLI boundary.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub intent: RunIntent,
    pub config: Config,
    pub project_root: PathBuf,
    pub git_info: GitInfo,
}

/// Executes one invocation end to end and returns the opened run.
pub async fn execute_run(client: &ApiClient, request: &RunRequest) -> Result<RunOutcome, RunError> {
    let token = token_parts(&request.config.token).map_err(|_| ConfigError::InvalidToken)?;
    let platforms = platforms_for_intent(&request.config, &request.intent);

    // Inspect whatever builds exist locally.
    let mut artifacts: PerPlatform<BuildArtifact> = PerPlatform::default();
    let mut local: PerPlatform<LocalBinaryInfo> = PerPlatform::default();
    for &platform in &platforms {
        if let Some(path) = request.config.path_for(platform) {
            let artifact = BuildArtifact::new(path.clone(), platform);
            local.set(platform, inspect(&artifact).await?);
            artifacts.set(platform, artifact);
        }
    }

    // One batched registry query for all tested platforms.
    let query = QueryRunInfoRequest {
        binary_hashes: local.map_ref(|info| info.hash.clone()),
        platforms: platforms.clone(),
        team_id: token.team_id.clone(),
        project_index: token.project_index,
        binary_reuse_mode: request.intent.policy().reuse_mode,
    };
    let run_info = client.query_run_info(&query).await?;

    let resolved = resolve(&request.intent, &platforms, &local, &run_info.binaries_info)?;

    log_device_counts(&request.config, &platforms, run_info.next_run_index);

    // Sequential: the Android upload finishes before iOS starts.
    let uploader = Uploader::new()?;
    for &platform in &platforms {
        let Some(binary) = resolved.get(platform) else {
            continue;
        };
        if binary.needs_upload {
            let artifact = artifacts
                .get(platform)
                .ok_or(RunError::MissingBuildPath(platform))?;
            uploader.upload(artifact, binary).await?;
        } else if let Some(reuse) = &binary.reuse {
            info!(
                %platform,
                run_index = reuse.run_index,
                age = %reuse.created_at.map(time_ago).unwrap_or_default(),
                "reusing unchanged build"
            );
        }
    }

    let sdk_version = platforms
        .first()
        .and_then(|&p| resolved.get(p))
        .map(|b| b.sdk_version.clone())
        .unwrap_or_default();

    let outcome = open_run(
        client,
        &token,
        sdk_version,
        resolved.map_ref(|b| b.hash.clone()),
        build_run_config(&request.config, &platforms, &resolved),
        request.git_info.clone(),
    )
    .await?;

    if matches!(request.intent, RunIntent::CloudBuild { .. }) {
        write_run_marker(&request.project_root, &outcome)?;
    }

    Ok(outcome)
}

fn log_device_counts(config: &Config, platforms: &[Platform], next_run_index: u32) {
    for &platform in platforms {
        let count = config
            .devices
            .iter()
            .filter(|d| glance_config::device_platform(&d.id) == Some(platform))
            .count();
        if count > 0 {
            info!(%platform, devices = count, run_index = next_run_index, "tests will run");
        }
    }
}

/// Coarse "time ago" for reuse notices ("3 days ago").
fn time_ago(created_at: DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(created_at);

    if elapsed.num_days() >= 1 {
        let days = elapsed.num_days();
        format!("{days} day{} ago", if days == 1 { "" } else { "s" })
    } else if elapsed.num_hours() >= 1 {
        let hours = elapsed.num_hours();
        format!("{hours} hour{} ago", if hours == 1 { "" } else { "s" })
    } else if elapsed.num_minutes() >= 1 {
        let minutes = elapsed.num_minutes();
        format!("{minutes} minute{} ago", if minutes == 1 { "" } else { "s" })
    } else {
        "just now".to_string()
    }
}
