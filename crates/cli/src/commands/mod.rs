//! Subcommand implementations.
//!
//! Each command resolves its `RunIntent` and flag overrides, then hands
//! off to the shared invocation pipeline in `glance-run`.

pub mod cloud_build;
pub mod live_update;

use std::path::PathBuf;

use clap::Args;

use glance_api::{ApiClient, token_parts};
use glance_config::{ConfigError, Overrides, load_config, validated_config};
use glance_resolve::RunIntent;
use glance_run::{RunError, RunOutcome, RunRequest, execute_run};

use crate::git;

/// Flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Project token (overrides the config file value).
    #[arg(long)]
    pub token: Option<String>,

    /// Path to the config file, relative to the project root.
    #[arg(long, default_value = glance_config::DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Project root that relative paths resolve against.
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,
}

/// Runs the shared pipeline for one intent.
pub async fn execute(
    intent: RunIntent,
    common: CommonArgs,
    overrides: Overrides,
) -> Result<RunOutcome, RunError> {
    let config_path = if common.config.is_absolute() {
        common.config.clone()
    } else {
        common.project_root.join(&common.config)
    };

    let raw = load_config(&config_path)?;
    let config = validated_config(raw, overrides, &common.project_root, &intent)?;

    let token = token_parts(&config.token).map_err(|_| ConfigError::InvalidToken)?;
    let client = ApiClient::new(&token.api_token)?;

    let request = RunRequest {
        intent,
        config,
        project_root: common.project_root.clone(),
        git_info: git::collect(&common.project_root),
    };

    let outcome = execute_run(&client, &request).await?;

    println!("View your test results at: {}", outcome.url);

    Ok(outcome)
}
