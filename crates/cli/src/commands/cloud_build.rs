//! `glance cloud-build` — a single-platform build from a cloud build job.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use glance_api::Platform;
use glance_config::Overrides;
use glance_resolve::RunIntent;
use glance_run::{RunError, RunOutcome};

use super::CommonArgs;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PlatformArg {
    Android,
    Ios,
}

impl From<PlatformArg> for Platform {
    fn from(value: PlatformArg) -> Self {
        match value {
            PlatformArg::Android => Platform::Android,
            PlatformArg::Ios => Platform::Ios,
        }
    }
}

#[derive(Args, Debug)]
pub struct CloudBuildArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Platform the cloud build job produced.
    #[arg(long, value_enum)]
    pub platform: PlatformArg,

    /// Path to the downloaded build artifact.
    #[arg(long)]
    pub build_path: PathBuf,
}

pub async fn run(args: CloudBuildArgs) -> Result<RunOutcome, RunError> {
    let intent = RunIntent::CloudBuild {
        platform: args.platform.into(),
        build_path: args.build_path,
    };
    let overrides = Overrides {
        token: args.common.token.clone(),
        ..Default::default()
    };
    super::execute(intent, args.common, overrides).await
}
