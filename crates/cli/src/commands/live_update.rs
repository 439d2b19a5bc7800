//! `glance live-update` — live JavaScript updates on development builds.

use std::path::PathBuf;

use clap::Args;

use glance_config::Overrides;
use glance_resolve::RunIntent;
use glance_run::{RunError, RunOutcome};

use super::CommonArgs;

#[derive(Args, Debug)]
pub struct LiveUpdateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Path to the Android development build. Optional: a previously
    /// uploaded development build is reused when the path is omitted.
    #[arg(long)]
    pub android: Option<PathBuf>,

    /// Path to the iOS development build. Optional: a previously
    /// uploaded development build is reused when the path is omitted.
    #[arg(long)]
    pub ios: Option<PathBuf>,
}

pub async fn run(args: LiveUpdateArgs) -> Result<RunOutcome, RunError> {
    let overrides = Overrides {
        token: args.common.token.clone(),
        android: args.android,
        ios: args.ios,
    };
    super::execute(RunIntent::LiveUpdate, args.common, overrides).await
}
