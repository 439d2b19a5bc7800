//! The `glance` command line.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod git;
mod render;

#[derive(Parser, Debug)]
#[command(
    name = "glance",
    version,
    about = "Visual testing for React Native and Expo apps"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Test standard release builds.
    Test(commands::test::TestArgs),

    /// Test a live JavaScript update against development builds.
    LiveUpdate(commands::live_update::LiveUpdateArgs),

    /// Test a single-platform build produced by a cloud build job.
    CloudBuild(commands::cloud_build::CloudBuildArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Test(args) => commands::test::run(args).await,
        Commands::LiveUpdate(args) => commands::live_update::run(args).await,
        Commands::CloudBuild(args) => commands::cloud_build::run(args).await,
    };

    if let Err(error) = result {
        render::print_error(&error);
        std::process::exit(1);
    }
}
