//! Taskdeps CLI binary.

use anyhow::Result;
use taskdeps::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the taskdeps CLI.
///
/// Uses tokio's current_thread runtime; every command is a short sequence of
/// I/O-bound steps.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Example: RUST_LOG=taskdeps=debug taskdeps dep add 2 1
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskdeps=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting taskdeps CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Taskdeps CLI completed successfully");
    Ok(())
}
