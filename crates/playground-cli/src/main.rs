//! indo-playground: runs IndoUI playground snippets from the command line.

mod cli;
mod config;
mod diagnostic;
mod orchestrator;
mod output;
mod session;

use clap::Parser;
use cli::Args;
use miette::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let summary = orchestrator::run(args).await?;
    if summary.failed_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Logs go to stderr so they never mix with rendered output. `RUST_LOG`
/// takes precedence over `--log-level`.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
