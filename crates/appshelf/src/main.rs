use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod browser;
mod cli;
mod config;
mod output;

use cli::App;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    initialize_tracing();
    App::parse().run().await
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn initialize_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
