//! Binary crate for the `weather-server` HTTP service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Wiring the core service into an HTTP router

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod api;
mod cli;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cmd = cli::Cli::parse();
    cmd.run().await
}

fn init_logging() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("weather_server=info".parse()?)
                .add_directive("weather_core=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();
    Ok(())
}
