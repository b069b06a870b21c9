//! h5pforge binary: logging setup and command dispatch

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use h5pforge::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG wins; build progress is logged at info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    Cli::parse().execute().await
}
