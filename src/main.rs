use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use pushtweet::config::Config;
use pushtweet::relay::Relay;

/// Pushtweet: bidirectional relay between a status stream and Pushbullet.
///
/// Notes pushed to the relay's address are base64-chunked into status
/// updates; statuses that decode as base64 payloads are pushed back as
/// notes. Runs until killed.
#[derive(Parser)]
#[command(name = "pushtweet", version, about)]
struct Cli {
    /// Path to the JSON credentials file
    #[arg(default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pushtweet=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    info!(config = %cli.config.display(), "Configuration loaded");

    // Runs both consumers; only returns (with an error) if one dies.
    Relay::new(&config)?.run().await
}
