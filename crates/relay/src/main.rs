//! Relay CLI - deliver one monitoring event to Slack.
//!
//! Stands in for the event-bus trigger: reads a trigger envelope from a
//! file or stdin, builds the relay from the environment, and processes it.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use relay::Relay;

/// Relay a CloudWatch or Trusted Advisor event to a Slack channel.
#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Relay cloud-monitoring events to Slack")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to the trigger envelope JSON (reads stdin when omitted)
    #[arg(long)]
    event: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("relay=debug,info")
    } else {
        EnvFilter::new("relay=info,warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let raw = match &cli.event {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading event from {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("reading event from stdin")?,
    };
    let envelope: serde_json::Value =
        serde_json::from_str(&raw).context("parsing trigger envelope")?;

    let relay = Relay::from_env().await?;
    relay.handle(&envelope).await?;

    Ok(())
}
