//! PayConsole CLI
//!
//! Drives the currency display layer from the command line: pick a country,
//! merchant and display currency, refresh rates, convert amounts. State is
//! persisted between invocations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payconsole_fx::OpenErApiSource;
use payconsole_store::{ConsoleState, FileStorage};

mod commands;
mod config;

use commands::Command;
use config::{ConsoleConfig, LogFormat};

/// PayConsole currency display CLI
#[derive(Parser, Debug)]
#[command(name = "payconsole")]
#[command(about = "Currency display state for the payments admin console")]
struct Args {
    /// Directory holding persisted state
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Rate service endpoint
    #[arg(long, global = true)]
    rate_api_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

fn init_logging(config: &ConsoleConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ConsoleConfig::from_env();
    if let Some(dir) = args.storage_dir {
        config.storage_dir = dir;
    }
    if let Some(url) = args.rate_api_url {
        config.rate_api_url = url;
    }
    if args.json_logs {
        config.log_format = LogFormat::Json;
    }

    init_logging(&config);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    debug!(storage_dir = %config.storage_dir.display(), "Opening console state");

    let storage = FileStorage::open(&config.storage_dir)
        .with_context(|| format!("opening storage at {}", config.storage_dir.display()))?;
    let source = OpenErApiSource::new(config.rate_api_url.clone(), config.request_timeout)?;
    let state = ConsoleState::open(Arc::new(storage), Arc::new(source), config.fetcher_config());

    let output = commands::execute(args.command, &state).await?;
    print!("{output}");

    Ok(())
}
