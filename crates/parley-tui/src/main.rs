//! Parley TUI entry point.
//!
//! # Usage
//!
//! ```bash
//! # Pick name and language in the UI with /join
//! parley-tui --url ws://localhost:5000
//!
//! # Join #lobby straight away, logging to a file
//! parley-tui --name alice --language es --room lobby --log-file parley.log
//! ```

use std::{fs::File, path::Path, sync::Mutex};

use clap::Parser;
use parley_client::{ClientConfig, JoinForm, Language, SystemEnv, transport::ReconnectConfig};
use parley_tui::{Runtime, TerminalDriver};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Parley terminal chat client
#[derive(Parser, Debug)]
#[command(name = "parley-tui")]
#[command(about = "Terminal client for the Parley multi-language chat")]
#[command(version)]
struct Args {
    /// Server WebSocket URL
    #[arg(short, long, default_value = "ws://localhost:5000")]
    url: String,

    /// Display name. Joins on startup when given with --language.
    #[arg(short, long)]
    name: Option<String>,

    /// Display language, as a code (`es`) or English name (`Spanish`)
    #[arg(short, long)]
    language: Option<Language>,

    /// Room to join. Blank joins the default room.
    #[arg(short, long, default_value = "")]
    room: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs to this file. The terminal belongs to the UI, so logging
    /// is off without it.
    #[arg(long)]
    log_file: Option<String>,
}

fn init_logging(path: &Path, level: &str) -> std::io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(Path::new(path), &args.log_level)?;
    }
    tracing::info!(url = %args.url, "Parley TUI starting");

    let mut driver = TerminalDriver::new(ReconnectConfig::default())?;
    if let (Some(name), Some(language)) = (args.name, args.language) {
        driver.join_on_start(JoinForm::new(name, Some(language), args.room));
    }

    let runtime = Runtime::new(driver, SystemEnv, ClientConfig::default(), args.url);
    Ok(runtime.run().await?)
}
