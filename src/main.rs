mod analytics;
mod cli;
mod config;
mod models;
mod run;
mod store;
mod ui;
mod view_model;

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use config::Config;
use store::HttpStore;
use view_model::ExpenseViewModel;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let config = Config::load(&config_path, cli.api_url.as_deref())?;
    info!(api_url = %config.api_url, timeout_ms = config.timeout_ms, "Configuration loaded");

    let store = HttpStore::from_config(&config).context("Failed to set up expense service client")?;

    match cli.command {
        None => run::as_tui(ExpenseViewModel::new(Box::new(store)), &config.currency_symbol),
        Some(command) => run::as_cli(command, store, &config.currency_symbol),
    }
}

/// Log to a file in the data directory; the TUI owns the terminal.
/// Priority: RUST_LOG env var > --verbose flag > default (info)
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let log_path = config::log_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .compact(),
        )
        .init();
    Ok(())
}
