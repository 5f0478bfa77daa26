use crate::persistence::log_file;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when RUST_LOG is not set
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "ticklist=debug"
    } else {
        "ticklist=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(default_directive(true));
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(false)))
}

/// Log to `<data-dir>/ticklist.log`; the TUI owns the terminal
pub fn init_file_logging(data_dir: &Path, verbose: bool) -> Result<()> {
    let path = log_file(data_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(env_filter(verbose))
        .try_init()
        .context("Failed to initialize logging")
}

/// Log to stderr for the headless commands
pub fn init_stderr_logging(verbose: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .with(env_filter(verbose))
        .try_init()
        .context("Failed to initialize logging")
}
