//! Logging setup using `tracing` and `tracing-subscriber`
//!
//! The filter comes from `GALLERY_LOG` when set, otherwise from the
//! configured level (`debug` with `--verbose`). Headless commands log to
//! stderr. The TUI owns the terminal, so it logs to the configured file or
//! not at all.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "GALLERY_LOG";

/// Where log events go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
    Disabled,
}

fn filter(level: &str, verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { level };
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs the global subscriber
pub fn init_logging(sink: LogSink, level: &str, verbose: bool) -> Result<()> {
    let filter = filter(level, verbose);

    match sink {
        LogSink::Disabled => Ok(()),
        LogSink::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_target(false),
            )
            .try_init()
            .context("Failed to initialize logging"),
        LogSink::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true),
                )
                .try_init()
                .context("Failed to initialize logging")
        }
    }
}
