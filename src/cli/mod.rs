//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Scaffold `gallery.toml` and a sample artifact |
//! | `list` | Artifacts with their versions |
//! | `routes` | Every route and what it resolves to |
//! | `show` | Render one route headless, through the error boundary |
//! | `open` | Interactive gallery |
//!
//! ## Output Formats
//!
//! All headless commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! gallery --verbose show /artifacts/timer/v1
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod catalog_cmd;
mod init;
mod logging;
mod output;
mod render;
mod show;
mod tui;

pub use app::{Cli, Commands, run};
pub use logging::{init_logging, LogSink, LOG_ENV};
pub use output::{Output, OutputFormat};
