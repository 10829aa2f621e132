//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::logging::{init_logging, LogSink};
use super::output::{Output, OutputFormat};
use super::{catalog_cmd, init, show, tui};
use crate::storage::{Catalog, Config};

#[derive(Parser)]
#[command(name = "gallery")]
#[command(author, version, about = "A terminal gallery of versioned artifacts")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new gallery project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// List artifacts and their versions
    List,

    /// Show every route the gallery answers to
    Routes,

    /// Render a route once without the interactive shell
    Show {
        /// Route to render, e.g. /artifacts/timer/v2
        route: String,

        /// Expand the stack trace of a failed artifact
        #[arg(long)]
        stack: bool,
    },

    /// Open the interactive gallery
    Open {
        /// Route to start at (defaults to the configured start route)
        route: Option<String>,
    },
}

/// Parse CLI arguments and run the appropriate command
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("gallery starting");

    if let Commands::Init { path } = &cli.command {
        return init::run(&output, path);
    }

    let config = Config::load()?;
    match &config.project_root {
        Some(root) => output.verbose_ctx("config", &format!("Project root: {}", root.display())),
        None => output.verbose_ctx("config", "No gallery.toml found, using defaults"),
    }

    let sink = match (&cli.command, &config.global.log.file) {
        (Commands::Open { .. }, Some(file)) => LogSink::File(file.clone()),
        (Commands::Open { .. }, None) => LogSink::Disabled,
        _ => LogSink::Stderr,
    };
    init_logging(sink, &config.global.log.level, cli.verbose)?;

    let catalog = Catalog::load(&config)?;
    output.verbose_ctx(
        "catalog",
        &format!(
            "{} artifacts, {} versions, {} rejected",
            catalog.registry.len(),
            catalog.registry.version_count(),
            catalog.rejected.len()
        ),
    );

    match cli.command {
        // Runs before configuration is loaded
        Commands::Init { .. } => {}
        Commands::List => catalog_cmd::list(&output, &catalog.registry)?,
        Commands::Routes => catalog_cmd::routes(&output, &catalog.registry)?,
        Commands::Show { route, stack } => {
            let show_stack = stack || config.global.show_stack_traces;
            show::run(&output, catalog.registry, &route, show_stack)?
        }
        Commands::Open { route } => {
            let start = route.unwrap_or_else(|| config.project.start_route.clone());
            tui::run(&output, catalog.registry, &config.global, &start)?
        }
    }

    Ok(())
}
