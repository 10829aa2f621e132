//! Interactive gallery shell
//!
//! A sidebar of pages and artifacts next to a viewport that hosts the
//! active page or artifact, drawn with ratatui.

mod app;
mod event;
mod ui;
mod utils;
mod views;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};

use super::Output;
use crate::runtime::{Gallery, Registry};
use crate::storage::GlobalConfig;
use app::App;
use event::EventHandler;

/// Launch the TUI at `start_route`
pub fn run(output: &Output, registry: Registry, config: &GlobalConfig, start_route: &str) -> Result<()> {
    output.verbose_ctx("tui", &format!("Opening gallery at {}", start_route));

    let gallery = Gallery::new(registry, config.toast_ticks);
    let mut app = App::new(gallery, start_route, config.show_stack_traces);
    let event_handler = EventHandler::new(config.tick_rate_ms)?;

    let mut terminal = ui::init_terminal()?;

    // Artifact panics are caught by their boundary; this only guards the shell
    let result = panic::catch_unwind(AssertUnwindSafe(|| app.run(&mut terminal, event_handler)));

    let restore_result = ui::restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            inner_result
        }
        Err(panic_payload) => {
            let _ = restore_result;
            if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else {
                Err(anyhow!("TUI panicked with unknown error"))
            }
        }
    }
}
