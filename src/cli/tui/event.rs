//! Event handling for the TUI
//!
//! A background thread polls crossterm and feeds key presses, resizes and
//! ticks into a channel. Ticks drive toast expiry and artifact animation.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Terminal events
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Handles terminal events in a separate thread
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate in milliseconds
    pub fn new(tick_rate_ms: u64) -> Result<Self> {
        let tick_rate = Duration::from_millis(tick_rate_ms.max(1));
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("tui-events".to_string())
            .spawn(move || {
                let mut last_tick = Instant::now();
                loop {
                    let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                    let event = match event::poll(timeout) {
                        Ok(true) => match event::read() {
                            Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                                Some(Event::Key(key))
                            }
                            Ok(CrosstermEvent::Resize(_, _)) => Some(Event::Resize),
                            Ok(_) => None,
                            Err(e) => {
                                tracing::warn!(error = %e, "failed to read terminal event");
                                None
                            }
                        },
                        Ok(false) => None,
                        Err(e) => {
                            tracing::error!(error = %e, "terminal event polling failed");
                            break;
                        }
                    };

                    // Receiver dropped: the app has exited
                    if let Some(event) = event {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    if last_tick.elapsed() >= tick_rate {
                        if tx.send(Event::Tick).is_err() {
                            break;
                        }
                        last_tick = Instant::now();
                    }
                }
            })
            .context("Failed to start event thread")?;

        Ok(Self { rx })
    }

    /// Receive the next event (blocking)
    pub fn next(&self) -> Result<Event> {
        Ok(self.rx.recv()?)
    }
}
