//! Timer demo
//!
//! v1 crashes on purpose so the failure panel can be seen for a single
//! version in a folder. v2 is the working stopwatch.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;

use super::{heading, muted};
use crate::runtime::{Artifact, ArtifactContext};

/// `mm:ss`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Default)]
pub struct TimerV1;

impl Artifact for TimerV1 {
    fn render(&mut self, _ctx: &mut ArtifactContext<'_>) -> Text<'static> {
        panic!(
            "!!Intentional Crashing!! This exists to show the error boundary for a specific artifact version in a folder"
        )
    }
}

#[derive(Debug, Default)]
pub struct TimerV2 {
    /// Time accumulated by finished runs
    accumulated: Duration,
    running_since: Option<Instant>,
    started_at: Option<DateTime<Local>>,
}

impl TimerV2 {
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.accumulated + self.running_since.map(|s| s.elapsed()).unwrap_or_default()
    }

    pub fn toggle(&mut self) {
        match self.running_since.take() {
            Some(since) => self.accumulated += since.elapsed(),
            None => {
                self.running_since = Some(Instant::now());
                self.started_at.get_or_insert_with(Local::now);
            }
        }
    }

    /// Resets a stopped timer; returns false while running or already zero
    pub fn reset(&mut self) -> bool {
        if self.is_running() || self.accumulated.is_zero() {
            return false;
        }
        *self = Self::default();
        true
    }
}

impl Artifact for TimerV2 {
    fn render(&mut self, _ctx: &mut ArtifactContext<'_>) -> Text<'static> {
        let clock = Line::from(Span::styled(
            format_elapsed(self.elapsed()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .centered();

        let toggle = if self.is_running() { "[space] Stop" } else { "[space] Start" };
        let mut lines = vec![
            heading("Timer (v2)"),
            Line::default(),
            clock,
            Line::default(),
            muted(format!("{}   [r] Reset", toggle)),
        ];

        if let (true, Some(started)) = (self.is_running(), self.started_at) {
            lines.push(Line::default());
            lines.push(muted(format!("Started at: {}", started.format("%H:%M:%S"))));
        }

        Text::from(lines)
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut ArtifactContext<'_>) -> bool {
        match key.code {
            KeyCode::Char(' ') => {
                self.toggle();
                true
            }
            KeyCode::Char('r') => self.reset(),
            _ => false,
        }
    }

    fn hints(&self) -> &'static str {
        "space start/stop  r reset"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00");
        assert_eq!(format_elapsed(Duration::from_secs(75)), "01:15");
        assert_eq!(format_elapsed(Duration::from_millis(3_599_999)), "59:59");
    }

    #[test]
    fn toggle_accumulates() {
        let mut timer = TimerV2::default();
        timer.toggle();
        assert!(timer.is_running());
        assert!(timer.started_at.is_some());

        timer.toggle();
        assert!(!timer.is_running());
        let stopped = timer.elapsed();
        assert_eq!(timer.elapsed(), stopped);
    }

    #[test]
    fn reset_only_when_stopped() {
        let mut timer = TimerV2::default();
        assert!(!timer.reset());

        timer.toggle();
        assert!(!timer.reset());

        timer.accumulated = Duration::from_secs(3);
        timer.running_since = None;
        assert!(timer.reset());
        assert!(timer.started_at.is_none());
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }
}
