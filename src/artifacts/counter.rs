//! Counter demo
//!
//! v1 keeps its count in the component and loses it on remount. v2 keeps it
//! in the state store under `counter.v2/count`.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;

use super::{heading, muted};
use crate::runtime::{Artifact, ArtifactContext, ToastLevel};

const HINTS: &str = "+/- change";

fn delta(key: &KeyEvent) -> Option<i64> {
    match key.code {
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => Some(1),
        KeyCode::Char('-') | KeyCode::Down => Some(-1),
        _ => None,
    }
}

fn card(title: &str, count: i64) -> Text<'static> {
    Text::from(vec![
        heading(title.to_string()),
        Line::default(),
        Line::from(Span::styled(
            count.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::default(),
        muted("[-] Decrement   [+] Increment"),
    ])
}

#[derive(Debug, Default)]
pub struct CounterV1 {
    count: i64,
}

impl Artifact for CounterV1 {
    fn render(&mut self, _ctx: &mut ArtifactContext<'_>) -> Text<'static> {
        card("Simple Counter", self.count)
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut ArtifactContext<'_>) -> bool {
        match delta(&key) {
            Some(d) => {
                self.count += d;
                true
            }
            None => false,
        }
    }

    fn hints(&self) -> &'static str {
        HINTS
    }
}

/// Counter whose value survives remounts
#[derive(Debug, Default)]
pub struct CounterV2;

impl CounterV2 {
    fn count(ctx: &ArtifactContext<'_>) -> i64 {
        let key = ctx.key::<i64>("count");
        ctx.read(&key, 0).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable counter state");
            0
        })
    }
}

impl Artifact for CounterV2 {
    fn render(&mut self, ctx: &mut ArtifactContext<'_>) -> Text<'static> {
        let mut text = card("Persistent Counter", Self::count(ctx));
        text.lines.push(muted("[r] Reset"));
        text
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut ArtifactContext<'_>) -> bool {
        let next = match (delta(&key), key.code) {
            (Some(d), _) => Self::count(ctx) + d,
            (None, KeyCode::Char('r')) => 0,
            _ => return false,
        };

        let stored = ctx.key::<i64>("count");
        if let Err(e) = ctx.write(&stored, &next) {
            ctx.toast(ToastLevel::Error, e.to_string());
        } else if key.code == KeyCode::Char('r') {
            ctx.toast(ToastLevel::Success, "Counter reset");
        }
        true
    }

    fn hints(&self) -> &'static str {
        "+/- change  r reset"
    }
}
