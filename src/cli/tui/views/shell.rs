//! Shell layout: sidebar, breadcrumbs, viewport, status bar and toasts

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::{sidebar, viewport};
use crate::cli::render;
use crate::cli::tui::app::{App, Focus};
use crate::cli::tui::utils::{toast_area, truncate_str};
use crate::runtime::ToastLevel;

const SIDEBAR_WIDTH: u16 = 28;
const TOAST_WIDTH: u16 = 40;

/// Draw the whole shell
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Sidebar + content
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(main_chunks[0]);

    let content = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(columns[1]);

    sidebar::draw(frame, app, columns[0]);
    draw_breadcrumbs(frame, app, content[0]);
    viewport::draw(frame, app, content[1]);
    draw_status_bar(frame, app, main_chunks[1]);
    draw_toasts(frame, app, content[1]);
}

fn draw_breadcrumbs(frame: &mut Frame, app: &App, area: Rect) {
    let line = render::breadcrumb_line(&app.gallery().breadcrumbs());
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let focus = match app.focus() {
        Focus::Sidebar => "[sidebar]",
        Focus::Viewport => "[artifact]",
    };

    let keys = match app.focus() {
        Focus::Sidebar => "j/k:move  Enter:open  Tab:focus  g:home  R:reload  q:quit",
        Focus::Viewport => "Tab/Esc:sidebar  p:previous  s:stack  R:reload  q:quit",
    };
    let hints = app.gallery().hints();
    let help = if hints.is_empty() || app.focus() == Focus::Sidebar {
        keys.to_string()
    } else {
        format!("{}  |  {}", hints, keys)
    };

    let status = format!("Gallery {} {}  {}", focus, app.gallery().route(), help);
    let width = area.width.saturating_sub(2) as usize;

    let paragraph = Paragraph::new(truncate_str(&status, width))
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}

fn draw_toasts(frame: &mut Frame, app: &App, area: Rect) {
    let toasts = app.gallery().toasts();
    if toasts.is_empty() {
        return;
    }

    let width = TOAST_WIDTH.min(area.width.saturating_sub(2));
    let mut y = area.y + 1;
    for toast in toasts.visible() {
        let Some(rect) = toast_area(area, width, y) else {
            break;
        };
        let color = match toast.level {
            ToastLevel::Info => Color::Cyan,
            ToastLevel::Success => Color::Green,
            ToastLevel::Error => Color::Red,
        };
        let text = truncate_str(&toast.message, width.saturating_sub(2) as usize);

        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(color))
                .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color))),
            rect,
        );
        y += rect.height;
    }
}
