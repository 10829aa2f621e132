//! Sidebar: pages, then artifacts with the versions of the active one

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::cli::tui::app::{App, Focus, SidebarEntry};
use crate::cli::tui::utils::truncate_str;

fn item(entry: &SidebarEntry, width: usize) -> ListItem<'static> {
    let indent = "  ".repeat(entry.depth as usize);
    let marker = if entry.active { "•" } else { " " };
    let label = truncate_str(&entry.label, width.saturating_sub(indent.len() + 2));

    let style = match (entry.depth, entry.active) {
        (_, true) => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        (0, false) => Style::default().add_modifier(Modifier::BOLD),
        (2, false) => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    };

    ListItem::new(Line::from(vec![
        Span::raw(indent),
        Span::styled(format!("{} ", marker), style),
        Span::styled(label, style),
    ]))
}

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus() == Focus::Sidebar;
    // Borders and the highlight symbol
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = app.entries().iter().map(|e| item(e, width)).collect();

    let block_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title("Gallery")
                .borders(Borders::ALL)
                .border_style(block_style),
        )
        .highlight_style(
            Style::default()
                .bg(if focused { Color::DarkGray } else { Color::Black })
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.sidebar_index()));

    frame.render_stateful_widget(list, area, &mut state);
}
