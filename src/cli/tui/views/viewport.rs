//! Viewport: the active page, loading placeholder, artifact or failure panel

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::cli::render;
use crate::cli::tui::app::{App, Focus};
use crate::runtime::View;

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus() == Focus::Viewport;
    let show_stack = app.show_stack();

    let view = app.gallery_mut().view();
    let failed = matches!(view, View::Failed(_));
    let content = render::view(&view, app.gallery().registry(), show_stack);

    let border_style = match (failed, focused) {
        (true, _) => Style::default().fg(Color::Red),
        (false, true) => Style::default().fg(Color::Cyan),
        (false, false) => Style::default(),
    };

    let title = match app.gallery().current() {
        Some(id) => id.display_name(),
        None => app.gallery().route().path(),
    };

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
