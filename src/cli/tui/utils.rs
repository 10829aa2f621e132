//! Shared utilities for TUI views

use ratatui::layout::Rect;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncate_at = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(truncate_at).collect();
        format!("{}...", truncated)
    }
}

/// A three-row box right-aligned inside `area`, starting at row `y`.
///
/// Returns `None` once the box would spill past the bottom edge.
pub fn toast_area(area: Rect, width: u16, y: u16) -> Option<Rect> {
    const HEIGHT: u16 = 3;
    let width = width.min(area.width);
    if width == 0 || y < area.y || y + HEIGHT > area.y + area.height {
        return None;
    }
    let x = area.x + area.width - width;
    Some(Rect::new(x, y, width, HEIGHT))
}
