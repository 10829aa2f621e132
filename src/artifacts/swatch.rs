//! Binary comparison swatch card
//!
//! Lays swatches around the edge of a punched card: four square corners and
//! a row of trapezoids per side, each with a punched hole for binary
//! comparisons. All measurements are in inches.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;

use super::{heading, muted};
use crate::runtime::{Artifact, ArtifactContext};

const STEP: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwatchDimensions {
    pub width: f64,
    pub height: f64,
    pub swatch_size: f64,
    pub hole_diameter: f64,
}

impl Default for SwatchDimensions {
    fn default() -> Self {
        Self {
            width: 8.5,
            height: 11.0,
            swatch_size: 1.0,
            hole_diameter: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwatchLayout {
    pub effective_width_side: f64,
    pub effective_height_side: f64,
    pub swatches_per_width_side: u32,
    pub swatches_per_height_side: u32,
    pub top_bottom_swatch_width: f64,
    pub left_right_swatch_width: f64,
    pub regular_swatches: u32,
    pub corner_swatches: u32,
    pub total_swatches: u32,
    pub usable_width: f64,
    pub usable_percentage: f64,
}

impl SwatchLayout {
    /// `None` when a side has no room for a single swatch
    pub fn compute(dims: &SwatchDimensions) -> Option<Self> {
        let s = dims.swatch_size;
        if s <= 0.0 || dims.hole_diameter >= s {
            return None;
        }

        let effective_width_side = dims.width - 2.0 * s;
        let effective_height_side = dims.height - 2.0 * s;
        let per_width = (effective_width_side / s).floor();
        let per_height = (effective_height_side / s).floor();
        if per_width < 1.0 || per_height < 1.0 {
            return None;
        }

        let swatches_per_width_side = per_width as u32;
        let swatches_per_height_side = per_height as u32;
        let regular_swatches = 2 * (swatches_per_width_side + swatches_per_height_side);
        let usable_width = s - dims.hole_diameter;

        Some(Self {
            effective_width_side,
            effective_height_side,
            swatches_per_width_side,
            swatches_per_height_side,
            top_bottom_swatch_width: effective_width_side / per_width,
            left_right_swatch_width: effective_height_side / per_height,
            regular_swatches,
            corner_swatches: 4,
            total_swatches: regular_swatches + 4,
            usable_width,
            usable_percentage: usable_width / s * 100.0,
        })
    }
}

#[derive(Debug, Default)]
pub struct SwatchCard {
    dims: SwatchDimensions,
}

impl SwatchCard {
    fn diagram(layout: &SwatchLayout) -> Vec<Line<'static>> {
        let corner = Style::default().fg(Color::Gray);
        let horizontal = Style::default().fg(Color::Green);
        let vertical = Style::default().fg(Color::Red);

        let across = layout.swatches_per_width_side as usize;
        let edge = |style: Style| {
            let mut spans = vec![Span::styled("◼", corner)];
            spans.extend((0..across).map(|_| Span::styled("▤", style)));
            spans.push(Span::styled("◼", corner));
            Line::from(spans)
        };

        let mut lines = vec![edge(horizontal)];
        for _ in 0..layout.swatches_per_height_side {
            lines.push(Line::from(vec![
                Span::styled("▥", vertical),
                Span::raw(" ".repeat(across)),
                Span::styled("▥", vertical),
            ]));
        }
        lines.push(edge(horizontal));
        lines
    }
}

impl Artifact for SwatchCard {
    fn render(&mut self, _ctx: &mut ArtifactContext<'_>) -> Text<'static> {
        let d = &self.dims;
        let mut lines = vec![
            heading("Binary Comparison Swatch Card"),
            muted(format!(
                "Page {:.2}\" x {:.2}\"  swatch {:.2}\"  hole {:.2}\"",
                d.width, d.height, d.swatch_size, d.hole_diameter
            )),
            Line::default(),
        ];

        match SwatchLayout::compute(d) {
            Some(layout) => {
                lines.extend(Self::diagram(&layout));
                lines.push(Line::default());
                lines.extend(
                    [
                        format!(
                            "Top/bottom: {} swatches of {:.3}\"",
                            layout.swatches_per_width_side, layout.top_bottom_swatch_width
                        ),
                        format!(
                            "Left/right: {} swatches of {:.3}\"",
                            layout.swatches_per_height_side, layout.left_right_swatch_width
                        ),
                        format!(
                            "Total: {} ({} regular + {} corners)",
                            layout.total_swatches, layout.regular_swatches, layout.corner_swatches
                        ),
                        format!(
                            "Usable width: {:.2}\" ({:.0}%)",
                            layout.usable_width, layout.usable_percentage
                        ),
                    ]
                    .into_iter()
                    .map(Line::from),
                );
            }
            None => lines.push(Line::from(Span::styled(
                "Swatch size does not fit this page",
                Style::default().fg(Color::Yellow),
            ))),
        }

        lines.push(Line::default());
        lines.push(muted("w/W width  h/H height  s/S swatch  d/D hole"));
        Text::from(lines)
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut ArtifactContext<'_>) -> bool {
        let d = &mut self.dims;
        let (field, delta) = match key.code {
            KeyCode::Char('w') => (&mut d.width, -STEP),
            KeyCode::Char('W') => (&mut d.width, STEP),
            KeyCode::Char('h') => (&mut d.height, -STEP),
            KeyCode::Char('H') => (&mut d.height, STEP),
            KeyCode::Char('s') => (&mut d.swatch_size, -STEP),
            KeyCode::Char('S') => (&mut d.swatch_size, STEP),
            KeyCode::Char('d') => (&mut d.hole_diameter, -STEP),
            KeyCode::Char('D') => (&mut d.hole_diameter, STEP),
            _ => return false,
        };
        *field = (*field + delta).max(STEP);
        true
    }

    fn hints(&self) -> &'static str {
        "w/h/s/d adjust (shift grows)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn letter_page_layout() {
        let layout = SwatchLayout::compute(&SwatchDimensions::default()).unwrap();

        assert!(close(layout.effective_width_side, 6.5));
        assert!(close(layout.effective_height_side, 9.0));
        assert_eq!(layout.swatches_per_width_side, 6);
        assert_eq!(layout.swatches_per_height_side, 9);
        assert!(close(layout.top_bottom_swatch_width, 6.5 / 6.0));
        assert!(close(layout.left_right_swatch_width, 1.0));
        assert_eq!(layout.regular_swatches, 30);
        assert_eq!(layout.total_swatches, 34);
        assert!(close(layout.usable_percentage, 75.0));
    }

    #[test]
    fn oversized_swatch_has_no_layout() {
        let dims = SwatchDimensions {
            swatch_size: 4.0,
            ..SwatchDimensions::default()
        };
        assert!(SwatchLayout::compute(&dims).is_none());
    }

    #[test]
    fn hole_must_fit_swatch() {
        let dims = SwatchDimensions {
            hole_diameter: 1.0,
            ..SwatchDimensions::default()
        };
        assert!(SwatchLayout::compute(&dims).is_none());
    }

    #[test]
    fn diagram_matches_counts() {
        let layout = SwatchLayout::compute(&SwatchDimensions::default()).unwrap();
        let lines = SwatchCard::diagram(&layout);
        assert_eq!(lines.len(), 9 + 2);
        assert_eq!(lines[0].spans.len(), 6 + 2);
    }
}
