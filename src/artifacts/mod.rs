//! Built-in artifacts
//!
//! The catalog below is the compiled-in module tree. Paths follow the same
//! conventions as artifacts found on disk, so they go through the same
//! discovery and grouping as everything else.

mod counter;
mod document;
mod swatch;
mod timer;

use ratatui::prelude::*;

use crate::domain::capitalize;
use crate::runtime::ArtifactLoader;

pub use counter::{CounterV1, CounterV2};
pub use document::{document_loader, parse_document, DocumentArtifact, FrontMatter};
pub use swatch::{SwatchCard, SwatchDimensions, SwatchLayout};
pub use timer::{TimerV1, TimerV2};

/// Compiled-in module tree: virtual path -> loader
pub fn builtin_modules() -> Vec<(String, ArtifactLoader)> {
    vec![
        ("./artifacts/counter/v1/index.rs", ArtifactLoader::of::<CounterV1>()),
        ("./artifacts/counter/v2/index.rs", ArtifactLoader::of::<CounterV2>()),
        ("./artifacts/timer/v1/index.rs", ArtifactLoader::of::<TimerV1>()),
        ("./artifacts/timer/v2/index.rs", ArtifactLoader::of::<TimerV2>()),
        (
            "./artifacts/binary-compare-swatch/v1/index.rs",
            ArtifactLoader::of::<SwatchCard>(),
        ),
    ]
    .into_iter()
    .map(|(path, loader)| (path.to_string(), loader))
    .collect()
}

/// Card heading and description for the artifacts index
pub fn blurb(name: &str) -> (String, String) {
    match name {
        "counter" => (
            "Click Counter".to_string(),
            "Count on me. A simple yet satisfying way to keep track of numbers that matter to you."
                .to_string(),
        ),
        "timer" => (
            "Time Tracker".to_string(),
            "Every second counts. A clean, intuitive timer for when you need to measure the moments."
                .to_string(),
        ),
        _ => {
            let title = capitalize(&name.replace('-', " "));
            let description = format!("A helpful {} to make your experience better.", title.to_lowercase());
            (title, description)
        }
    }
}

/// Index category of a built-in artifact
pub fn category(name: &str) -> Option<&'static str> {
    match name {
        "counter" | "timer" => Some("Interactive"),
        "binary-compare-swatch" => Some("Visualization"),
        _ => None,
    }
}

fn heading(title: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        title.into(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn muted(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{discover, ArtifactRegistry, DuplicatePolicy};

    #[test]
    fn catalog_follows_conventions() {
        let discovery = discover(builtin_modules());
        assert!(discovery.rejected.is_empty());

        let registry = ArtifactRegistry::build(discovery.descriptors, DuplicatePolicy::Error).unwrap();
        let names: Vec<_> = registry.groups().map(|g| g.name().to_string()).collect();
        assert_eq!(names, vec!["binary-compare-swatch", "counter", "timer"]);
        assert_eq!(registry.version_count(), 5);
    }

    #[test]
    fn blurbs() {
        assert_eq!(blurb("timer").0, "Time Tracker");
        let (title, description) = blurb("binary-compare-swatch");
        assert_eq!(title, "Binary compare swatch");
        assert_eq!(description, "A helpful binary compare swatch to make your experience better.");
    }
}
