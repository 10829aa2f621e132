//! Viewport content shared by the TUI and `gallery show`
//!
//! Everything here returns styled [`Text`]; the TUI draws it in the viewport
//! and headless commands flatten it to plain lines.

use ratatui::prelude::*;

use crate::artifacts::{blurb, category};
use crate::domain::{ArtifactId, Crumb, Route};
use crate::runtime::{FailurePanel, Registry, View};

const BULLET: &str = "⊹";

fn title(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        format!("{} {}", BULLET, text.into()),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn muted(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

fn link(label: impl Into<String>, href: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(label.into(), Style::default().fg(Color::Cyan)),
        Span::styled(format!("  {}", href.into()), Style::default().fg(Color::DarkGray)),
    ])
}

/// Breadcrumb trail, e.g. `Home > Artifacts > Timer (v2)`
pub fn breadcrumb_line(crumbs: &[Crumb]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, crumb) in crumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        }
        let style = if crumb.href.is_some() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        spans.push(Span::styled(crumb.label.clone(), style));
    }
    Line::from(spans)
}

/// Content for any view
pub fn view(view: &View, registry: &Registry, show_stack: bool) -> Text<'static> {
    match view {
        View::Page(route) => page(route, registry),
        View::Loading(id) => loading(id),
        View::Artifact { content, .. } => content.clone(),
        View::Failed(panel) => failure_panel(panel, show_stack),
    }
}

pub fn page(route: &Route, registry: &Registry) -> Text<'static> {
    match route {
        Route::Home => home(),
        Route::Artifacts => artifacts_index(registry),
        Route::Research => Text::from(vec![
            title("Research Findings"),
            Line::default(),
            Line::from("This section will contain research findings and documentation."),
        ]),
        Route::Demos => Text::from(vec![
            title("Cheeky Demos"),
            Line::default(),
            Line::from("This section will contain fun and experimental demos."),
        ]),
        Route::Artifact { .. } | Route::NotFound(_) => not_found(&route.path()),
    }
}

fn home() -> Text<'static> {
    Text::from(vec![
        muted(format!("{} Back at it!", BULLET)),
        Line::from(Span::styled(
            "Hello there. Pick an artifact from the sidebar, or start with the creative space.",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        title("Creative Space"),
        Line::from("Check out these interactive examples to see what's possible. What would you like to make today?"),
        link("Let's create", "/artifacts"),
        Line::default(),
        title("Helpful Hints"),
        Line::from("j/k move, Enter opens, Tab switches focus between the sidebar and the artifact."),
        Line::from("R reloads the whole gallery, q quits."),
    ])
}

fn artifacts_index(registry: &Registry) -> Text<'static> {
    let mut lines = vec![
        title("Let's create something"),
        muted("Browse these examples to see what's possible. Each artifact shows a different idea."),
        Line::default(),
    ];

    let count = |name: &str| registry.groups().filter(|g| category(g.name()) == Some(name)).count();
    lines.push(muted(format!(
        "Interactive ({})   Visualization ({})   All ({})",
        count("Interactive"),
        count("Visualization"),
        registry.len()
    )));

    if registry.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from("No artifacts found. Add one under artifacts/<name>/v1/index.md."));
    }

    for group in registry.groups() {
        let (heading, description) = blurb(group.name());
        lines.push(Line::default());
        lines.push(title(heading));
        lines.push(Line::from(description));
        for (i, version) in group.versions().iter().enumerate() {
            let label = if i == 0 {
                format!("{} (latest)", version.label)
            } else {
                version.label.clone()
            };
            lines.push(link(format!("  {}", label), version.route_path.clone()));
        }
    }

    Text::from(lines)
}

fn not_found(path: &str) -> Text<'static> {
    Text::from(vec![
        Line::from(Span::styled(
            "Page not found",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(format!("Nothing lives at {}.", path)),
        link("Back home", "/"),
    ])
}

/// Deterministic placeholder while a loader runs
pub fn loading(id: &ArtifactId) -> Text<'static> {
    let bar = |width: usize| muted("░".repeat(width));
    Text::from(vec![
        muted(format!("Loading {}...", id.display_name())),
        Line::default(),
        bar(32),
        bar(24),
        bar(28),
    ])
}

pub fn failure_panel(panel: &FailurePanel, show_stack: bool) -> Text<'static> {
    let info = &panel.info;
    let mut lines = vec![
        Line::from(Span::styled(
            info.title(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(info.message.clone()),
    ];

    if info.message != info.raw {
        lines.push(muted(format!("Details: {}", info.raw)));
    }
    lines.push(muted(format!(
        "Category: {}   Phase: {:?}",
        info.category.as_str(),
        info.phase
    )));

    lines.push(Line::default());
    match (&info.stack, show_stack) {
        (Some(stack), true) => {
            lines.push(muted("Stack trace:"));
            lines.extend(stack.lines().map(|l| muted(format!("  {}", l))));
        }
        (Some(_), false) => lines.push(muted("[s] Show stack trace")),
        (None, _) => {}
    }

    lines.push(Line::default());
    lines.push(Line::from("Recovery:"));
    lines.push(Line::from("  [R] Reload gallery"));
    if let Some(previous) = &panel.previous_version {
        let label = info
            .artifact
            .previous()
            .map(|id| format!("  [p] Try {}", id.display_name()))
            .unwrap_or_else(|| "  [p] Try previous version".to_string());
        lines.push(link(label, previous.clone()));
    }

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::builtin_modules;
    use crate::cli::output::plain_lines;
    use crate::domain::{breadcrumbs, discover, ArtifactRegistry, DuplicatePolicy, FailureInfo, FailurePhase};

    fn registry() -> Registry {
        ArtifactRegistry::build(discover(builtin_modules()).descriptors, DuplicatePolicy::Error).unwrap()
    }

    fn panel(version: u32, previous: Option<&str>, stack: Option<&str>) -> FailurePanel {
        FailurePanel {
            info: FailureInfo::new(
                ArtifactId::new("timer", version).unwrap(),
                FailurePhase::Render,
                "called `Option::unwrap()` on a `None` value",
                stack.map(String::from),
            ),
            previous_version: previous.map(String::from),
        }
    }

    #[test]
    fn breadcrumb_trail() {
        let line = breadcrumb_line(&breadcrumbs("/artifacts/timer/v2"));
        let plain: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(plain, "Home > Artifacts > Timer (v2)");
    }

    #[test]
    fn artifacts_index_lists_versions() {
        let lines = plain_lines(&page(&Route::Artifacts, &registry()));
        assert!(lines.contains(&"Interactive (2)   Visualization (1)   All (3)".to_string()));
        assert!(lines.contains(&"  v2 (latest)  /artifacts/counter/v2".to_string()));
        assert!(lines.contains(&"  v1  /artifacts/counter/v1".to_string()));
    }

    #[test]
    fn failure_panel_with_recovery_link() {
        let lines = plain_lines(&failure_panel(&panel(2, Some("/artifacts/timer/v1"), None), false));
        assert_eq!(lines[0], "Error in Timer (v2)");
        assert!(lines.contains(&"  [p] Try Timer (v1)  /artifacts/timer/v1".to_string()));
    }

    #[test]
    fn failure_panel_without_recovery_link() {
        let lines = plain_lines(&failure_panel(&panel(1, None, None), false));
        assert!(!lines.iter().any(|l| l.contains("[p]")));
    }

    #[test]
    fn stack_collapsed_by_default() {
        let p = panel(1, None, Some("at src/artifacts/timer.rs:10:9"));
        let collapsed = plain_lines(&failure_panel(&p, false));
        assert!(collapsed.contains(&"[s] Show stack trace".to_string()));

        let expanded = plain_lines(&failure_panel(&p, true));
        assert!(expanded.contains(&"  at src/artifacts/timer.rs:10:9".to_string()));
    }

    #[test]
    fn loading_is_deterministic() {
        let id = ArtifactId::new("counter", 2).unwrap();
        assert_eq!(plain_lines(&loading(&id)), plain_lines(&loading(&id)));
        assert_eq!(plain_lines(&loading(&id))[0], "Loading Counter (v2)...");
    }
}
