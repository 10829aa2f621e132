//! `gallery show`: resolve, load and render a route once, headless

use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use super::output::plain_lines;
use super::{render, Output};
use crate::domain::FailureInfo;
use crate::runtime::{Gallery, MountPhase, Registry, View};

/// How long a headless load may take before the placeholder is printed
const LOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct ShowReport {
    requested: String,
    route: String,
    view: &'static str,
    breadcrumbs: Vec<String>,
    content: Vec<String>,
    failure: Option<FailureInfo>,
    previous_version: Option<String>,
}

fn view_kind(view: &View) -> &'static str {
    match view {
        View::Page(_) => "page",
        View::Loading(_) => "loading",
        View::Artifact { .. } => "artifact",
        View::Failed(_) => "failed",
    }
}

pub fn run(output: &Output, registry: Registry, requested: &str, show_stack: bool) -> Result<()> {
    let mut gallery = Gallery::new(registry, 1);
    let route = gallery.navigate(requested).clone();
    output.verbose_ctx("show", &format!("{} resolved to {}", requested, route));

    if gallery.phase() == Some(MountPhase::Loading) {
        let phase = gallery.wait_for_load(LOAD_TIMEOUT);
        output.verbose_ctx("show", &format!("load settled: {:?}", phase));
    }

    let view = gallery.view();
    let content = render::view(&view, gallery.registry(), show_stack);
    let crumbs = gallery.breadcrumbs();

    if output.is_json() {
        let (failure, previous_version) = match &view {
            View::Failed(panel) => (Some(panel.info.clone()), panel.previous_version.clone()),
            _ => (None, None),
        };
        return output.data(&ShowReport {
            requested: requested.to_string(),
            route: route.path(),
            view: view_kind(&view),
            breadcrumbs: crumbs.into_iter().map(|c| c.label).collect(),
            content: plain_lines(&content),
            failure,
            previous_version,
        });
    }

    if !crumbs.is_empty() {
        let trail: Vec<_> = crumbs.iter().map(|c| c.label.as_str()).collect();
        println!("{}", trail.join(" > "));
        println!();
    }
    output.text(&content);
    Ok(())
}
