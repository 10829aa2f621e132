//! `gallery list` and `gallery routes`

use anyhow::Result;
use serde::Serialize;

use super::Output;
use crate::runtime::Registry;

#[derive(Debug, Serialize)]
struct VersionRow {
    version: u32,
    label: String,
    route: String,
    module: String,
}

#[derive(Debug, Serialize)]
struct GroupRow {
    name: String,
    versioned: bool,
    default_route: Option<String>,
    versions: Vec<VersionRow>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RouteRow {
    pub route: String,
    pub target: String,
}

fn groups(registry: &Registry) -> Vec<GroupRow> {
    registry
        .groups()
        .map(|group| GroupRow {
            name: group.name().to_string(),
            versioned: group.is_versioned(),
            default_route: group.default_version().map(|v| v.route_path.clone()),
            versions: group
                .versions()
                .iter()
                .map(|v| VersionRow {
                    version: v.version(),
                    label: v.label.clone(),
                    route: v.route_path.clone(),
                    module: v.module_path.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Prints every group with its versions
pub fn list(output: &Output, registry: &Registry) -> Result<()> {
    let rows = groups(registry);
    output.verbose_ctx("list", &format!("{} groups", rows.len()));

    if output.is_json() {
        return output.data(&rows);
    }

    if rows.is_empty() {
        println!("No artifacts found.");
        return Ok(());
    }

    println!("{:<24} {:<12} ROUTE", "NAME", "VERSIONS");
    for row in &rows {
        let versions: Vec<_> = row.versions.iter().map(|v| v.label.as_str()).collect();
        println!(
            "{:<24} {:<12} {}",
            row.name,
            versions.join(", "),
            row.default_route.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// The full route table
pub fn route_table(registry: &Registry) -> Vec<RouteRow> {
    let mut rows: Vec<RouteRow> = [
        ("/", "home"),
        ("/artifacts", "artifacts index"),
        ("/research", "research"),
        ("/demos", "demos"),
    ]
    .iter()
    .map(|&(route, target)| RouteRow {
        route: route.to_string(),
        target: target.to_string(),
    })
    .collect();

    for group in registry.groups() {
        let has_unversioned = group.versions().iter().any(|v| !v.versioned);
        if !has_unversioned {
            if let Some(default) = group.default_version() {
                rows.push(RouteRow {
                    route: format!("/artifacts/{}", group.name()),
                    target: format!("-> {}", default.route_path),
                });
            }
        }
        for version in group.versions() {
            rows.push(RouteRow {
                route: version.route_path.clone(),
                target: version.id.to_string(),
            });
        }
    }

    rows
}

pub fn routes(output: &Output, registry: &Registry) -> Result<()> {
    let rows = route_table(registry);

    if output.is_json() {
        return output.data(&rows);
    }

    for row in &rows {
        println!("{:<44} {}", row.route, row.target);
    }
    Ok(())
}
