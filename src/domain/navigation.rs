//! Navigation models for the gallery chrome
//!
//! Breadcrumbs and the sidebar are derived from the current path and the
//! registry; nothing here renders.

use super::identity::capitalize;
use super::registry::ArtifactRegistry;
use super::route::{parse_version_segment, Route};

/// One breadcrumb; the current page has no link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub href: Option<String>,
}

/// Breadcrumbs for a path, empty on the home page
///
/// `/artifacts/binary-compare-swatch/v2` becomes
/// `Home > Artifacts > Binary compare swatch (v2)`.
pub fn breadcrumbs(path: &str) -> Vec<Crumb> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Vec::new();
    }

    let mut crumbs = vec![Crumb {
        label: "Home".to_string(),
        href: Some("/".to_string()),
    }];

    for (index, segment) in segments.iter().enumerate() {
        if parse_version_segment(segment).is_some() {
            continue;
        }

        let next_is_version = segments
            .get(index + 1)
            .is_some_and(|next| parse_version_segment(next).is_some());
        let is_last = index == segments.len() - 1 || (index == segments.len() - 2 && next_is_version);

        let mut label = capitalize(&segment.replace('-', " "));
        if is_last && next_is_version {
            label.push_str(&format!(" ({})", segments[index + 1]));
        }

        let href = (!is_last).then(|| format!("/{}", segments[..=index].join("/")));
        crumbs.push(Crumb { label, href });
    }

    crumbs
}

/// A top-level page link in the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub title: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// A version link under the active artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// An artifact group link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLink {
    pub name: String,
    pub title: String,
    /// Default version (newest)
    pub href: String,
    pub active: bool,
    /// Only filled for the active group
    pub versions: Vec<VersionLink>,
}

/// Everything the sidebar shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SidebarModel {
    pub pages: Vec<PageLink>,
    /// Only filled while browsing the artifacts section
    pub artifacts: Vec<ArtifactLink>,
}

const MAIN_PAGES: [(&str, &str); 4] = [
    ("Home", "/"),
    ("Creative Space", "/artifacts"),
    ("Research", "/research"),
    ("Demos", "/demos"),
];

/// Builds the sidebar for the current path
pub fn sidebar<L>(registry: &ArtifactRegistry<L>, path: &str) -> SidebarModel {
    let pages = MAIN_PAGES
        .iter()
        .map(|&(title, href)| PageLink {
            title,
            href,
            active: if href == "/" {
                path == "/"
            } else {
                path.starts_with(href)
            },
        })
        .collect();

    let in_artifacts = path.starts_with("/artifacts");
    let current_name = match Route::parse(path) {
        Route::Artifact { name, .. } => Some(name),
        _ => None,
    };

    let artifacts = if in_artifacts {
        registry
            .groups()
            .filter_map(|group| {
                let default = group.default_version()?;
                let active = current_name.as_deref() == Some(group.name());
                let versions = if active {
                    group
                        .versions()
                        .iter()
                        .map(|v| VersionLink {
                            label: v.label.clone(),
                            href: v.route_path.clone(),
                            active: v.route_path == path,
                        })
                        .collect()
                } else {
                    Vec::new()
                };

                Some(ArtifactLink {
                    name: group.name().to_string(),
                    title: capitalize(&group.name().replace('-', " ")),
                    href: default.route_path.clone(),
                    active,
                    versions,
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    SidebarModel { pages, artifacts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::discovery::discover;
    use crate::domain::registry::DuplicatePolicy;

    fn registry() -> ArtifactRegistry<()> {
        let discovery = discover(
            [
                "./artifacts/timer/v1/index.rs",
                "./artifacts/timer/v2/index.rs",
                "./artifacts/counter/v1/index.rs",
            ]
            .iter()
            .map(|p| (p.to_string(), ())),
        );
        ArtifactRegistry::build(discovery.descriptors, DuplicatePolicy::Error).unwrap()
    }

    fn crumb(label: &str, href: Option<&str>) -> Crumb {
        Crumb {
            label: label.to_string(),
            href: href.map(String::from),
        }
    }

    #[test]
    fn no_breadcrumbs_on_home() {
        assert!(breadcrumbs("/").is_empty());
    }

    #[test]
    fn breadcrumbs_for_page() {
        assert_eq!(
            breadcrumbs("/research"),
            vec![crumb("Home", Some("/")), crumb("Research", None)]
        );
    }

    #[test]
    fn breadcrumbs_for_versioned_artifact() {
        assert_eq!(
            breadcrumbs("/artifacts/binary-compare-swatch/v2"),
            vec![
                crumb("Home", Some("/")),
                crumb("Artifacts", Some("/artifacts")),
                crumb("Binary compare swatch (v2)", None),
            ]
        );
    }

    #[test]
    fn breadcrumbs_for_unversioned_artifact() {
        assert_eq!(
            breadcrumbs("/artifacts/notes"),
            vec![
                crumb("Home", Some("/")),
                crumb("Artifacts", Some("/artifacts")),
                crumb("Notes", None),
            ]
        );
    }

    #[test]
    fn sidebar_outside_artifacts() {
        let model = sidebar(&registry(), "/research");

        let active: Vec<_> = model.pages.iter().filter(|p| p.active).map(|p| p.title).collect();
        assert_eq!(active, vec!["Research"]);
        assert!(model.artifacts.is_empty());
    }

    #[test]
    fn sidebar_home_is_exact_match() {
        let model = sidebar(&registry(), "/demos");
        assert!(!model.pages[0].active);
        assert!(model.pages[3].active);
    }

    #[test]
    fn sidebar_lists_groups_with_default_links() {
        let model = sidebar(&registry(), "/artifacts");

        assert_eq!(model.artifacts.len(), 2);
        assert_eq!(model.artifacts[0].name, "counter");
        assert_eq!(model.artifacts[1].href, "/artifacts/timer/v2");
        assert!(model.artifacts.iter().all(|a| !a.active && a.versions.is_empty()));
    }

    #[test]
    fn sidebar_expands_active_group() {
        let model = sidebar(&registry(), "/artifacts/timer/v1");
        let timer = &model.artifacts[1];

        assert!(timer.active);
        assert_eq!(
            timer.versions,
            vec![
                VersionLink {
                    label: "v2".to_string(),
                    href: "/artifacts/timer/v2".to_string(),
                    active: false,
                },
                VersionLink {
                    label: "v1".to_string(),
                    href: "/artifacts/timer/v1".to_string(),
                    active: true,
                },
            ]
        );
    }
}
