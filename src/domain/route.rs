//! Client-side routes
//!
//! | Path | Route |
//! |------|-------|
//! | `/` | [`Route::Home`] |
//! | `/artifacts` | [`Route::Artifacts`] |
//! | `/research` | [`Route::Research`] |
//! | `/demos` | [`Route::Demos`] |
//! | `/artifacts/<name>/v<N>` | [`Route::Artifact`] with a version |
//! | `/artifacts/<name>` | [`Route::Artifact`] without a version |

use std::fmt;

use super::identity::ArtifactId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Artifacts,
    Research,
    Demos,
    Artifact {
        name: String,
        version: Option<u32>,
    },
    NotFound(String),
}

impl Route {
    /// Parses a path; unknown paths become [`Route::NotFound`]
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["artifacts"] => Route::Artifacts,
            ["research"] => Route::Research,
            ["demos"] => Route::Demos,
            ["artifacts", name] => Route::Artifact {
                name: name.to_string(),
                version: None,
            },
            ["artifacts", name, version] => match parse_version_segment(version) {
                Some(v) => Route::Artifact {
                    name: name.to_string(),
                    version: Some(v),
                },
                None => Route::NotFound(normalize(path)),
            },
            _ => Route::NotFound(normalize(path)),
        }
    }

    /// Route of an exact artifact version
    pub fn artifact(id: &ArtifactId) -> Self {
        Route::Artifact {
            name: id.name().to_string(),
            version: Some(id.version()),
        }
    }

    /// Canonical path of the route
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Artifacts => "/artifacts".to_string(),
            Route::Research => "/research".to_string(),
            Route::Demos => "/demos".to_string(),
            Route::Artifact {
                name,
                version: Some(v),
            } => format!("/artifacts/{}/v{}", name, v),
            Route::Artifact {
                name,
                version: None,
            } => format!("/artifacts/{}", name),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn is_artifact(&self) -> bool {
        matches!(self, Route::Artifact { .. })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// `v12` -> 12; `v0` and anything else -> None
pub fn parse_version_segment(segment: &str) -> Option<u32> {
    let digits = segment.strip_prefix('v')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|v| *v > 0)
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
