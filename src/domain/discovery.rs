//! Artifact discovery
//!
//! Turns a virtual module tree (path -> deferred loader) into descriptors.
//!
//! Path conventions:
//! - Versioned: `./artifacts/<name>/v<N>/index.<ext>`
//! - Legacy: `./artifacts/<name>.<ext>` (version 1, unversioned route)
//!
//! Anything else is reported as a [`DiscoveryError`] and skipped.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::identity::ArtifactId;

static VERSION_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|/)v(\d+)(?:/|$)").expect("valid version regex"));

/// Root segment every artifact module lives under
const ARTIFACTS_ROOT: &str = "artifacts";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DiscoveryError {
    #[error("'{0}' does not follow artifacts/<name>/v<N>/index.* or artifacts/<name>.*")]
    ConventionViolation(String),

    #[error("'{path}' declares version {version}; versions start at 1")]
    InvalidVersion { path: String, version: String },
}

/// One discovered implementation of one version of one artifact
#[derive(Debug, Clone)]
pub struct Descriptor<L> {
    pub id: ArtifactId,
    /// Virtual path the module was discovered under
    pub path: String,
    /// True when discovered under the `v<N>/index` convention
    pub versioned: bool,
    pub loader: L,
}

/// Outcome of a discovery scan
#[derive(Debug)]
pub struct Discovery<L> {
    pub descriptors: Vec<Descriptor<L>>,
    pub rejected: Vec<DiscoveryError>,
}

/// Version from the first `v<digits>` path segment, defaulting to 1
pub fn extract_version(path: &str) -> u32 {
    VERSION_SEGMENT
        .captures(path)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(1)
}

/// Name from the parent-of-parent directory of the module file
pub fn extract_name(path: &str) -> Option<&str> {
    let parts = segments(path);
    if parts.len() < 3 {
        return None;
    }
    Some(parts[parts.len() - 3]).filter(|name| !name.is_empty())
}

/// Classifies every entry of the module tree
pub fn discover<L>(entries: impl IntoIterator<Item = (String, L)>) -> Discovery<L> {
    let mut descriptors = Vec::new();
    let mut rejected = Vec::new();

    for (path, loader) in entries {
        match classify(&path) {
            Ok((id, versioned)) => descriptors.push(Descriptor {
                id,
                path,
                versioned,
                loader,
            }),
            Err(e) => rejected.push(e),
        }
    }

    Discovery {
        descriptors,
        rejected,
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

fn classify(path: &str) -> Result<(ArtifactId, bool), DiscoveryError> {
    let violation = || DiscoveryError::ConventionViolation(path.to_string());

    let parts = segments(path);
    let root = parts
        .iter()
        .position(|s| *s == ARTIFACTS_ROOT)
        .ok_or_else(violation)?;
    let rest = &parts[root + 1..];

    match rest {
        // artifacts/<name>.<ext>
        [file] => {
            let (stem, ext) = file.rsplit_once('.').ok_or_else(violation)?;
            if stem.is_empty() || ext.is_empty() {
                return Err(violation());
            }
            let id = ArtifactId::new(stem, 1).map_err(|_| violation())?;
            Ok((id, false))
        }
        // artifacts/[...]/<name>/v<N>/index.<ext>
        [.., name, version_dir, file] if !name.is_empty() => {
            let digits = version_dir.strip_prefix('v').ok_or_else(violation)?;
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(violation());
            }
            let stem = file.split('.').next().unwrap_or_default();
            if stem != "index" {
                return Err(violation());
            }

            let version = extract_version(path);
            let invalid = || DiscoveryError::InvalidVersion {
                path: path.to_string(),
                version: digits.to_string(),
            };
            // Must agree with the segment the convention points at
            if digits.parse::<u32>().ok() != Some(version) {
                return Err(invalid());
            }
            let id = ArtifactId::new(*name, version).map_err(|_| invalid())?;
            Ok((id, true))
        }
        _ => Err(violation()),
    }
}
