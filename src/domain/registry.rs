//! Artifact grouping
//!
//! Folds discovered descriptors into named groups. Each group lists its
//! versions newest first; the first entry is what default links point to.
//!
//! The registry is built once at startup and never mutated afterwards.
//! Picking up new artifacts requires a restart.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::discovery::Descriptor;
use super::identity::ArtifactId;
use super::route::Route;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Artifact {id} was discovered twice: '{first}' and '{second}'")]
    Duplicate {
        id: ArtifactId,
        first: String,
        second: String,
    },
}

/// What to do when two modules claim the same (name, version)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The module discovered later replaces the earlier one
    #[default]
    LastWriteWins,
    /// Refuse to build the registry
    Error,
}

/// One version inside a group
#[derive(Debug, Clone)]
pub struct ArtifactVersion<L> {
    pub id: ArtifactId,
    /// Route this version is served at
    pub route_path: String,
    /// Label shown in navigation, e.g. `v2`
    pub label: String,
    /// Virtual module path it was discovered under
    pub module_path: String,
    pub versioned: bool,
    pub loader: L,
}

impl<L> ArtifactVersion<L> {
    pub fn version(&self) -> u32 {
        self.id.version()
    }
}

/// All versions of one named artifact
#[derive(Debug, Clone)]
pub struct ArtifactGroup<L> {
    name: String,
    versions: Vec<ArtifactVersion<L>>,
    is_versioned: bool,
}

impl<L> ArtifactGroup<L> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Versions, newest first
    pub fn versions(&self) -> &[ArtifactVersion<L>] {
        &self.versions
    }

    /// True if any module of the group used the versioned convention
    pub fn is_versioned(&self) -> bool {
        self.is_versioned
    }

    /// Target of default links: the newest version
    pub fn default_version(&self) -> Option<&ArtifactVersion<L>> {
        self.versions.first()
    }

    pub fn version(&self, version: u32) -> Option<&ArtifactVersion<L>> {
        self.versions.iter().find(|v| v.version() == version)
    }

    /// Entry served at the bare `/artifacts/<name>` route, if any
    fn unversioned(&self) -> Option<&ArtifactVersion<L>> {
        self.versions.iter().find(|v| !v.versioned)
    }
}

/// Immutable name -> group mapping
#[derive(Debug, Clone)]
pub struct ArtifactRegistry<L> {
    groups: BTreeMap<String, ArtifactGroup<L>>,
}

impl<L> ArtifactRegistry<L> {
    /// Builds the registry from discovered descriptors
    pub fn build(
        descriptors: impl IntoIterator<Item = Descriptor<L>>,
        policy: DuplicatePolicy,
    ) -> Result<Self, RegistryError> {
        let mut groups: BTreeMap<String, ArtifactGroup<L>> = BTreeMap::new();

        for descriptor in descriptors {
            let name = descriptor.id.name().to_string();
            let group = groups.entry(name.clone()).or_insert_with(|| ArtifactGroup {
                name: name.clone(),
                versions: Vec::new(),
                is_versioned: false,
            });

            let route_path = if descriptor.versioned {
                descriptor.id.route_path()
            } else {
                format!("/artifacts/{}", name)
            };

            let entry = ArtifactVersion {
                label: format!("v{}", descriptor.id.version()),
                id: descriptor.id,
                route_path,
                module_path: descriptor.path,
                versioned: descriptor.versioned,
                loader: descriptor.loader,
            };

            match group.versions.iter().position(|v| v.id == entry.id) {
                Some(existing) => match policy {
                    DuplicatePolicy::LastWriteWins => {
                        let replaced = &group.versions[existing].module_path;
                        tracing::warn!(
                            artifact = %entry.id,
                            replaced = %replaced,
                            by = %entry.module_path,
                            "duplicate artifact module, keeping the later one"
                        );
                        group.versions[existing] = entry;
                    }
                    DuplicatePolicy::Error => {
                        return Err(RegistryError::Duplicate {
                            first: group.versions[existing].module_path.clone(),
                            second: entry.module_path,
                            id: entry.id,
                        });
                    }
                },
                None => group.versions.push(entry),
            }
        }

        // Sort once after the fold: the set is static
        for group in groups.values_mut() {
            group.versions.sort_by(|a, b| b.version().cmp(&a.version()));
            group.is_versioned = group.versions.iter().any(|v| v.versioned);
        }

        Ok(Self { groups })
    }

    /// An empty registry
    pub fn empty() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    pub fn group(&self, name: &str) -> Option<&ArtifactGroup<L>> {
        self.groups.get(name)
    }

    /// Groups in name order
    pub fn groups(&self) -> impl Iterator<Item = &ArtifactGroup<L>> {
        self.groups.values()
    }

    pub fn get(&self, id: &ArtifactId) -> Option<&ArtifactVersion<L>> {
        self.group(id.name())?.version(id.version())
    }

    /// Version N-1 of the given identity, if it is registered
    pub fn previous_version(&self, id: &ArtifactId) -> Option<&ArtifactVersion<L>> {
        self.get(&id.previous()?)
    }

    /// Resolves an artifact route to a registered version
    ///
    /// `/artifacts/<name>` resolves to the group's unversioned entry when it
    /// has one, otherwise to its newest version.
    pub fn resolve(&self, route: &Route) -> Option<&ArtifactVersion<L>> {
        match route {
            Route::Artifact {
                name,
                version: Some(version),
            } => self.group(name)?.version(*version).filter(|v| v.versioned),
            Route::Artifact {
                name,
                version: None,
            } => {
                let group = self.group(name)?;
                group.unversioned().or_else(|| group.default_version())
            }
            _ => None,
        }
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of registered versions across all groups
    pub fn version_count(&self) -> usize {
        self.groups.values().map(|g| g.versions.len()).sum()
    }
}
