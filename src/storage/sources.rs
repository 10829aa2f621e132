//! Module sources
//!
//! Assembles the virtual module tree the registry is built from: the
//! compiled-in catalog first, then every document found in the configured
//! artifact directories. A directory entry with the same name and version as
//! a built-in comes later and therefore replaces it under the
//! last-write-wins policy.

use std::path::{Component, Path};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

use super::Config;
use crate::artifacts::{builtin_modules, document_loader};
use crate::domain::{capitalize, discover, ArtifactRegistry, DiscoveryError};
use crate::runtime::{ArtifactLoader, Registry};

/// File extensions picked up as document artifacts
pub const DOCUMENT_EXTENSIONS: &[&str] = &["md", "txt"];

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
}

/// `./artifacts/<relative path>` with forward slashes
fn virtual_path(relative: &Path) -> Option<String> {
    let mut segments = vec![".".to_string(), "artifacts".to_string()];
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_str()?.to_string()),
            _ => return None,
        }
    }
    Some(segments.join("/"))
}

/// Title used when a document has no front matter title
fn fallback_title(relative: &Path) -> String {
    let stem = relative.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let name = if stem == "index" {
        relative
            .parent()
            .and_then(Path::parent)
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or(stem)
    } else {
        stem
    };
    capitalize(&name.replace('-', " "))
}

/// Documents under `dir` as (virtual path, lazy loader) pairs
///
/// Files are not read here. A missing directory yields nothing.
pub fn scan_directory(dir: &Path) -> Vec<(String, ArtifactLoader)> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "artifact directory does not exist");
        return Vec::new();
    }

    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_document(e.path()))
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(dir).ok()?;
            let path = virtual_path(relative)?;
            let loader = document_loader(entry.path().to_path_buf(), fallback_title(relative));
            Some((path, loader))
        })
        .collect()
}

/// The registry plus what discovery rejected
pub struct Catalog {
    pub registry: Registry,
    pub rejected: Vec<DiscoveryError>,
}

impl Catalog {
    /// Discovers and groups every configured module
    pub fn load(config: &Config) -> Result<Self> {
        let mut modules = Vec::new();
        if config.project.include_builtin {
            modules.extend(builtin_modules());
        }
        for dir in config.artifact_dirs() {
            let found = scan_directory(&dir);
            tracing::debug!(dir = %dir.display(), modules = found.len(), "scanned artifact directory");
            modules.extend(found);
        }

        Self::from_modules(modules, config)
    }

    pub fn from_modules(modules: Vec<(String, ArtifactLoader)>, config: &Config) -> Result<Self> {
        let discovery = discover(modules);
        for rejected in &discovery.rejected {
            tracing::warn!(error = %rejected, "skipping artifact module");
        }

        let registry = ArtifactRegistry::build(discovery.descriptors, config.project.duplicates)
            .context("Failed to build artifact registry")?;
        tracing::info!(
            groups = registry.len(),
            versions = registry.version_count(),
            rejected = discovery.rejected.len(),
            "artifact registry built"
        );

        Ok(Self {
            registry,
            rejected: discovery.rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtifactId, DuplicatePolicy};
    use crate::storage::{GlobalConfig, ProjectConfig};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn config(root: &Path, include_builtin: bool, duplicates: DuplicatePolicy) -> Config {
        Config {
            project: ProjectConfig {
                artifact_dirs: vec![PathBuf::from("artifacts")],
                include_builtin,
                duplicates,
                ..ProjectConfig::default()
            },
            global: GlobalConfig::default(),
            project_root: Some(root.to_path_buf()),
        }
    }

    #[test]
    fn virtual_paths() {
        assert_eq!(
            virtual_path(Path::new("notes/v2/index.md")).as_deref(),
            Some("./artifacts/notes/v2/index.md")
        );
        assert_eq!(virtual_path(Path::new("../escape.md")), None);
    }

    #[test]
    fn fallback_titles() {
        assert_eq!(fallback_title(Path::new("release-notes/v3/index.md")), "Release notes");
        assert_eq!(fallback_title(Path::new("changelog.txt")), "Changelog");
    }

    #[test]
    fn scan_finds_documents_only() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "notes/v1/index.md", "one");
        write(dir.path(), "notes/v2/index.md", "two");
        write(dir.path(), "legacy.txt", "old");
        write(dir.path(), "image.png", "");
        write(dir.path(), ".hidden/v1/index.md", "");

        let paths: Vec<_> = scan_directory(dir.path()).into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            vec![
                "./artifacts/legacy.txt",
                "./artifacts/notes/v1/index.md",
                "./artifacts/notes/v2/index.md",
            ]
        );
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(scan_directory(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn catalog_merges_sources() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "artifacts/notes/v1/index.md", "notes");
        write(dir.path(), "artifacts/notes/draft.md", "misplaced");

        let catalog = Catalog::load(&config(dir.path(), true, DuplicatePolicy::LastWriteWins)).unwrap();
        assert!(catalog.registry.group("counter").is_some());
        assert!(catalog.registry.group("notes").is_some());
        assert_eq!(catalog.rejected.len(), 1);
    }

    #[test]
    fn directory_overrides_builtin() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "artifacts/counter/v1/index.md", "replacement");

        let catalog = Catalog::load(&config(dir.path(), true, DuplicatePolicy::LastWriteWins)).unwrap();
        let id = ArtifactId::new("counter", 1).unwrap();
        assert_eq!(
            catalog.registry.get(&id).unwrap().module_path,
            "./artifacts/counter/v1/index.md"
        );
    }

    #[test]
    fn duplicate_error_policy_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "artifacts/counter/v1/index.md", "replacement");

        let result = Catalog::load(&config(dir.path(), true, DuplicatePolicy::Error));
        assert!(result.is_err());
    }

    #[test]
    fn builtin_can_be_excluded() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::load(&config(dir.path(), false, DuplicatePolicy::Error)).unwrap();
        assert!(catalog.registry.is_empty());
    }
}
