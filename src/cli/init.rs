//! `gallery init`: scaffold a gallery project

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::Output;
use crate::storage::{Config, ProjectConfig, PROJECT_FILE};

#[derive(Debug, Error)]
pub enum InitError {
    #[error("Gallery already exists at {0}")]
    AlreadyExists(PathBuf),
}

const SAMPLE_DOCUMENT: &str = "---
title: Welcome
summary: A document artifact discovered from disk
---
Every file under artifacts/<name>/v<N>/index.md becomes an artifact.

Add artifacts/welcome/v2/index.md next to this one and the gallery
lists both versions, newest first.
";

/// Creates `gallery.toml` and a sample artifact under `root`
pub fn init(root: &Path) -> Result<PathBuf> {
    let config_path = root.join(PROJECT_FILE);
    if config_path.exists() {
        return Err(InitError::AlreadyExists(root.to_path_buf()).into());
    }

    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create directory: {}", root.display()))?;

    let project = ProjectConfig::default();
    Config::save_project(root, &project)?;

    let sample = root.join("artifacts").join("welcome").join("v1");
    fs::create_dir_all(&sample)
        .with_context(|| format!("Failed to create artifact directory: {}", sample.display()))?;

    let sample_file = sample.join("index.md");
    if !sample_file.exists() {
        fs::write(&sample_file, SAMPLE_DOCUMENT)
            .with_context(|| format!("Failed to write sample artifact: {}", sample_file.display()))?;
    }

    Ok(config_path)
}

pub fn run(output: &Output, path: &str) -> Result<()> {
    output.verbose_ctx("init", &format!("Initializing gallery at: {}", path));
    let config_path = init(Path::new(path))?;
    output.verbose_ctx("init", &format!("Wrote {}", config_path.display()));
    output.success(&format!("Initialized gallery at {}", path));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn scaffolds_project() {
        let dir = TempDir::new().unwrap();
        init(dir.path()).unwrap();

        assert!(dir.path().join(PROJECT_FILE).is_file());
        assert!(dir.path().join("artifacts/welcome/v1/index.md").is_file());

        let config = Config::for_project(dir.path()).unwrap();
        assert_eq!(config.project, ProjectConfig::default());
    }

    #[test]
    fn refuses_existing_project() {
        let dir = TempDir::new().unwrap();
        init(dir.path()).unwrap();

        let err = init(dir.path()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
