//! Configuration handling for the gallery
//!
//! Configuration is stored in `gallery.toml` (project, found by walking up
//! from the current directory) and `<config dir>/gallery/config.toml`
//! (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DuplicatePolicy, Route};

/// Name of the project configuration file
pub const PROJECT_FILE: &str = "gallery.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directories scanned for document artifacts, relative to the project root
    pub artifact_dirs: Vec<PathBuf>,

    /// Include the compiled-in demo artifacts
    pub include_builtin: bool,

    /// What to do when two modules claim the same name and version
    pub duplicates: DuplicatePolicy,

    /// Route opened when the TUI starts without one
    pub start_route: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            artifact_dirs: vec![PathBuf::from("artifacts")],
            include_builtin: true,
            duplicates: DuplicatePolicy::default(),
            start_route: "/".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, overridden by `GALLERY_LOG`
    pub level: String,

    /// File the interactive TUI logs to; nothing is logged when unset
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// TUI tick interval
    pub tick_rate_ms: u64,

    /// Ticks a toast stays visible
    pub toast_ticks: u32,

    /// Expand stack traces on failure panels by default
    pub show_stack_traces: bool,

    pub log: LogConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            toast_ticks: 16,
            show_stack_traces: false,
            log: LogConfig::default(),
        }
    }
}

impl GlobalConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid("tick_rate_ms must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl ProjectConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.start_route.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "start_route '{}' must start with '/'",
                self.start_route
            )));
        }
        if let Route::NotFound(path) = Route::parse(&self.start_route) {
            return Err(ConfigError::Invalid(format!("start_route '{}' is not a gallery route", path)));
        }
        Ok(())
    }
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let (project, project_root) = Self::load_project()?;

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "artifact-gallery", "gallery").map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        let config: GlobalConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")?;
        config.validate().context("Failed to load global config")?;
        Ok(config)
    }

    fn load_project() -> Result<(ProjectConfig, Option<PathBuf>)> {
        match Self::find_project_root() {
            Some(root) => {
                let config = Self::load_project_config(&root)?;
                Ok((config, Some(root)))
            }
            None => Ok((ProjectConfig::default(), None)),
        }
    }

    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_FILE);

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;
        config.validate().context("Failed to load project config")?;
        Ok(config)
    }

    /// Finds the project root by looking for `gallery.toml`
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(current)
    }

    fn find_project_root_from(mut current: PathBuf) -> Option<PathBuf> {
        loop {
            if current.join(PROJECT_FILE).is_file() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Artifact directories resolved against the project root (or the
    /// current directory outside a project)
    pub fn artifact_dirs(&self) -> Vec<PathBuf> {
        let base = self
            .project_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default();

        self.project
            .artifact_dirs
            .iter()
            .map(|dir| if dir.is_absolute() { dir.clone() } else { base.join(dir) })
            .collect()
    }

    /// Writes a project configuration to `root`
    pub fn save_project(root: &Path, project: &ProjectConfig) -> Result<PathBuf> {
        let config_path = root.join(PROJECT_FILE);
        let content = toml::to_string_pretty(project).context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))?;
        Ok(config_path)
    }
}
