//! # Storage Layer
//!
//! Everything the gallery reads from disk.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Project config | TOML | `gallery.toml` at the project root |
//! | Global config | TOML | `<config dir>/gallery/config.toml` |
//! | Document artifacts | Markdown/text + YAML front matter | `<artifact dir>/<name>/v<N>/index.md` |
//!
//! ## Project Structure
//!
//! ```text
//! my-gallery/
//! ├── gallery.toml
//! └── artifacts/
//!     ├── notes/
//!     │   ├── v1/index.md
//!     │   └── v2/index.md
//!     └── changelog.txt      # legacy, unversioned
//! ```
//!
//! Nothing the gallery does at runtime is written back; state lives only
//! for the lifetime of the process.

mod config;
mod sources;

pub use config::{Config, ConfigError, GlobalConfig, LogConfig, ProjectConfig, PROJECT_FILE};
pub use sources::{scan_directory, Catalog, DOCUMENT_EXTENSIONS};
