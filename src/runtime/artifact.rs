//! The artifact contract
//!
//! An artifact is a small interactive component. The gallery loads it on
//! demand through an [`ArtifactLoader`], then drives it with render, key and
//! tick calls, each wrapped in the artifact's failure boundary.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::text::Text;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::state::{StateError, StateKey, StateStore};
use super::toast::{ToastLevel, ToastQueue};
use crate::domain::{ArtifactId, ArtifactRegistry, FailureCategory};

/// Registry of loadable artifacts
pub type Registry = ArtifactRegistry<ArtifactLoader>;

/// Why a module could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Module not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read module {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("{0}")]
    Other(String),
}

impl LoadError {
    /// Failure category implied by the cause, without reading the message
    pub fn category(&self) -> FailureCategory {
        match self {
            LoadError::NotFound(_) | LoadError::Read { .. } => FailureCategory::InvalidModule,
            LoadError::Parse { .. } => FailureCategory::Syntax,
            LoadError::Other(message) => FailureCategory::classify(message),
        }
    }
}

/// An interactive component hosted by the gallery
pub trait Artifact: Send {
    /// Produces the artifact's content for the viewport
    fn render(&mut self, ctx: &mut ArtifactContext<'_>) -> Text<'static>;

    /// Handles a key while the viewport has focus; returns true if consumed
    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut ArtifactContext<'_>) -> bool {
        false
    }

    /// Called on every UI tick while mounted
    fn tick(&mut self, _ctx: &mut ArtifactContext<'_>) {}

    /// Key hints shown in the status bar while focused
    fn hints(&self) -> &'static str {
        ""
    }
}

type LoadFn = dyn Fn() -> Result<Box<dyn Artifact>, LoadError> + Send + Sync;

/// Deferred, side-effect-free constructor for one artifact module
#[derive(Clone)]
pub struct ArtifactLoader {
    load: Arc<LoadFn>,
}

impl ArtifactLoader {
    pub fn new<F>(load: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Artifact>, LoadError> + Send + Sync + 'static,
    {
        Self {
            load: Arc::new(load),
        }
    }

    /// Loader for an artifact type with a default state
    pub fn of<A>() -> Self
    where
        A: Artifact + Default + 'static,
    {
        Self::new(|| Ok(Box::new(A::default())))
    }

    /// Invokes the loader
    pub fn load(&self) -> Result<Box<dyn Artifact>, LoadError> {
        (self.load)()
    }
}

impl fmt::Debug for ArtifactLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactLoader").finish_non_exhaustive()
    }
}

/// What a mounted artifact can reach while it runs
pub struct ArtifactContext<'a> {
    id: &'a ArtifactId,
    state: &'a mut StateStore,
    toasts: &'a mut ToastQueue,
}

impl<'a> ArtifactContext<'a> {
    pub fn new(id: &'a ArtifactId, state: &'a mut StateStore, toasts: &'a mut ToastQueue) -> Self {
        Self { id, state, toasts }
    }

    /// Identity of the mounted artifact
    pub fn id(&self) -> &ArtifactId {
        self.id
    }

    /// Key scoped to this artifact identity, e.g. `counter.v2/count`
    pub fn key<T>(&self, field: &str) -> StateKey<T> {
        StateKey::scoped(self.id, field)
    }

    pub fn read<T: DeserializeOwned>(&self, key: &StateKey<T>, initial: T) -> Result<T, StateError> {
        self.state.read(key, initial)
    }

    pub fn write<T: Serialize>(&mut self, key: &StateKey<T>, value: &T) -> Result<(), StateError> {
        self.state.write(key, value)
    }

    pub fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toasts.push(level, message);
    }
}
