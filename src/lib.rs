//! Artifact Gallery - a terminal gallery of versioned artifacts
//!
//! Artifacts are discovered from module paths of the form
//! `./artifacts/<name>/v<N>/index.*`, grouped by name with versions newest
//! first, and mounted one at a time inside an error boundary so a crashing
//! artifact never takes the shell down with it.

pub mod domain;
pub mod runtime;
pub mod artifacts;
pub mod storage;
pub mod cli;

pub use domain::{ArtifactGroup, ArtifactId, ArtifactRegistry, ArtifactVersion, Route};
pub use runtime::{Artifact, ArtifactContext, ArtifactLoader, Gallery, StateKey, StateStore};
