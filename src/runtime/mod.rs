//! Artifact runtime: loading, isolation and shared state
//!
//! Everything here runs on the UI thread except loaders, which the
//! [`LoadQueue`] invokes on worker threads.

mod artifact;
mod gallery;
mod guard;
mod loader;
mod state;
mod toast;

pub use artifact::{Artifact, ArtifactContext, ArtifactLoader, LoadError, Registry};
pub use gallery::{FailurePanel, Gallery, View};
pub use guard::{catch, BoundaryState, CaughtPanic, RenderGuard};
pub use loader::{invoke, ArtifactOutlet, Completion, LoadFailure, LoadQueue, LoadResult, LoadTicket, MountPhase};
pub use state::{StateError, StateKey, StateStore, SubscriptionId};
pub use toast::{Toast, ToastLevel, ToastQueue};
