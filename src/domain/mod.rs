//! Domain models for the artifact gallery
//!
//! Discovery, grouping, routing and navigation logic without any I/O or
//! rendering concerns. The registry is generic over the loader type so it
//! can be exercised with plain values in tests.

mod identity;
mod discovery;
mod registry;
mod route;
mod navigation;
mod failure;

pub use identity::{capitalize, ArtifactId, IdentityError};
pub use discovery::{discover, extract_name, extract_version, Descriptor, Discovery, DiscoveryError};
pub use registry::{ArtifactGroup, ArtifactRegistry, ArtifactVersion, DuplicatePolicy, RegistryError};
pub use route::{parse_version_segment, Route};
pub use navigation::{breadcrumbs, sidebar, ArtifactLink, Crumb, PageLink, SidebarModel, VersionLink};
pub use failure::{FailureCategory, FailureInfo, FailurePhase};
