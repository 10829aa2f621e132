//! Artifact identity
//!
//! An artifact is addressed by its logical name plus a version number.
//!
//! Forms:
//! - Display: `Counter (v2)` (first letter upper-cased)
//! - Key: `counter.v2` (used by the state store and in logs)
//! - Route: `/artifacts/counter/v2`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdentityError {
    #[error("Invalid artifact key: expected '{{name}}.v{{version}}', got '{0}'")]
    InvalidKey(String),

    #[error("Artifact versions start at 1, got {0}")]
    ZeroVersion(u32),
}

/// The (name, version) pair that uniquely addresses a mounted artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId {
    name: String,
    version: u32,
}

impl ArtifactId {
    /// Creates an identity; versions are 1-based
    pub fn new(name: impl Into<String>, version: u32) -> Result<Self, IdentityError> {
        if version == 0 {
            return Err(IdentityError::ZeroVersion(version));
        }
        Ok(Self {
            name: name.into(),
            version,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Route of this exact version
    pub fn route_path(&self) -> String {
        format!("/artifacts/{}/v{}", self.name, self.version)
    }

    /// Identity of version N-1, if N > 1
    pub fn previous(&self) -> Option<ArtifactId> {
        (self.version > 1).then(|| ArtifactId {
            name: self.name.clone(),
            version: self.version - 1,
        })
    }

    /// Human-readable form, e.g. `Timer (v2)`
    pub fn display_name(&self) -> String {
        format!("{} (v{})", capitalize(&self.name), self.version)
    }
}

/// Upper-cases the first character, leaving the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.v{}", self.name, self.version)
    }
}

impl FromStr for ArtifactId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, version) = s
            .rsplit_once(".v")
            .ok_or_else(|| IdentityError::InvalidKey(s.to_string()))?;

        if name.is_empty() {
            return Err(IdentityError::InvalidKey(s.to_string()));
        }

        let version: u32 = version
            .parse()
            .map_err(|_| IdentityError::InvalidKey(s.to_string()))?;

        ArtifactId::new(name, version)
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_capitalizes() {
        let id = ArtifactId::new("timer", 2).unwrap();
        assert_eq!(id.display_name(), "Timer (v2)");
    }

    #[test]
    fn display_name_keeps_hyphens() {
        let id = ArtifactId::new("binary-compare-swatch", 1).unwrap();
        assert_eq!(id.display_name(), "Binary-compare-swatch (v1)");
    }

    #[test]
    fn key_round_trip() {
        let id: ArtifactId = "counter.v12".parse().unwrap();
        assert_eq!(id.name(), "counter");
        assert_eq!(id.version(), 12);
        assert_eq!(id.to_string(), "counter.v12");
    }

    #[test]
    fn key_with_dotted_name() {
        let id: ArtifactId = "a.vision.v3".parse().unwrap();
        assert_eq!(id.name(), "a.vision");
        assert_eq!(id.version(), 3);
    }

    #[test]
    fn invalid_keys() {
        assert!("counter".parse::<ArtifactId>().is_err());
        assert!(".v1".parse::<ArtifactId>().is_err());
        assert!("counter.vx".parse::<ArtifactId>().is_err());
        assert_eq!(
            "counter.v0".parse::<ArtifactId>(),
            Err(IdentityError::ZeroVersion(0))
        );
    }

    #[test]
    fn route_path() {
        let id = ArtifactId::new("counter", 1).unwrap();
        assert_eq!(id.route_path(), "/artifacts/counter/v1");
    }

    #[test]
    fn previous_version() {
        let v2 = ArtifactId::new("counter", 2).unwrap();
        assert_eq!(v2.previous(), Some(ArtifactId::new("counter", 1).unwrap()));

        let v1 = ArtifactId::new("counter", 1).unwrap();
        assert_eq!(v1.previous(), None);
    }

    #[test]
    fn capitalize_edge_cases() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("x"), "X");
        assert_eq!(capitalize("Already"), "Already");
    }
}
