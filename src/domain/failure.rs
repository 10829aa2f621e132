//! Failure classification for the artifact failure panel
//!
//! Raw failure text (a panic message or a load error) is mapped onto a small
//! taxonomy so the panel can show a short, readable explanation. The raw text
//! is always kept alongside.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::identity::ArtifactId;

/// Categories shown on the failure panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// A property or value was read from something absent
    AbsentValue,
    /// Something that is not callable was invoked
    NotCallable,
    /// A network request made by the artifact failed
    Network,
    /// Loaded content could not be parsed
    Syntax,
    /// The module path or specifier does not resolve
    InvalidModule,
    Unclassified,
}

// Checked in order; first match wins. Patterns match whole words.
const RULES: &[(FailureCategory, &[&str])] = &[
    (
        FailureCategory::InvalidModule,
        &[
            "module not found",
            "failed to resolve module",
            "module specifier",
            "no such file",
        ],
    ),
    (
        FailureCategory::AbsentValue,
        &[
            "on a `none` value",
            "cannot read propert(?:y|ies)",
            "undefined",
            "null",
            "absent value",
        ],
    ),
    (
        FailureCategory::NotCallable,
        &["is not a function", "not callable", "no handler"],
    ),
    (
        FailureCategory::Network,
        &["network", "failed to fetch", "connection refused", "timed out", "dns"],
    ),
    (
        FailureCategory::Syntax,
        &["syntax", "parse error", "failed to parse", "utf-8", "unexpected token", "front matter"],
    ),
];

static MATCHERS: LazyLock<Vec<(FailureCategory, Regex)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(category, words)| {
            let pattern = format!(r"(?i)\b(?:{})\b", words.join("|"));
            (*category, Regex::new(&pattern).expect("valid failure rule"))
        })
        .collect()
});

impl FailureCategory {
    /// Classifies raw failure text by keyword
    ///
    /// Path-like tokens are ignored so an artifact's name or directory never
    /// decides the category.
    pub fn classify(raw: &str) -> Self {
        let text = raw
            .split_whitespace()
            .filter(|token| !token.contains('/') && !token.contains('\\'))
            .collect::<Vec<_>>()
            .join(" ");

        MATCHERS
            .iter()
            .find(|(_, matcher)| matcher.is_match(&text))
            .map(|(category, _)| *category)
            .unwrap_or(FailureCategory::Unclassified)
    }

    /// Short explanation, `None` for unclassified failures
    pub fn summary(&self) -> Option<&'static str> {
        match self {
            FailureCategory::AbsentValue => {
                Some("The artifact tried to use a value that does not exist.")
            }
            FailureCategory::NotCallable => {
                Some("The artifact tried to call something that is not callable.")
            }
            FailureCategory::Network => Some("A network request made by the artifact failed."),
            FailureCategory::Syntax => Some("The artifact's code or content could not be parsed."),
            FailureCategory::InvalidModule => {
                Some("The artifact module could not be found or imported.")
            }
            FailureCategory::Unclassified => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::AbsentValue => "absent_value",
            FailureCategory::NotCallable => "not_callable",
            FailureCategory::Network => "network",
            FailureCategory::Syntax => "syntax",
            FailureCategory::InvalidModule => "invalid_module",
            FailureCategory::Unclassified => "unclassified",
        }
    }
}

/// Where in the artifact lifecycle a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePhase {
    Load,
    Render,
    Input,
    Tick,
}

/// Everything the failure panel shows about one failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureInfo {
    pub artifact: ArtifactId,
    pub phase: FailurePhase,
    pub category: FailureCategory,
    /// Simplified message (category summary, or raw text when unclassified)
    pub message: String,
    /// Original failure text
    pub raw: String,
    /// Panic location and backtrace, when captured
    pub stack: Option<String>,
}

impl FailureInfo {
    pub fn new(
        artifact: ArtifactId,
        phase: FailurePhase,
        raw: impl Into<String>,
        stack: Option<String>,
    ) -> Self {
        let raw = raw.into();
        let category = FailureCategory::classify(&raw);
        Self::with_category(artifact, phase, category, raw, stack)
    }

    /// Builds a failure whose category is already known from its cause
    pub fn with_category(
        artifact: ArtifactId,
        phase: FailurePhase,
        category: FailureCategory,
        raw: impl Into<String>,
        stack: Option<String>,
    ) -> Self {
        let raw = raw.into();
        let message = category
            .summary()
            .map(String::from)
            .unwrap_or_else(|| raw.clone());

        Self {
            artifact,
            phase,
            category,
            message,
            raw,
            stack,
        }
    }

    /// Panel heading, e.g. `Error in Timer (v2)`
    pub fn title(&self) -> String {
        format!("Error in {}", self.artifact.display_name())
    }
}
