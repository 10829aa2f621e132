//! Document artifacts
//!
//! Markdown or plain text files found in the configured artifact
//! directories. A file may start with YAML front matter:
//!
//! ```text
//! ---
//! title: Release notes
//! summary: What changed in v2
//! ---
//! Body text...
//! ```
//!
//! The file is read when the artifact is loaded, never at discovery.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use serde::Deserialize;

use super::{heading, muted};
use crate::runtime::{Artifact, ArtifactContext, ArtifactLoader, LoadError};

const FRONT_MATTER_DELIMITER: &str = "---";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentArtifact {
    pub title: String,
    pub summary: Option<String>,
    pub body: String,
}

/// Splits front matter from the body; `None` when the file has none
fn split_front_matter(contents: &str) -> Option<(&str, &str)> {
    let rest = contents.strip_prefix(FRONT_MATTER_DELIMITER)?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

/// Parses a document; `fallback_title` is used when front matter has no title
pub fn parse_document(path: &Path, contents: &str, fallback_title: &str) -> Result<DocumentArtifact, LoadError> {
    let (front, body) = match split_front_matter(contents) {
        Some((yaml, body)) if yaml.trim().is_empty() => (FrontMatter::default(), body),
        Some((yaml, body)) => {
            let front = serde_yaml::from_str(yaml).map_err(|e| LoadError::Parse {
                path: path.to_path_buf(),
                reason: format!("invalid front matter: {}", e),
            })?;
            (front, body)
        }
        None => (FrontMatter::default(), contents),
    };

    Ok(DocumentArtifact {
        title: front.title.unwrap_or_else(|| fallback_title.to_string()),
        summary: front.summary,
        body: body.trim_start_matches(['\r', '\n']).to_string(),
    })
}

/// Lazy loader reading `path` on each invocation
pub fn document_loader(path: PathBuf, fallback_title: String) -> ArtifactLoader {
    ArtifactLoader::new(move || {
        let bytes = fs::read(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LoadError::NotFound(path.clone()),
            _ => LoadError::Read {
                path: path.clone(),
                source,
            },
        })?;
        let contents = String::from_utf8(bytes).map_err(|_| LoadError::Parse {
            path: path.clone(),
            reason: "file is not valid UTF-8".to_string(),
        })?;

        let document = parse_document(&path, &contents, &fallback_title)?;
        Ok(Box::new(document))
    })
}

impl Artifact for DocumentArtifact {
    fn render(&mut self, ctx: &mut ArtifactContext<'_>) -> Text<'static> {
        let scroll = ctx.read(&ctx.key::<usize>("scroll"), 0).unwrap_or(0);

        let mut lines = vec![heading(self.title.clone())];
        if let Some(summary) = &self.summary {
            lines.push(muted(summary.clone()));
        }
        lines.push(Line::default());
        lines.extend(
            self.body
                .lines()
                .skip(scroll)
                .map(|l| Line::from(l.to_string())),
        );
        Text::from(lines)
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut ArtifactContext<'_>) -> bool {
        let key_name = ctx.key::<usize>("scroll");
        let scroll = ctx.read(&key_name, 0).unwrap_or(0);
        let max = self.body.lines().count().saturating_sub(1);

        let next = match key.code {
            KeyCode::Down | KeyCode::Char('J') => (scroll + 1).min(max),
            KeyCode::Up | KeyCode::Char('K') => scroll.saturating_sub(1),
            KeyCode::PageDown => (scroll + 10).min(max),
            KeyCode::PageUp => scroll.saturating_sub(10),
            _ => return false,
        };
        ctx.write(&key_name, &next).is_ok()
    }

    fn hints(&self) -> &'static str {
        "J/K scroll"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FailureCategory;
    use tempfile::TempDir;

    #[test]
    fn plain_document() {
        let doc = parse_document(Path::new("notes.md"), "Just text\nmore", "Notes").unwrap();
        assert_eq!(doc.title, "Notes");
        assert_eq!(doc.summary, None);
        assert_eq!(doc.body, "Just text\nmore");
    }

    #[test]
    fn front_matter_overrides_title() {
        let contents = "---\ntitle: Release notes\nsummary: What changed\n---\n\nBody\n";
        let doc = parse_document(Path::new("notes.md"), contents, "Notes").unwrap();

        assert_eq!(doc.title, "Release notes");
        assert_eq!(doc.summary.as_deref(), Some("What changed"));
        assert_eq!(doc.body, "Body\n");
    }

    #[test]
    fn empty_front_matter() {
        let doc = parse_document(Path::new("a.md"), "---\n---\nBody", "A").unwrap();
        assert_eq!(doc.title, "A");
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn unterminated_front_matter_is_body() {
        let doc = parse_document(Path::new("a.md"), "---\ntitle: x\n", "A").unwrap();
        assert_eq!(doc.title, "A");
        assert!(doc.body.starts_with("---"));
    }

    #[test]
    fn malformed_front_matter_fails() {
        let err = parse_document(Path::new("a.md"), "---\ntitle: [unclosed\n---\n", "A").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("invalid front matter"), "{}", message);
        assert_eq!(FailureCategory::classify(&message), FailureCategory::Syntax);
    }

    #[test]
    fn loader_reads_lazily() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.md");
        let loader = document_loader(path.clone(), "Notes".to_string());

        // Missing at load time
        let err = loader.load().err().unwrap();
        assert!(matches!(err, LoadError::NotFound(_)));

        fs::write(&path, "---\ntitle: Hello\n---\nWorld").unwrap();
        assert!(loader.load().is_ok());
    }

    #[test]
    fn loader_rejects_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.txt");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = document_loader(path, "X".to_string()).load().err().unwrap();
        assert_eq!(FailureCategory::classify(&err.to_string()), FailureCategory::Syntax);
    }
}
