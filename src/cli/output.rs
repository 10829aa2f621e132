//! Output formatting for CLI commands

use ratatui::text::Text;
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data (JSON mode)
    pub fn data<T: Serialize>(&self, data: &T) -> anyhow::Result<()> {
        let json = match self.format {
            OutputFormat::Text => serde_json::to_string_pretty(data)?,
            OutputFormat::Json => serde_json::to_string(data)?,
        };
        println!("{}", json);
        Ok(())
    }

    /// Prints rendered content as plain lines (text only)
    pub fn text(&self, text: &Text<'_>) {
        if self.format == OutputFormat::Text {
            for line in plain_lines(text) {
                println!("{}", line);
            }
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}

/// Styled text flattened to one string per line, trailing spaces trimmed
pub fn plain_lines(text: &Text<'_>) -> Vec<String> {
    text.lines
        .iter()
        .map(|line| {
            let joined: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            joined.trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::text::{Line, Span};

    #[test]
    fn flattens_spans() {
        let text = Text::from(vec![
            Line::from(vec![Span::raw("Error in "), Span::raw("Timer (v1)  ")]),
            Line::default(),
        ]);
        assert_eq!(plain_lines(&text), vec!["Error in Timer (v1)", ""]);
    }
}
