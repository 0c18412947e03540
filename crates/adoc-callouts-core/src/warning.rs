//! Conversion warnings
//!
//! A warning never aborts a conversion: the affected block is either left
//! untouched or converted through a fallback format, and processing moves on.

use serde::Serialize;

use crate::span::LineSpan;

/// Something a writer should look at after a conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Marker numbers and explanation numbers disagree; block skipped
    Mismatch {
        /// File the block came from, when known
        #[serde(skip_serializing_if = "Option::is_none")]
        file_hint: Option<String>,
        /// Lines of the code block
        line_range: LineSpan,
        /// Marker numbers in code order, duplicates kept
        code_numbers: Vec<u32>,
        /// Explanation numbers in source order, duplicates kept
        explanation_numbers: Vec<u32>,
    },

    /// The block has markers but no explanation follows it; block skipped
    MissingExplanation {
        /// File the block came from, when known
        #[serde(skip_serializing_if = "Option::is_none")]
        file_hint: Option<String>,
        /// Lines of the code block
        line_range: LineSpan,
        /// Marker numbers in code order
        code_numbers: Vec<u32>,
    },

    /// An inline comment would exceed the length budget; the block was
    /// converted to a definition list instead
    CommentTooLong {
        /// Lines of the code block
        line_range: LineSpan,
        /// Term of the offending group
        group_term: String,
        /// Length of the comment text in characters
        length: usize,
    },
}

impl Warning {
    /// Stable warning code
    pub fn code(&self) -> &'static str {
        match self {
            Warning::Mismatch { .. } => "CALLOUT001",
            Warning::MissingExplanation { .. } => "CALLOUT002",
            Warning::CommentTooLong { .. } => "CALLOUT003",
        }
    }

    /// Lines of the code block the warning is about
    pub fn line_range(&self) -> LineSpan {
        match self {
            Warning::Mismatch { line_range, .. }
            | Warning::MissingExplanation { line_range, .. }
            | Warning::CommentTooLong { line_range, .. } => *line_range,
        }
    }

    /// File hint, when the warning carries one
    pub fn file_hint(&self) -> Option<&str> {
        match self {
            Warning::Mismatch { file_hint, .. } | Warning::MissingExplanation { file_hint, .. } => {
                file_hint.as_deref()
            }
            Warning::CommentTooLong { .. } => None,
        }
    }

    /// Whether the block was left unmodified
    pub fn is_skip(&self) -> bool {
        !matches!(self, Warning::CommentTooLong { .. })
    }

    /// One-line summary
    pub fn message(&self) -> String {
        match self {
            Warning::Mismatch { .. } => {
                "callout numbers in the code do not match the explanations".to_string()
            }
            Warning::MissingExplanation { .. } => {
                "code block has callouts but no explanation follows it".to_string()
            }
            Warning::CommentTooLong {
                group_term, length, ..
            } => format!(
                "comment for `{}` is {} characters long, converted to a definition list",
                group_term, length
            ),
        }
    }

    /// Suggested fix
    pub fn help(&self) -> &'static str {
        match self {
            Warning::Mismatch { .. } => {
                "make every callout in the code appear exactly once in the explanations, then re-run"
            }
            Warning::MissingExplanation { .. } => {
                "the explanation may be shared with another block, located elsewhere, or missing"
            }
            Warning::CommentTooLong { .. } => {
                "shorten the explanation or raise the maximum comment length"
            }
        }
    }
}

fn format_numbers(numbers: &[u32]) -> String {
    let items: Vec<String> = numbers.iter().map(|n| format!("<{}>", n)).collect();
    format!("[{}]", items.join(", "))
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: warning[code]: message
        write!(f, "warning[{}]: {}", self.code(), self.message())?;

        match self.file_hint() {
            Some(file) => write!(f, "\n  --> {}:{}", file, self.line_range())?,
            None => write!(f, "\n  --> lines {}", self.line_range())?,
        }

        match self {
            Warning::Mismatch {
                code_numbers,
                explanation_numbers,
                ..
            } => {
                write!(f, "\n  = note: code callouts: {}", format_numbers(code_numbers))?;
                write!(
                    f,
                    "\n  = note: explanations:  {}",
                    format_numbers(explanation_numbers)
                )?;
            }
            Warning::MissingExplanation { code_numbers, .. } => {
                write!(f, "\n  = note: code callouts: {}", format_numbers(code_numbers))?;
            }
            Warning::CommentTooLong { .. } => {}
        }

        write!(f, "\n  = help: {}", self.help())
    }
}
