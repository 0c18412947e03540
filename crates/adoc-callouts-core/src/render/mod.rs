//! Callout renderers
//!
//! A renderer turns a validated block (cleaned code, marker groups with
//! their terms, and the matching explanations) into the lines that replace
//! the block and its explanation in the document.

mod bullets;
mod comments;
mod deflist;

pub use bullets::BulletListRenderer;
pub use comments::{InlineCommentRenderer, DEFAULT_MAX_COMMENT_LENGTH};
pub use deflist::DefinitionListRenderer;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::block::CodeBlock;
use crate::explanation::Explanation;
use crate::marker::MarkerGroup;
use crate::warning::Warning;

/// Default lead-in line of list formats
pub const DEFAULT_LEAD_IN: &str = "where:";

/// Output format of a conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// AsciiDoc definition list after the block
    #[default]
    Deflist,
    /// Bulleted list after the block
    Bullets,
    /// Trailing comments on the code lines
    Comments,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Deflist => write!(f, "deflist"),
            Format::Bullets => write!(f, "bullets"),
            Format::Comments => write!(f, "comments"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deflist" | "definition-list" => Ok(Format::Deflist),
            "bullets" | "bullet-list" => Ok(Format::Bullets),
            "comments" | "inline-comments" => Ok(Format::Comments),
            other => Err(format!(
                "unknown format '{}', expected deflist, bullets or comments",
                other
            )),
        }
    }
}

/// One marker group with the explanations of its numbers
#[derive(Debug, Clone)]
pub struct RenderGroup<'a> {
    /// The marker group, term resolved
    pub group: &'a MarkerGroup,
    /// Explanations in ascending number order
    pub explanations: Vec<&'a Explanation>,
}

impl RenderGroup<'_> {
    /// The term as it appears in list output
    pub fn display_term(&self) -> String {
        quote_term(&self.group.term)
    }

    /// A group is optional when any of its explanations is
    pub fn is_optional(&self) -> bool {
        self.explanations.iter().any(|e| e.is_optional)
    }

    /// Term followed by the optional qualifier, when it applies
    pub(crate) fn qualified_term(&self) -> String {
        if self.is_optional() {
            format!("{} (Optional)", self.display_term())
        } else {
            self.display_term()
        }
    }
}

/// Everything a renderer needs for one block
#[derive(Debug, Clone)]
pub struct RenderInput<'a> {
    /// The original block
    pub block: &'a CodeBlock,
    /// Block content with markers removed
    pub cleaned_lines: &'a [String],
    /// Groups in code-line order
    pub groups: Vec<RenderGroup<'a>>,
}

/// Rendered replacement for a block and its explanation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// Replacement lines
    pub lines: Vec<String>,
    /// Format actually used (differs from the requested one on fallback)
    pub format: Format,
    /// Warnings raised while rendering
    pub warnings: Vec<Warning>,
}

impl RenderOutput {
    /// Output without warnings
    pub fn new(lines: Vec<String>, format: Format) -> Self {
        Self {
            lines,
            format,
            warnings: Vec::new(),
        }
    }
}

/// Trait for callout output formats
pub trait Renderer {
    /// Render the replacement for one block
    fn render(&self, input: &RenderInput<'_>) -> RenderOutput;
}

/// Wrap a term in backticks unless it already carries one
pub fn quote_term(term: &str) -> String {
    if term.contains('`') {
        term.to_string()
    } else {
        format!("`{}`", term)
    }
}

/// Cleaned block followed by a blank line and the lead-in
pub(crate) fn list_preamble(input: &RenderInput<'_>, lead_in: &str) -> Vec<String> {
    let mut lines = input.block.with_content(input.cleaned_lines);
    lines.push(String::new());
    if !lead_in.is_empty() {
        lines.push(lead_in.to_string());
        lines.push(String::new());
    }
    lines
}
