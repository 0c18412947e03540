//! Document conversion
//!
//! Ties the pipeline together: scan blocks, extract markers, locate and
//! validate explanations, resolve terms, render, then splice every
//! conversion back into the document.

use serde::Serialize;

use crate::block::BlockScanner;
use crate::config::Settings;
use crate::explanation::{Explanation, ExplanationLocator, ExplanationSet, ExplanationShape};
use crate::marker::{self, MarkerGroup};
use crate::render::{
    BulletListRenderer, DefinitionListRenderer, Format, InlineCommentRenderer, RenderGroup,
    RenderInput, Renderer, DEFAULT_LEAD_IN, DEFAULT_MAX_COMMENT_LENGTH,
};
use crate::span::LineSpan;
use crate::splice::{splice, LineEdit, RenderedEdit};
use crate::term;
use crate::validate::{BlockStatus, ConversionCandidate, Validator};
use crate::warning::Warning;

/// Result of converting one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    /// Converted text (identical to the input when nothing was converted)
    pub new_text: String,
    /// Warnings in document order
    pub warnings: Vec<Warning>,
    /// Number of blocks converted, fallbacks included
    pub conversion_count: usize,
}

impl ConversionOutcome {
    /// Check if any block was converted
    pub fn is_changed(&self) -> bool {
        self.conversion_count > 0
    }
}

/// Per-block report of a dry inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockReport {
    /// Lines of the code block
    pub line_range: LineSpan,
    /// Language tag, when given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Marker numbers in code order
    pub code_numbers: Vec<u32>,
    /// Explanation numbers in source order
    pub explanation_numbers: Vec<u32>,
    /// Shape of the explanation, when one was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_shape: Option<ExplanationShape>,
    /// Lines of the explanation, when one was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_range: Option<LineSpan>,
    /// Validation outcome
    pub status: BlockStatus,
}

/// Converts callouts in AsciiDoc documents
///
/// # Example
///
/// ```
/// use adoc_callouts_core::{CalloutConverter, Format};
///
/// let text = "[source,yaml]\n----\nname: demo <1>\n----\n<1> The name.\n";
/// let outcome = CalloutConverter::new()
///     .with_format(Format::Bullets)
///     .convert(text);
///
/// assert_eq!(outcome.conversion_count, 1);
/// assert!(outcome.new_text.contains("* `name: demo`: The name."));
/// ```
#[derive(Debug, Clone)]
pub struct CalloutConverter {
    format: Format,
    max_comment_length: usize,
    file_hint: Option<String>,
    lead_in: String,
    locator: ExplanationLocator,
}

impl Default for CalloutConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl CalloutConverter {
    /// Create a converter with default settings
    pub fn new() -> Self {
        Self {
            format: Format::default(),
            max_comment_length: DEFAULT_MAX_COMMENT_LENGTH,
            file_hint: None,
            lead_in: DEFAULT_LEAD_IN.to_string(),
            locator: ExplanationLocator::default(),
        }
    }

    /// Create a converter from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .with_format(settings.convert.format)
            .with_max_comment_length(settings.convert.max_comment_length)
            .with_lead_in(settings.convert.lead_in.clone())
            .with_three_column_template(settings.explanations.three_column_template.clone())
    }

    /// Set the output format
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set the inline comment length budget
    pub fn with_max_comment_length(mut self, max_comment_length: usize) -> Self {
        self.max_comment_length = max_comment_length;
        self
    }

    /// Set the file name reported in warnings
    pub fn with_file_hint(mut self, file_hint: impl Into<String>) -> Self {
        self.file_hint = Some(file_hint.into());
        self
    }

    /// Set the line introducing list output
    pub fn with_lead_in(mut self, lead_in: impl Into<String>) -> Self {
        self.lead_in = lead_in.into();
        self
    }

    /// Set the phrasing of three-column table rows
    pub fn with_three_column_template(mut self, template: impl Into<String>) -> Self {
        self.locator = ExplanationLocator::new(template);
        self
    }

    fn renderer(&self) -> Box<dyn Renderer> {
        match self.format {
            Format::Deflist => Box::new(DefinitionListRenderer::new(self.lead_in.as_str())),
            Format::Bullets => Box::new(BulletListRenderer::new(self.lead_in.as_str())),
            Format::Comments => Box::new(
                InlineCommentRenderer::new(self.max_comment_length)
                    .with_fallback(DefinitionListRenderer::new(self.lead_in.as_str())),
            ),
        }
    }

    /// Collect the blocks carrying markers, each with its explanation
    ///
    /// Blocks lying inside a previous block's explanation (listings attached
    /// to a callout list or a table cell) are not candidates. Neither is a
    /// block attached by a `+` line with no explanation of its own, such as
    /// a listing kept inside converted list output.
    fn candidates(&self, lines: &[&str]) -> Vec<ConversionCandidate> {
        let mut candidates = Vec::new();
        let mut consumed: Option<LineSpan> = None;

        for block in BlockScanner::new(lines) {
            if consumed.is_some_and(|span| span.contains(block.start_line)) {
                tracing::debug!(line = block.start_line + 1, "block inside an explanation");
                continue;
            }

            let mut markers = marker::extract(&block);
            if markers.is_empty() {
                continue;
            }
            term::resolve_terms(&mut markers.groups, &markers.cleaned_lines);

            let explanations = self.locator.locate(lines, block.end_line + 1);
            if explanations.is_none() && follows_continuation(lines, block.start_line) {
                tracing::debug!(line = block.start_line + 1, "attached block without explanation");
                continue;
            }
            if let Some(ref set) = explanations {
                consumed = Some(set.range);
            }

            tracing::debug!(
                line = block.start_line + 1,
                language = block.language.as_deref().unwrap_or("-"),
                groups = markers.groups.len(),
                "callout block found"
            );
            candidates.push(ConversionCandidate {
                block,
                markers,
                explanations,
            });
        }

        candidates
    }

    /// Convert every valid callout block of a document
    pub fn convert(&self, text: &str) -> ConversionOutcome {
        let lines: Vec<&str> = text.lines().collect();
        let renderer = self.renderer();

        let mut edits = Vec::new();
        let mut warnings = Vec::new();

        for candidate in self.candidates(&lines) {
            let classification = Validator::classify(&candidate);
            if !classification.is_convertible() {
                if let Some(warning) =
                    classification.into_warning(self.file_hint.as_deref(), &candidate.block)
                {
                    tracing::debug!(code = warning.code(), range = %warning.line_range(), "block skipped");
                    warnings.push(warning);
                }
                continue;
            }
            let Some(explanations) = candidate.explanations.as_ref() else {
                continue;
            };

            let input = RenderInput {
                block: &candidate.block,
                cleaned_lines: &candidate.markers.cleaned_lines,
                groups: candidate
                    .markers
                    .groups
                    .iter()
                    .map(|group| render_group(group, explanations))
                    .collect(),
            };
            let output = renderer.render(&input);
            tracing::debug!(
                line = candidate.block.start_line + 1,
                format = %output.format,
                "block converted"
            );
            warnings.extend(output.warnings);

            edits.push(RenderedEdit {
                block_range: candidate.block.span(),
                explanation_range: explanations.range,
                replacement: output.lines,
            });
        }

        let conversion_count = edits.len();
        let new_text = if edits.is_empty() {
            text.to_string()
        } else {
            let mut joined = splice(&lines, edits.into_iter().map(LineEdit::from)).join("\n");
            if text.ends_with('\n') {
                joined.push('\n');
            }
            joined
        };

        ConversionOutcome {
            new_text,
            warnings,
            conversion_count,
        }
    }

    /// Report every callout block without converting anything
    pub fn inspect(&self, text: &str) -> Vec<BlockReport> {
        let lines: Vec<&str> = text.lines().collect();

        self.candidates(&lines)
            .into_iter()
            .map(|candidate| {
                let status = Validator::classify(&candidate).status();
                let explanations = candidate.explanations.as_ref();
                BlockReport {
                    line_range: candidate.block.span(),
                    language: candidate.block.language.clone(),
                    code_numbers: candidate.markers.numbers(),
                    explanation_numbers: explanations
                        .map(ExplanationSet::numbers)
                        .unwrap_or_default(),
                    explanation_shape: explanations.map(|set| set.shape),
                    explanation_range: explanations.map(|set| set.range),
                    status,
                }
            })
            .collect()
    }
}

/// Check if a `+` line, possibly followed by a block title, sits right
/// above `line`
fn follows_continuation(lines: &[&str], line: usize) -> bool {
    let mut above = lines[..line].iter().rev().map(|l| l.trim());
    match above.next() {
        Some("+") => true,
        Some(title) if title.starts_with('.') && !title.starts_with("..") => {
            above.next() == Some("+")
        }
        _ => false,
    }
}

fn render_group<'a>(group: &'a MarkerGroup, explanations: &'a ExplanationSet) -> RenderGroup<'a> {
    let explanations: Vec<&Explanation> = group
        .numbers
        .iter()
        .filter_map(|&number| explanations.get(number))
        .collect();
    RenderGroup { group, explanations }
}

/// Convert a document with default settings
pub fn detect_and_convert(text: &str, format: Format, max_comment_length: usize) -> ConversionOutcome {
    CalloutConverter::new()
        .with_format(format)
        .with_max_comment_length(max_comment_length)
        .convert(text)
}
