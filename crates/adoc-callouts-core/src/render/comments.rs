//! Inline comment output
//!
//! Each explanation becomes a trailing comment on its code line, in the
//! comment syntax of the block's language. Blocks that cannot be expressed
//! this way are rendered as a definition list instead.

use super::{DefinitionListRenderer, Format, RenderGroup, RenderInput, RenderOutput, Renderer};
use crate::syntax;
use crate::warning::Warning;

/// Default maximum comment length, in characters
pub const DEFAULT_MAX_COMMENT_LENGTH: usize = 120;

/// Renders explanations as trailing code comments
#[derive(Debug, Clone)]
pub struct InlineCommentRenderer {
    max_length: usize,
    fallback: DefinitionListRenderer,
}

impl Default for InlineCommentRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMMENT_LENGTH)
    }
}

impl InlineCommentRenderer {
    /// Create a renderer with a length budget per comment
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            fallback: DefinitionListRenderer::default(),
        }
    }

    /// Set the renderer used when comments do not fit
    pub fn with_fallback(mut self, fallback: DefinitionListRenderer) -> Self {
        self.fallback = fallback;
        self
    }

    /// Comment text of one group
    ///
    /// Explanations are joined by single spaces; `+` continuation markers
    /// and blank lines are dropped.
    pub fn definition(group: &RenderGroup<'_>) -> String {
        let mut parts: Vec<String> = Vec::new();
        for explanation in &group.explanations {
            let text = explanation.text.trim();
            match (explanation.is_optional, text.is_empty()) {
                (true, true) => parts.push("Optional.".to_string()),
                (true, false) => parts.push(format!("Optional. {}", text)),
                (false, false) => parts.push(text.to_string()),
                (false, true) => {}
            }
            parts.extend(
                explanation
                    .continuation_lines
                    .iter()
                    .map(|l| l.trim())
                    .filter(|l| !l.is_empty() && *l != "+")
                    .map(str::to_string),
            );
        }
        parts.join(" ")
    }

    fn fall_back(&self, input: &RenderInput<'_>, warnings: Vec<Warning>) -> RenderOutput {
        let mut output = self.fallback.render(input);
        output.warnings = warnings;
        output
    }
}

impl Renderer for InlineCommentRenderer {
    fn render(&self, input: &RenderInput<'_>) -> RenderOutput {
        let unsupported = input.groups.iter().any(|g| {
            g.explanations
                .iter()
                .any(|e| e.has_conditionals() || e.has_attached_block())
        });
        if unsupported {
            tracing::warn!(
                line = input.block.start_line + 1,
                "explanation holds directives or attached blocks, using a definition list"
            );
            return self.fall_back(input, Vec::new());
        }

        let definitions: Vec<String> = input.groups.iter().map(Self::definition).collect();

        let too_long: Vec<Warning> = input
            .groups
            .iter()
            .zip(&definitions)
            .filter_map(|(group, definition)| {
                let length = definition.chars().count();
                (length > self.max_length).then(|| Warning::CommentTooLong {
                    line_range: input.block.span(),
                    group_term: group.group.term.clone(),
                    length,
                })
            })
            .collect();
        if !too_long.is_empty() {
            tracing::warn!(
                line = input.block.start_line + 1,
                groups = too_long.len(),
                max = self.max_length,
                "comment too long, using a definition list"
            );
            return self.fall_back(input, too_long);
        }

        let syntax = syntax::lookup(input.block.language.as_deref());
        let mut content = input.cleaned_lines.to_vec();
        for (group, definition) in input.groups.iter().zip(&definitions) {
            let Some(line) = content.get_mut(group.group.line_index) else {
                continue;
            };
            let comment = syntax.comment(definition);
            if line.trim().is_empty() {
                line.push_str(&comment);
            } else {
                line.push(' ');
                line.push_str(&comment);
            }
        }

        RenderOutput::new(input.block.with_content(&content), Format::Comments)
    }
}
