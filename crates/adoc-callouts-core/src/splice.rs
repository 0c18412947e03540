//! Line-range replacement
//!
//! Edits are applied from the last to the first so the line numbers of the
//! earlier ones stay valid.

use crate::span::LineSpan;

/// Replace a range of document lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    /// Lines to remove
    pub span: LineSpan,
    /// Lines to insert in their place
    pub replacement: Vec<String>,
}

impl LineEdit {
    /// Create an edit
    pub fn new(span: LineSpan, replacement: Vec<String>) -> Self {
        Self { span, replacement }
    }
}

/// A converted block: the block range plus the explanation range it absorbs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEdit {
    /// Lines of the code block
    pub block_range: LineSpan,
    /// Lines of the explanation
    pub explanation_range: LineSpan,
    /// Lines replacing both
    pub replacement: Vec<String>,
}

impl RenderedEdit {
    /// From the block start to the explanation end
    pub fn combined_range(&self) -> LineSpan {
        self.block_range.merge(&self.explanation_range)
    }
}

impl From<RenderedEdit> for LineEdit {
    fn from(edit: RenderedEdit) -> Self {
        LineEdit::new(edit.combined_range(), edit.replacement)
    }
}

/// Apply edits to a document's lines
///
/// Edits may come in any order. An edit overlapping an earlier one is
/// dropped. An edit reaching past the end of the document is clamped to it.
pub fn splice<S: AsRef<str>>(lines: &[S], edits: impl IntoIterator<Item = LineEdit>) -> Vec<String> {
    let mut out: Vec<String> = lines.iter().map(|l| l.as_ref().to_string()).collect();

    let mut edits: Vec<LineEdit> = edits.into_iter().collect();
    edits.sort_by_key(|edit| edit.span.start);

    let mut accepted: Vec<LineEdit> = Vec::with_capacity(edits.len());
    for edit in edits {
        if let Some(previous) = accepted.last() {
            if previous.span.overlaps(&edit.span) {
                tracing::warn!(lines = %edit.span, "overlapping edit dropped");
                continue;
            }
        }
        accepted.push(edit);
    }

    for edit in accepted.into_iter().rev() {
        let end = edit.span.end.min(out.len());
        let start = edit.span.start.min(end);
        out.splice(start..end, edit.replacement);
    }

    out
}
