//! Line ranges inside a document

use serde::Serialize;

/// A range of document lines
///
/// Stored 0-based and half-open so it can index line vectors directly.
/// Displayed and serialized 1-based and inclusive, the way editors number
/// lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "DisplayRange")]
pub struct LineSpan {
    /// First line (0-based, inclusive)
    pub start: usize,
    /// Line after the last one (0-based, exclusive)
    pub end: usize,
}

impl LineSpan {
    /// Create a new span from a start and an exclusive end
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of lines covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span covers no line
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains a line index
    pub fn contains(&self, line: usize) -> bool {
        line >= self.start && line < self.end
    }

    /// Merge two spans into one that covers both
    pub fn merge(&self, other: &LineSpan) -> LineSpan {
        LineSpan::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Check if two spans share at least one line
    pub fn overlaps(&self, other: &LineSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// First line, 1-based
    pub fn first_line(&self) -> usize {
        self.start + 1
    }

    /// Last line, 1-based
    pub fn last_line(&self) -> usize {
        self.end.max(self.start + 1)
    }
}

impl std::fmt::Display for LineSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.first_line(), self.last_line())
    }
}

#[derive(Serialize)]
struct DisplayRange {
    first: usize,
    last: usize,
}

impl From<LineSpan> for DisplayRange {
    fn from(span: LineSpan) -> Self {
        Self {
            first: span.first_line(),
            last: span.last_line(),
        }
    }
}
