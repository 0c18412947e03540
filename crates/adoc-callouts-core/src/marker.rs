//! Callout marker extraction
//!
//! Finds `<N>` markers in code lines, groups the markers sharing a line and
//! produces the cleaned code with every marker removed.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

use crate::block::CodeBlock;
use crate::syntax::{self, CommentSyntax};

/// A numbered callout marker inside a code line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Callout number (always positive)
    pub number: u32,
    /// Line index relative to the block content
    pub line_index: usize,
    /// Byte range of `<N>` inside the line
    pub span: Range<usize>,
}

/// The markers sharing one code line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerGroup {
    /// Line index relative to the block content
    pub line_index: usize,
    /// Callout numbers, ascending
    pub numbers: Vec<u32>,
    /// The code line as written, markers included
    pub line_text: String,
    /// User-facing key, filled in by the term resolver
    pub term: String,
}

/// Markers of one block plus its cleaned code
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedMarkers {
    /// Groups in code-line order
    pub groups: Vec<MarkerGroup>,
    /// Block content with markers and emptied comments removed
    pub cleaned_lines: Vec<String>,
}

impl ExtractedMarkers {
    /// Every marker number, in group order (duplicates kept)
    pub fn numbers(&self) -> Vec<u32> {
        self.groups
            .iter()
            .flat_map(|g| g.numbers.iter().copied())
            .collect()
    }

    /// Check if the block carries no marker at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Find the callout markers in one line
///
/// A `<N>` preceded by another `<` is a heredoc or cross-reference
/// (`<<1>>`), and one glued to an identifier (`Tuple<2>`) is a generic
/// argument; neither counts.
pub fn find_markers(line: &str, line_index: usize) -> Vec<Marker> {
    static MARKER_RE: OnceLock<Regex> = OnceLock::new();
    let re = MARKER_RE.get_or_init(|| Regex::new(r"<(\d+)>").unwrap());

    re.captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let before = line[..whole.start()].chars().next_back();
            if let Some(c) = before {
                if c == '<' || c.is_alphanumeric() || c == '_' {
                    return None;
                }
            }
            let number: u32 = caps[1].parse().ok()?;
            if number == 0 {
                return None;
            }
            Some(Marker {
                number,
                line_index,
                span: whole.range(),
            })
        })
        .collect()
}

/// Remove markers from a line, along with the comment that held them
///
/// `name: x # <1>` becomes `name: x` and `<a/> <!-- <1> -->` becomes
/// `<a/>`. Only the comment syntaxes in `comments` are dropped, so a
/// shell `-- <1>` keeps its `--`. Lines without markers are returned
/// unchanged.
pub fn strip_markers(line: &str, markers: &[Marker], comments: &[CommentSyntax]) -> String {
    if markers.is_empty() {
        return line.to_string();
    }

    let mut out = line.to_string();
    for marker in markers.iter().rev() {
        let start = out[..marker.span.start]
            .trim_end_matches([' ', '\t'])
            .len();
        out.replace_range(start..marker.span.end, "");
    }

    let trimmed = out.trim_end();
    comments
        .iter()
        .find_map(|syntax| strip_empty_comment(trimmed, syntax))
        .unwrap_or(trimmed)
        .to_string()
}

/// Drop a trailing comment that has nothing left in it
fn strip_empty_comment<'a>(line: &'a str, syntax: &CommentSyntax) -> Option<&'a str> {
    let mut rest = match syntax.suffix {
        Some(suffix) => line.strip_suffix(suffix)?.trim_end(),
        None => line,
    };
    let before = rest.len();
    while let Some(shorter) = rest.strip_suffix(syntax.prefix) {
        rest = shorter;
    }
    if rest.len() == before {
        return None;
    }
    (rest.is_empty() || rest.ends_with(char::is_whitespace)).then(|| rest.trim_end())
}

/// Extract marker groups and cleaned code from a block
pub fn extract(block: &CodeBlock) -> ExtractedMarkers {
    let known = block.language.as_deref().and_then(syntax::find);
    let comments = match known {
        Some(ref syntax) => std::slice::from_ref(syntax),
        None => syntax::GENERIC_SYNTAXES,
    };

    let mut groups = Vec::new();
    let mut cleaned_lines = Vec::with_capacity(block.lines.len());

    for (index, line) in block.lines.iter().enumerate() {
        let markers = find_markers(line, index);
        cleaned_lines.push(strip_markers(line, &markers, comments));

        if markers.is_empty() {
            continue;
        }

        let mut numbers: Vec<u32> = markers.iter().map(|m| m.number).collect();
        numbers.sort_unstable();
        groups.push(MarkerGroup {
            line_index: index,
            numbers,
            line_text: line.clone(),
            term: String::new(),
        });
    }

    ExtractedMarkers {
        groups,
        cleaned_lines,
    }
}
