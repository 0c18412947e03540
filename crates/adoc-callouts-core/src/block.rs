//! Code block scanner
//!
//! Finds listing (`----`) and literal (`....`) blocks in AsciiDoc text,
//! optionally introduced by a `[source]` attribute line:
//!
//! ```asciidoc
//! [source,yaml]
//! ----
//! name: demo <1>
//! ----
//! ```

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::span::LineSpan;

/// Kind of delimiter fencing a code block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DelimiterKind {
    /// Listing block (`----`)
    Listing,
    /// Literal block (`....`)
    Literal,
}

impl DelimiterKind {
    /// Classify a delimiter line, four or more identical characters
    pub fn from_line(line: &str) -> Option<Self> {
        let trimmed = line.trim_end();
        if trimmed.len() < 4 {
            return None;
        }
        if trimmed.bytes().all(|b| b == b'-') {
            Some(DelimiterKind::Listing)
        } else if trimmed.bytes().all(|b| b == b'.') {
            Some(DelimiterKind::Literal)
        } else {
            None
        }
    }
}

/// A fenced code block found in a document
///
/// Line numbers are 0-based indices into the document's lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// First line of the block: the `[source]` line when present,
    /// otherwise the opening delimiter
    pub start_line: usize,
    /// Opening delimiter line
    pub open_line: usize,
    /// Closing delimiter line
    pub end_line: usize,
    /// Lowercased language tag from `[source,<lang>]`
    pub language: Option<String>,
    /// Delimiter kind
    pub delimiter: DelimiterKind,
    /// The attribute line, verbatim
    pub attribute_line: Option<String>,
    /// The delimiter line, verbatim (the closing one is identical)
    pub delimiter_line: String,
    /// Content lines between the delimiters
    pub lines: Vec<String>,
}

impl CodeBlock {
    /// Lines covered by the block, attribute line and delimiters included
    pub fn span(&self) -> LineSpan {
        LineSpan::new(self.start_line, self.end_line + 1)
    }

    /// Rebuild the block's source lines around new content
    pub fn with_content(&self, content: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(content.len() + 3);
        if let Some(ref attribute) = self.attribute_line {
            out.push(attribute.clone());
        }
        out.push(self.delimiter_line.clone());
        out.extend(content.iter().cloned());
        out.push(self.delimiter_line.clone());
        out
    }
}

/// Result of matching a `[source]` attribute line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAttribute {
    /// Lowercased language, when one is given
    pub language: Option<String>,
}

impl SourceAttribute {
    /// Parse `[source]`, `[source,yaml]`, `[source%linenums,yaml,subs="+quotes"]`
    pub fn parse(line: &str) -> Option<Self> {
        static SOURCE_RE: OnceLock<Regex> = OnceLock::new();
        let re = SOURCE_RE.get_or_init(|| {
            Regex::new(r#"^\[source(?:%[\w%-]*)?(?:\s*,\s*([^,\]\s="]+))?(?:\s*,[^\]]*)?\]\s*$"#)
                .unwrap()
        });

        re.captures(line.trim()).map(|caps| SourceAttribute {
            language: caps.get(1).map(|m| m.as_str().to_lowercase()),
        })
    }
}

/// Lazy scanner over the code blocks of a document
///
/// Blocks come out in document order. A block that is never closed is
/// skipped and scanning resumes on the line after its opener.
pub struct BlockScanner<'a> {
    lines: &'a [&'a str],
    pos: usize,
}

impl<'a> BlockScanner<'a> {
    /// Create a scanner over the document's lines
    pub fn new(lines: &'a [&'a str]) -> Self {
        Self { lines, pos: 0 }
    }

    /// Find the line closing a block opened with `delimiter` at `open`
    fn find_close(&self, open: usize, delimiter: &str) -> Option<usize> {
        self.lines
            .iter()
            .enumerate()
            .skip(open + 1)
            .find(|(_, line)| line.trim_end() == delimiter)
            .map(|(i, _)| i)
    }
}

impl Iterator for BlockScanner<'_> {
    type Item = CodeBlock;

    fn next(&mut self) -> Option<CodeBlock> {
        while let Some(line) = self.lines.get(self.pos).copied() {
            let start = self.pos;

            let (attribute, open) = match SourceAttribute::parse(line) {
                Some(attribute) => match self.lines.get(start + 1) {
                    Some(next) if DelimiterKind::from_line(next).is_some() => {
                        (Some(attribute), start + 1)
                    }
                    _ => {
                        self.pos += 1;
                        continue;
                    }
                },
                None if DelimiterKind::from_line(line).is_some() => (None, start),
                None => {
                    self.pos += 1;
                    continue;
                }
            };

            let delimiter_line = self.lines[open].trim_end().to_string();
            let Some(delimiter) = DelimiterKind::from_line(&delimiter_line) else {
                self.pos += 1;
                continue;
            };

            let Some(close) = self.find_close(open, &delimiter_line) else {
                tracing::debug!(line = start + 1, "unterminated code block ignored");
                self.pos = open + 1;
                continue;
            };

            self.pos = close + 1;
            return Some(CodeBlock {
                start_line: start,
                open_line: open,
                end_line: close,
                language: attribute.as_ref().and_then(|a| a.language.clone()),
                delimiter,
                attribute_line: attribute.map(|_| line.trim_end().to_string()),
                delimiter_line,
                lines: self.lines[open + 1..close]
                    .iter()
                    .map(|l| l.to_string())
                    .collect(),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<CodeBlock> {
        let lines: Vec<&str> = text.lines().collect();
        BlockScanner::new(&lines).collect()
    }

    #[test]
    fn test_source_attribute_variants() {
        assert_eq!(SourceAttribute::parse("[source]").unwrap().language, None);
        assert_eq!(
            SourceAttribute::parse("[source,YAML]").unwrap().language,
            Some("yaml".to_string())
        );
        assert_eq!(
            SourceAttribute::parse(r#"[source, bash, subs="+quotes"]"#)
                .unwrap()
                .language,
            Some("bash".to_string())
        );
        assert_eq!(
            SourceAttribute::parse(r#"[source,subs="attributes"]"#)
                .unwrap()
                .language,
            None
        );
        assert_eq!(
            SourceAttribute::parse("[source%linenums,java]")
                .unwrap()
                .language,
            Some("java".to_string())
        );
        assert!(SourceAttribute::parse("[NOTE]").is_none());
        assert!(SourceAttribute::parse("[sourcecode]").is_none());
    }

    #[test]
    fn test_scan_source_block() {
        let blocks = scan("Intro\n\n[source,yaml]\n----\nkey: value <1>\n----\n");
        assert_eq!(blocks.len(), 1);

        let block = &blocks[0];
        assert_eq!(block.start_line, 2);
        assert_eq!(block.open_line, 3);
        assert_eq!(block.end_line, 5);
        assert_eq!(block.language.as_deref(), Some("yaml"));
        assert_eq!(block.delimiter, DelimiterKind::Listing);
        assert_eq!(block.lines, vec!["key: value <1>".to_string()]);
        assert_eq!(block.span(), LineSpan::new(2, 6));
    }

    #[test]
    fn test_scan_bare_literal_block() {
        let blocks = scan("....\n$ ls <1>\n....\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].delimiter, DelimiterKind::Literal);
        assert!(blocks[0].attribute_line.is_none());
        assert!(blocks[0].language.is_none());
    }

    #[test]
    fn test_closing_delimiter_must_match() {
        let blocks = scan("[source]\n------\na\n----\nb\n------\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines, vec!["a", "----", "b"]);
    }

    #[test]
    fn test_unterminated_block_is_invisible() {
        let blocks = scan("[source,java]\n----\nint x; <1>\n\nmore text\n");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_unterminated_block_does_not_hide_later_blocks() {
        let blocks = scan("....\nopen forever\n\n[source]\n----\ncode\n----\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines, vec!["code"]);
    }

    #[test]
    fn test_attribute_without_delimiter_is_ignored() {
        let blocks = scan("[source,yaml]\nnot a block\n");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_blocks_in_document_order() {
        let blocks = scan("----\none\n----\n\n[source,sh]\n....\ntwo\n....\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines, vec!["one"]);
        assert_eq!(blocks[1].lines, vec!["two"]);
        assert_eq!(blocks[1].language.as_deref(), Some("sh"));
    }

    #[test]
    fn test_with_content_rebuilds_fences() {
        let blocks = scan("[source,yaml]\n----\na <1>\n----\n");
        let rebuilt = blocks[0].with_content(&["a".to_string()]);
        assert_eq!(rebuilt, vec!["[source,yaml]", "----", "a", "----"]);
    }
}
