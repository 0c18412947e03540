//! Explanation locator
//!
//! After a code block, callout explanations come in one of three shapes:
//!
//! - a callout list (`<1> Explanation text`)
//! - a two-column table (`| <1> | Explanation text`)
//! - a three-column table (`| 1 | value | Description`)
//!
//! Tables are tried first, three columns before two, then the list form.

mod list;
mod table;

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::span::LineSpan;

/// Default phrasing for three-column table explanations
pub const DEFAULT_THREE_COLUMN_TEMPLATE: &str = "Refers to `{value}`. {description}";

/// Blank lines allowed between a block and its explanation
pub const MAX_BLANK_LINES: usize = 2;

/// Source shape an explanation set was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExplanationShape {
    /// `<N> text` lines
    List,
    /// `| callout | explanation` rows
    TwoColumnTable,
    /// `| item | value | description` rows
    ThreeColumnTable,
}

impl std::fmt::Display for ExplanationShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExplanationShape::List => write!(f, "callout list"),
            ExplanationShape::TwoColumnTable => write!(f, "two-column table"),
            ExplanationShape::ThreeColumnTable => write!(f, "three-column table"),
        }
    }
}

/// The explanation of one callout number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    /// Callout number
    pub number: u32,
    /// First line of the explanation, `Optional.` prefix removed
    pub text: String,
    /// Whether the explanation was introduced by `Optional.`
    pub is_optional: bool,
    /// Further lines, verbatim (`+` continuations and directives included)
    pub continuation_lines: Vec<String>,
}

impl Explanation {
    /// Build an explanation, detecting a leading `Optional.`
    pub fn new(number: u32, text: &str, continuation_lines: Vec<String>) -> Self {
        let (is_optional, text) = strip_optional(text);
        Self {
            number,
            text: text.to_string(),
            is_optional,
            continuation_lines,
        }
    }

    /// Check if any line carries a conditional preprocessor directive
    pub fn has_conditionals(&self) -> bool {
        is_conditional_directive(&self.text)
            || self
                .continuation_lines
                .iter()
                .any(|l| is_conditional_directive(l))
    }

    /// Check if a delimited block is attached to the explanation
    pub fn has_attached_block(&self) -> bool {
        self.continuation_lines.iter().any(|l| list::is_fence(l))
    }

    /// All lines of the explanation, text first
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.text.as_str())
            .filter(|t| !t.is_empty())
            .chain(self.continuation_lines.iter().map(String::as_str))
    }
}

/// The explanations found after one code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationSet {
    /// Entries in source order, duplicates kept
    pub entries: Vec<Explanation>,
    /// Source lines of the explanation, removed on conversion
    pub range: LineSpan,
    /// Shape the entries were read from
    pub shape: ExplanationShape,
}

impl ExplanationSet {
    /// Every entry number in source order (duplicates kept)
    pub fn numbers(&self) -> Vec<u32> {
        self.entries.iter().map(|e| e.number).collect()
    }

    /// First explanation with the given number
    pub fn get(&self, number: u32) -> Option<&Explanation> {
        self.entries.iter().find(|e| e.number == number)
    }

    /// Check if no entry was read
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Finds and parses the explanation following a code block
#[derive(Debug, Clone)]
pub struct ExplanationLocator {
    three_column_template: String,
}

impl Default for ExplanationLocator {
    fn default() -> Self {
        Self::new(DEFAULT_THREE_COLUMN_TEMPLATE)
    }
}

impl ExplanationLocator {
    /// Create a locator with a custom three-column phrasing
    ///
    /// `{value}` and `{description}` are replaced by the cell contents.
    pub fn new(three_column_template: impl Into<String>) -> Self {
        Self {
            three_column_template: three_column_template.into(),
        }
    }

    /// Locate the explanation starting at line `after` (the line after the
    /// closing delimiter)
    ///
    /// Returns `None` when no recognizable shape follows the block.
    pub fn locate(&self, lines: &[&str], after: usize) -> Option<ExplanationSet> {
        let first = (after..lines.len())
            .take(MAX_BLANK_LINES + 1)
            .find(|&i| !lines[i].trim().is_empty())?;

        if let Some(set) = table::locate(lines, first, &self.three_column_template) {
            tracing::debug!(line = first + 1, shape = %set.shape, "explanation table found");
            return Some(set);
        }

        let set = list::locate(lines, first)?;
        tracing::debug!(line = first + 1, entries = set.entries.len(), "callout list found");
        Some(set)
    }
}

/// Substitute `{value}` and `{description}` in a three-column template
pub(crate) fn fill_template(template: &str, value: &str, description: &str) -> String {
    template
        .replace("{value}", value)
        .replace("{description}", description)
        .trim()
        .to_string()
}

/// Split a leading `Optional.` or `Optional:` off an explanation
pub fn strip_optional(text: &str) -> (bool, &str) {
    static OPTIONAL_RE: OnceLock<Regex> = OnceLock::new();
    let re = OPTIONAL_RE.get_or_init(|| Regex::new(r"^Optional[.:](?:\s+|$)").unwrap());

    let trimmed = text.trim();
    match re.find(trimmed) {
        Some(m) => (true, trimmed[m.end()..].trim_start()),
        None => (false, trimmed),
    }
}

/// Check for `ifdef::`, `ifndef::`, `ifeval::` and `endif::` lines
pub fn is_conditional_directive(line: &str) -> bool {
    static DIRECTIVE_RE: OnceLock<Regex> = OnceLock::new();
    let re = DIRECTIVE_RE
        .get_or_init(|| Regex::new(r"^(?:ifn?def|ifeval|endif)::[^\[]*\[.*\]\s*$").unwrap());
    re.is_match(line.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate(text: &str) -> Option<ExplanationSet> {
        let lines: Vec<&str> = text.lines().collect();
        ExplanationLocator::default().locate(&lines, 0)
    }

    #[test]
    fn test_strip_optional() {
        assert_eq!(strip_optional("Optional. Sets the name."), (true, "Sets the name."));
        assert_eq!(strip_optional("Optional: Sets the name."), (true, "Sets the name."));
        assert_eq!(strip_optional("Optional"), (false, "Optional"));
        assert_eq!(strip_optional("Optionally sets it."), (false, "Optionally sets it."));
        assert_eq!(strip_optional("Sets the name."), (false, "Sets the name."));
    }

    #[test]
    fn test_conditional_directives() {
        assert!(is_conditional_directive("ifdef::openshift[]"));
        assert!(is_conditional_directive("ifndef::upstream,downstream[]"));
        assert!(is_conditional_directive("ifeval::[{release} >= 4]"));
        assert!(is_conditional_directive("endif::[]"));
        assert!(!is_conditional_directive("ifdef is mentioned here"));
    }

    #[test]
    fn test_explanation_optional_flag() {
        let explanation = Explanation::new(2, "Optional. Adds labels.", vec![]);
        assert!(explanation.is_optional);
        assert_eq!(explanation.text, "Adds labels.");
    }

    #[test]
    fn test_locate_not_found() {
        assert!(locate("Just a paragraph.\n").is_none());
        assert!(locate("").is_none());
    }

    #[test]
    fn test_locate_too_far_away() {
        assert!(locate("\n\n\n<1> Too far.\n").is_none());
        assert!(locate("\n\n<1> Close enough.\n").is_some());
    }

    #[test]
    fn test_table_has_priority_over_list() {
        let set = locate(
            "|===\n|1 |`name` |The name.\n|===\n\n<1> Stray list line.\n",
        )
        .unwrap();
        assert_eq!(set.shape, ExplanationShape::ThreeColumnTable);
        assert_eq!(set.range, LineSpan::new(0, 3));
    }

    #[test]
    fn test_custom_three_column_template() {
        let locator = ExplanationLocator::new("`{value}`: {description}");
        let lines = vec!["|===", "|1 |name |The name.", "|==="];
        let set = locator.locate(&lines, 0).unwrap();
        assert_eq!(set.entries[0].text, "`name`: The name.");
    }

    #[test]
    fn test_set_lookup_keeps_duplicates() {
        let set = locate("<1> First.\n<1> Again.\n<2> Second.\n").unwrap();
        assert_eq!(set.numbers(), vec![1, 1, 2]);
        assert_eq!(set.get(1).unwrap().text, "First.");
        assert!(set.get(3).is_none());
    }
}
