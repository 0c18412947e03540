//! Callout tables
//!
//! Two table layouts carry callout explanations:
//!
//! ```asciidoc
//! [cols="1,3"]
//! |===
//! | Callout | Description
//!
//! | <1>
//! | The name of the pod.
//! |===
//! ```
//!
//! ```asciidoc
//! .Parameters
//! [cols="1,2,4",options="header"]
//! |===
//! |Item |Value |Description
//!
//! |1
//! |`metadata.name`
//! |The name of the pod.
//! |===
//! ```

use regex::Regex;
use std::sync::OnceLock;

use super::{
    fill_template, is_conditional_directive, strip_optional, Explanation, ExplanationSet,
    ExplanationShape,
};
use crate::span::LineSpan;

const TABLE_FENCE: &str = "|===";

/// Words accepted in a header row
const HEADER_VOCABULARY: &[&str] = &[
    "#",
    "callout",
    "callouts",
    "description",
    "descriptions",
    "details",
    "element",
    "explanation",
    "field",
    "item",
    "items",
    "key",
    "meaning",
    "name",
    "no",
    "no.",
    "num",
    "number",
    "option",
    "parameter",
    "property",
    "setting",
    "value",
    "values",
];

/// Attributes read from the line above the table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TableAttributes {
    columns: Option<usize>,
    header: bool,
}

impl TableAttributes {
    fn parse(line: &str) -> Self {
        static COLS_RE: OnceLock<Regex> = OnceLock::new();
        static HEADER_RE: OnceLock<Regex> = OnceLock::new();
        let cols_re = COLS_RE
            .get_or_init(|| Regex::new(r#"cols\s*=\s*(?:"([^"]*)"|'([^']*)'|([^,\]\s]+))"#).unwrap());
        let header_re = HEADER_RE
            .get_or_init(|| Regex::new(r#"(?:options|opts)\s*=\s*"?[^"\]]*header|%header"#).unwrap());

        let columns = cols_re.captures(line).and_then(|caps| {
            let spec = caps.get(1).or(caps.get(2)).or(caps.get(3))?.as_str();
            Self::count_columns(spec)
        });

        Self {
            columns,
            header: header_re.is_match(line),
        }
    }

    /// Count columns in a `cols` spec: `"1,3"`, `"3*"`, `2`
    fn count_columns(spec: &str) -> Option<usize> {
        let spec = spec.trim();
        if let Ok(n) = spec.parse::<usize>() {
            return Some(n);
        }
        if let Some((repeat, _)) = spec.split_once('*') {
            if let Ok(n) = repeat.trim().parse::<usize>() {
                return Some(n);
            }
        }
        let count = spec.split(',').filter(|s| !s.trim().is_empty()).count();
        (count > 0).then_some(count)
    }
}

/// One table cell as a list of lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Cell {
    lines: Vec<String>,
}

impl Cell {
    fn push(&mut self, line: &str) {
        self.lines.push(line.trim().to_string());
    }

    /// Trim blank edges and turn inner blank runs into `+` continuations
    fn finish(self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut pending_blank = false;
        for line in self.lines {
            if line.is_empty() {
                pending_blank = !out.is_empty();
                continue;
            }
            if pending_blank {
                out.push("+".to_string());
                pending_blank = false;
            }
            out.push(line);
        }
        out
    }
}

/// Match a cell specifier followed by a pipe at line start (`|`, `a|`, `2+|`)
fn starts_cell(line: &str) -> bool {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    let re = CELL_RE.get_or_init(|| {
        Regex::new(r"^(?:\d+[*+])?(?:\.\d+\+)?[<^>]?(?:\.[<^>])?[adehlmsv]?\|").unwrap()
    });
    re.is_match(line.trim_start())
}

/// Split a row line into cell fragments, dropping specifiers
fn split_cells(line: &str) -> Vec<String> {
    static TRAILING_SPEC_RE: OnceLock<Regex> = OnceLock::new();
    let spec_re = TRAILING_SPEC_RE
        .get_or_init(|| Regex::new(r"\s(?:\d+[*+])?[<^>]?[adehlmsv]$").unwrap());

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut chars = line.trim_start().chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => pieces.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    pieces.push(current);

    // The first piece is the specifier of the first cell
    let count = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .skip(1)
        .map(|(i, piece)| {
            if i + 1 < count {
                spec_re.replace(&piece, "").into_owned()
            } else {
                piece
            }
        })
        .collect()
}

/// Collect the cells of a table body
fn collect_cells(body: &[&str]) -> Vec<Cell> {
    let mut cells: Vec<Cell> = Vec::new();
    for line in body {
        if starts_cell(line) {
            for fragment in split_cells(line) {
                let mut cell = Cell::default();
                cell.push(&fragment);
                cells.push(cell);
            }
        } else if let Some(cell) = cells.last_mut() {
            cell.push(line);
        }
    }
    cells
}

/// Parse the number cell of a row: `<1>`, `1`, `1.`
fn parse_number(cell: &[String]) -> Option<u32> {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER_RE.get_or_init(|| Regex::new(r"^<?(\d+)>?\.?$").unwrap());

    let [only] = cell else {
        return None;
    };
    let number: u32 = re.captures(only)?.get(1)?.as_str().parse().ok()?;
    (number > 0).then_some(number)
}

/// Normalize a header cell: strip inline formatting, lowercase
fn header_word(cell: &[String]) -> String {
    cell.join(" ")
        .trim_matches(|c: char| c == '*' || c == '_' || c == '`' || c.is_whitespace())
        .to_lowercase()
}

/// A header row has no callout number and only header words
fn is_header_row(row: &[Vec<String>]) -> bool {
    let Some(first) = row.first() else {
        return false;
    };
    parse_number(first).is_none()
        && row
            .iter()
            .all(|cell| HEADER_VOCABULARY.contains(&header_word(cell).as_str()))
}

/// Build an explanation from its number and the lines of its text cell
fn explanation_from_cell(number: u32, lines: Vec<String>) -> Explanation {
    let mut lines = lines.into_iter();
    let text = lines.next().unwrap_or_default();
    if is_conditional_directive(&text) {
        let mut continuation = vec![text];
        continuation.extend(lines);
        return Explanation {
            number,
            text: String::new(),
            is_optional: false,
            continuation_lines: continuation,
        };
    }
    Explanation::new(number, &text, lines.collect())
}

/// Build a three-column explanation: phrasing around the value, then the
/// description
fn explanation_from_value(
    number: u32,
    value: &[String],
    description: Vec<String>,
    template: &str,
) -> Explanation {
    let value = value.join(" ");
    let value = value.trim_matches('`');
    let mut description = description.into_iter();
    let first = description.next().unwrap_or_default();

    if is_conditional_directive(&first) {
        let mut continuation = vec![first];
        continuation.extend(description);
        return Explanation {
            number,
            text: fill_template(template, &value, ""),
            is_optional: false,
            continuation_lines: continuation,
        };
    }

    let (is_optional, first) = strip_optional(&first);
    Explanation {
        number,
        text: fill_template(template, &value, first),
        is_optional,
        continuation_lines: description.collect(),
    }
}

/// Read a callout table whose title, attribute or fence line is at `first`
pub(super) fn locate(lines: &[&str], first: usize, template: &str) -> Option<ExplanationSet> {
    static TITLE_RE: OnceLock<Regex> = OnceLock::new();
    let title_re = TITLE_RE.get_or_init(|| Regex::new(r"^\.[^.\s]").unwrap());

    let mut i = first;
    if lines.get(i).is_some_and(|l| title_re.is_match(l)) {
        i += 1;
    }
    let mut attributes = TableAttributes::default();
    if let Some(line) = lines.get(i) {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            attributes = TableAttributes::parse(trimmed);
            i += 1;
        }
    }
    if lines.get(i)?.trim_end() != TABLE_FENCE {
        return None;
    }

    let open = i;
    let close = (open + 1..lines.len()).find(|&k| lines[k].trim_end() == TABLE_FENCE)?;
    let body = &lines[open + 1..close];

    let columns = match attributes.columns {
        Some(n) => n,
        None => body
            .iter()
            .find(|l| !l.trim().is_empty())
            .filter(|l| starts_cell(l))
            .map(|l| split_cells(l).len())?,
    };
    let shape = match columns {
        3 => ExplanationShape::ThreeColumnTable,
        2 => ExplanationShape::TwoColumnTable,
        _ => return None,
    };

    let cells: Vec<Vec<String>> = collect_cells(body).into_iter().map(Cell::finish).collect();
    if cells.is_empty() || cells.len() % columns != 0 {
        tracing::debug!(line = open + 1, cells = cells.len(), columns, "table cells do not fill rows");
        return None;
    }

    let mut rows: Vec<Vec<Vec<String>>> = cells.chunks(columns).map(<[_]>::to_vec).collect();
    if attributes.header || is_header_row(&rows[0]) {
        rows.remove(0);
    }

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let mut row = row.into_iter();
        let number = parse_number(&row.next()?)?;
        let entry = match shape {
            ExplanationShape::ThreeColumnTable => {
                let value = row.next()?;
                let description = row.next()?;
                explanation_from_value(number, &value, description, template)
            }
            _ => explanation_from_cell(number, row.next()?),
        };
        entries.push(entry);
    }

    Some(ExplanationSet {
        entries,
        range: LineSpan::new(first, close + 1),
        shape,
    })
}
