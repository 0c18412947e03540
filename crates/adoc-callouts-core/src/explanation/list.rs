//! Callout list parsing (`<1> text`)

use regex::Regex;
use std::sync::OnceLock;

use super::{Explanation, ExplanationSet, ExplanationShape};
use crate::span::LineSpan;

/// Parse a callout list entry line into its number and text
pub(crate) fn parse_entry(line: &str) -> Option<(u32, &str)> {
    static ENTRY_RE: OnceLock<Regex> = OnceLock::new();
    let re = ENTRY_RE.get_or_init(|| Regex::new(r"^<(\d+)>\s+(\S.*)$").unwrap());

    let caps = re.captures(line.trim_end())?;
    let number: u32 = caps.get(1)?.as_str().parse().ok()?;
    if number == 0 {
        return None;
    }
    Some((number, caps.get(2)?.as_str()))
}

/// Check for an AsciiDoc delimited block fence inside a list continuation
pub(crate) fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_end();
    if trimmed == "|===" || trimmed == "--" {
        return true;
    }
    trimmed.len() >= 4
        && ['-', '.', '=', '*', '_', '+', '/']
            .iter()
            .any(|&c| trimmed.chars().all(|x| x == c))
}

/// Check for a block attribute line (`[source,yaml]`, `[NOTE]`)
fn is_attribute_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() > 2 && trimmed.starts_with('[') && trimmed.ends_with(']')
}

/// Check for a block title line (`.Output`)
fn is_block_title(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.len() > 1 && trimmed.starts_with('.') && !trimmed.starts_with("..")
}

/// Read a callout list starting at `first`
///
/// Delimited blocks and their attribute lines belong to an entry only when
/// a `+` line attaches them; otherwise they end the list.
pub(super) fn locate(lines: &[&str], first: usize) -> Option<ExplanationSet> {
    let (number, text) = parse_entry(lines.get(first)?)?;

    let mut entries = Vec::new();
    let mut current = (number, text.to_string(), Vec::<String>::new());
    let mut end = first + 1;
    let mut i = first + 1;
    let mut attached = false;

    while let Some(line) = lines.get(i).copied() {
        if let Some((number, text)) = parse_entry(line) {
            let done = std::mem::replace(&mut current, (number, text.to_string(), Vec::new()));
            entries.push(done);
            attached = false;
            i += 1;
            end = i;
            continue;
        }

        if line.trim().is_empty() {
            let next = (i..lines.len()).find(|&k| !lines[k].trim().is_empty());
            match next {
                Some(k) if parse_entry(lines[k]).is_some() => {
                    i = k;
                    continue;
                }
                _ => break,
            }
        }

        if line.trim() == "+" {
            current.2.push("+".to_string());
            attached = true;
            i += 1;
            end = i;
            continue;
        }

        let titles_block = is_block_title(line)
            && lines
                .get(i + 1)
                .is_some_and(|next| is_attribute_line(next) || is_fence(next));
        if is_attribute_line(line) || titles_block {
            if !attached {
                break;
            }
            current.2.push(line.trim_end().to_string());
            i += 1;
            end = i;
            continue;
        }

        if is_fence(line) {
            if !attached {
                break;
            }
            attached = false;
            let fence = line.trim_end();
            let close = (i + 1..lines.len()).find(|&k| lines[k].trim_end() == fence);
            if let Some(close) = close {
                current
                    .2
                    .extend(lines[i..=close].iter().map(|l| l.trim_end().to_string()));
                i = close + 1;
                end = i;
                continue;
            }
        }

        attached = false;
        current.2.push(line.trim_end().to_string());
        i += 1;
        end = i;
    }
    entries.push(current);

    Some(ExplanationSet {
        entries: entries
            .into_iter()
            .map(|(number, text, continuation)| Explanation::new(number, &text, continuation))
            .collect(),
        range: LineSpan::new(first, end),
        shape: ExplanationShape::List,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<ExplanationSet> {
        let lines: Vec<&str> = text.lines().collect();
        locate(&lines, 0)
    }

    #[test]
    fn test_parse_entry() {
        assert_eq!(parse_entry("<1> The name."), Some((1, "The name.")));
        assert_eq!(parse_entry("<12>   Padded."), Some((12, "Padded.")));
        assert_eq!(parse_entry("<1>"), None);
        assert_eq!(parse_entry("<0> Zero."), None);
        assert_eq!(parse_entry("* <1> bullet"), None);
    }

    #[test]
    fn test_simple_list() {
        let set = parse("<1> First.\n<2> Second.\n\nNext paragraph.\n").unwrap();
        assert_eq!(set.shape, ExplanationShape::List);
        assert_eq!(set.numbers(), vec![1, 2]);
        assert_eq!(set.entries[1].text, "Second.");
        assert_eq!(set.range, LineSpan::new(0, 2));
    }

    #[test]
    fn test_wrapped_and_continued_lines() {
        let set = parse("<1> First line\nwraps here.\n+\nAttached paragraph.\n<2> Second.\n").unwrap();
        assert_eq!(
            set.entries[0].continuation_lines,
            vec!["wraps here.", "+", "Attached paragraph."]
        );
        assert!(set.entries[1].continuation_lines.is_empty());
        assert_eq!(set.range, LineSpan::new(0, 5));
    }

    #[test]
    fn test_blank_line_between_entries() {
        let set = parse("<1> First.\n\n<2> Second.\n\nOther text.\n").unwrap();
        assert_eq!(set.numbers(), vec![1, 2]);
        assert_eq!(set.range, LineSpan::new(0, 3));
    }

    #[test]
    fn test_attached_block_with_blank_lines() {
        let set = parse("<1> Run:\n+\n----\n$ make\n\n$ make install\n----\n<2> Done.\n").unwrap();
        assert_eq!(set.numbers(), vec![1, 2]);
        assert_eq!(
            set.entries[0].continuation_lines,
            vec!["+", "----", "$ make", "", "$ make install", "----"]
        );
    }

    #[test]
    fn test_attached_block_with_attribute_line() {
        let set = parse("<1> Run:\n+\n[source,bash]\n----\n$ make\n----\n<2> Done.\n").unwrap();
        assert_eq!(
            set.entries[0].continuation_lines,
            vec!["+", "[source,bash]", "----", "$ make", "----"]
        );
        assert_eq!(set.numbers(), vec![1, 2]);
    }

    #[test]
    fn test_unattached_block_ends_list() {
        let set = parse("<1> A.\n[source,yaml]\n----\nb: 2 <1>\n----\n<1> B.\n").unwrap();
        assert_eq!(set.numbers(), vec![1]);
        assert!(set.entries[0].continuation_lines.is_empty());
        assert_eq!(set.range, LineSpan::new(0, 1));

        let set = parse("<1> A.\n----\nb <1>\n----\n").unwrap();
        assert_eq!(set.range, LineSpan::new(0, 1));
    }

    #[test]
    fn test_optional_entry() {
        let set = parse("<1> Optional. Extra labels.\n").unwrap();
        assert!(set.entries[0].is_optional);
        assert_eq!(set.entries[0].text, "Extra labels.");
    }

    #[test]
    fn test_not_a_list() {
        assert!(parse("Some text <1>\n").is_none());
    }
}
