//! Term resolution
//!
//! The term is the key a converted explanation is listed under. A
//! replaceable value such as `<project-name>` on the marked line wins;
//! otherwise the whole cleaned line is used.

use regex::Regex;
use std::sync::OnceLock;

use crate::marker::MarkerGroup;

/// Find the first replaceable `<value>` in a line, brackets included
///
/// Heredoc openers (`<<EOF`) and cross-references (`<<id>>`) are skipped,
/// as are numeric tokens, which are callout markers. A token glued to an
/// identifier (`Map<String, Integer>`) is a generic argument, not a value.
pub fn find_replaceable(line: &str) -> Option<&str> {
    static VALUE_RE: OnceLock<Regex> = OnceLock::new();
    let re = VALUE_RE.get_or_init(|| Regex::new(r"<[A-Za-z][^<>]*>").unwrap());

    re.find_iter(line)
        .find(|m| {
            let before = line[..m.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c == '<' || c.is_alphanumeric() || c == '_');
            let after = line[m.end()..].starts_with('>');
            !before && !after
        })
        .map(|m| m.as_str())
}

/// Derive the term of one group
///
/// `cleaned` is the block content with markers removed. A marker alone on
/// its line describes the nearest non-blank line above it.
pub fn resolve(group: &MarkerGroup, cleaned: &[String]) -> String {
    if let Some(value) = find_replaceable(&group.line_text) {
        return value.to_string();
    }

    cleaned
        .iter()
        .take(group.line_index + 1)
        .rev()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Fill in the term of every group
pub fn resolve_terms(groups: &mut [MarkerGroup], cleaned: &[String]) {
    for group in groups.iter_mut() {
        group.term = resolve(group, cleaned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(line_index: usize, line_text: &str) -> MarkerGroup {
        MarkerGroup {
            line_index,
            numbers: vec![1],
            line_text: line_text.to_string(),
            term: String::new(),
        }
    }

    #[test]
    fn test_find_replaceable() {
        assert_eq!(find_replaceable("name: <my-app> <1>"), Some("<my-app>"));
        assert_eq!(find_replaceable("cat <<EOF <1>"), None);
        assert_eq!(find_replaceable("see <<anchor>> <1>"), None);
        assert_eq!(find_replaceable("plain line <1>"), None);
        assert_eq!(
            find_replaceable("oc new-project <project> --display-name=<name> <1>"),
            Some("<project>")
        );
    }

    #[test]
    fn test_generic_arguments_are_not_values() {
        assert_eq!(
            find_replaceable("Map<String, Integer> counts = new HashMap<>(); // <1>"),
            None
        );
        assert_eq!(find_replaceable("List<String> items; // <1>"), None);
        assert_eq!(
            find_replaceable("Map<K, V> cache = load(<cache-name>); // <1>"),
            Some("<cache-name>")
        );
    }

    #[test]
    fn test_generic_line_uses_cleaned_code_as_term() {
        let cleaned = vec!["Map<String, Integer> counts = new HashMap<>();".to_string()];
        let g = group(0, "Map<String, Integer> counts = new HashMap<>(); // <1>");
        assert_eq!(
            resolve(&g, &cleaned),
            "Map<String, Integer> counts = new HashMap<>();"
        );
    }

    #[test]
    fn test_term_prefers_replaceable_value() {
        let cleaned = vec!["  name: <pod-name>".to_string()];
        let g = group(0, "  name: <pod-name> <1>");
        assert_eq!(resolve(&g, &cleaned), "<pod-name>");
    }

    #[test]
    fn test_term_falls_back_to_cleaned_line() {
        let cleaned = vec!["  replicas: 3".to_string()];
        let g = group(0, "  replicas: 3 # <1>");
        assert_eq!(resolve(&g, &cleaned), "replicas: 3");
    }

    #[test]
    fn test_lone_marker_describes_line_above() {
        let cleaned = vec!["spec:".to_string(), "".to_string()];
        let g = group(1, "<1>");
        assert_eq!(resolve(&g, &cleaned), "spec:");
    }

    #[test]
    fn test_resolve_terms_fills_groups() {
        let cleaned = vec!["a: 1".to_string(), "b: <value>".to_string()];
        let mut groups = vec![group(0, "a: 1 <1>"), group(1, "b: <value> <2>")];
        resolve_terms(&mut groups, &cleaned);
        assert_eq!(groups[0].term, "a: 1");
        assert_eq!(groups[1].term, "<value>");
    }
}
