//! `{{name}}` placeholders in query templates

use crate::types::QueryParam;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn placeholder_regex() -> Option<&'static Regex> {
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\{\{([^}]+)\}\}").ok())
        .as_ref()
}

/// Unique placeholder names, in order of first appearance
pub fn extract_placeholders(template: &str) -> Vec<String> {
    let Some(regex) = placeholder_regex() else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    regex
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Replace every `{{name}}` with the matching parameter's value
///
/// Placeholders without a parameter are left as written.
pub fn interpolate(template: &str, params: &[QueryParam]) -> String {
    params.iter().fold(template.to_string(), |acc, param| {
        acc.replace(&format!("{{{{{}}}}}", param.name), &param.value)
    })
}

/// Same names regardless of order
pub fn same_names(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&String> = a.iter().collect();
    let mut b: Vec<&String> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}

/// True if any parameter is still missing a value
pub fn contains_empty_values(params: &[QueryParam]) -> bool {
    params.iter().any(|param| param.value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_dedups_in_order() {
        assert_eq!(
            extract_placeholders("{{a}} and {{b}} and {{a}}"),
            names(&["a", "b"])
        );
        assert!(extract_placeholders("no placeholders, {single} braces").is_empty());
        assert_eq!(
            extract_placeholders(r#"{"query": {"match": {"{{field}}": "{{text}}"}}}"#),
            names(&["field", "text"])
        );
    }

    #[test]
    fn test_interpolate() {
        assert_eq!(
            interpolate("hello {{name}}", &[QueryParam::new("name", "world")]),
            "hello world"
        );
        assert_eq!(
            interpolate("{{a}}+{{a}}={{b}}", &[QueryParam::new("a", "1")]),
            "1+1={{b}}"
        );
    }

    #[test]
    fn test_same_values_ignores_order_and_does_not_mutate() {
        let a = names(&["x", "y"]);
        let b = names(&["y", "x"]);
        assert!(same_names(&a, &b));
        assert_eq!(a, names(&["x", "y"]));
        assert!(!same_names(&a, &names(&["x"])));
        assert!(!same_names(&a, &names(&["x", "z"])));
    }

    #[test]
    fn test_empty_values() {
        assert!(!contains_empty_values(&[]));
        assert!(contains_empty_values(&[QueryParam::new("a", "1"), QueryParam::new("b", "")]));
    }

    proptest! {
        #[test]
        fn prop_extracted_names_are_unique(parts in proptest::collection::vec("[a-c]{1,2}", 0..12)) {
            let template: String = parts.iter().map(|p| format!("{{{{{}}}}} ", p)).collect();
            let found = extract_placeholders(&template);
            let unique: HashSet<&String> = found.iter().collect();
            prop_assert_eq!(unique.len(), found.len());
            prop_assert!(parts.iter().all(|p| found.contains(p)));
        }
    }
}
