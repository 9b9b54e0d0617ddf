//! Classify JSONPath expressions as definite or indefinite
//!
//! A definite path is expected to match at most one node, so the resolver
//! unwraps its first match. An indefinite path keeps the full match list.

use regex::Regex;
use std::sync::OnceLock;

/// Deep scan, filter, multi-index, slice, or wildcard index
const INDEFINITE_PATTERN: &str = r"\.{2}|\?\(.*\)|\[\d+,\d+\]|\[.*:.*\]|\[\*\]";

static INDEFINITE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

/// Decides whether a path's matches should be returned as a list
pub trait PathClassifier {
    fn is_indefinite(&self, path: &str) -> bool;

    fn is_definite(&self, path: &str) -> bool {
        !self.is_indefinite(path)
    }
}

/// Textual classifier matching the path source against known multi-match syntax
///
/// This does not parse the path. Expressions such as `$.a[0, 1]` (space after
/// the comma) or `$.store.*` match none of the patterns and count as definite.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternClassifier;

impl PathClassifier for PatternClassifier {
    fn is_indefinite(&self, path: &str) -> bool {
        INDEFINITE_REGEX
            .get_or_init(|| Regex::new(INDEFINITE_PATTERN).ok())
            .as_ref()
            .is_some_and(|regex| regex.is_match(path))
    }
}

impl<F> PathClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_indefinite(&self, path: &str) -> bool {
        self(path)
    }
}
