//! Evaluate a single mapping expression against preview data

use super::definiteness::{PathClassifier, PatternClassifier};
use super::dot_path;
use crate::constants::{
    JSONPATH_ROOT_SELECTOR, REQUEST_PREFIX, REQUEST_PREFIX_WITH_JSONPATH_ROOT_SELECTOR,
    WHOLE_VALUE_PATH,
};
use crate::jsonpath::JsonPath;
use crate::types::{ProcessorContext, TransformContext};
use crate::Result;
use serde_json::Value;
use tracing::trace;

/// Where an expression is evaluated and in which notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationRoot {
    /// Dot-notation against the processor input
    DotPath,
    /// JSONPath against the original search request, request prefix removed
    Query,
    /// JSONPath against the processor input
    JsonPath,
}

impl EvaluationRoot {
    /// Pick the evaluation root for `path`
    ///
    /// `has_query` is whether a non-empty search request was supplied.
    pub fn select(
        path: &str,
        context: ProcessorContext,
        transform_context: TransformContext,
        has_query: bool,
    ) -> Self {
        let is_jsonpath = path.starts_with(JSONPATH_ROOT_SELECTOR);
        let targets_query = has_query && has_request_prefix(path);

        match (is_jsonpath, context, transform_context, targets_query) {
            (false, ProcessorContext::Ingest, TransformContext::Input, _) => EvaluationRoot::DotPath,
            (_, _, _, true) => EvaluationRoot::Query,
            (_, _, _, false) => EvaluationRoot::JsonPath,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationRoot::DotPath => "input (dot notation)",
            EvaluationRoot::Query => "search request",
            EvaluationRoot::JsonPath => "input",
        }
    }
}

/// True if `path` starts with the request prefix, with or without `$.`
pub fn has_request_prefix(path: &str) -> bool {
    path.starts_with(REQUEST_PREFIX) || path.starts_with(REQUEST_PREFIX_WITH_JSONPATH_ROOT_SELECTOR)
}

/// The JSONPath to run against the search request for a request-prefixed path
fn query_path(path: &str) -> String {
    let rest = path
        .strip_prefix(REQUEST_PREFIX_WITH_JSONPATH_ROOT_SELECTOR)
        .or_else(|| path.strip_prefix(REQUEST_PREFIX))
        .unwrap_or(path);
    if rest.starts_with(JSONPATH_ROOT_SELECTOR) {
        rest.to_string()
    } else {
        format!("{}.{}", JSONPATH_ROOT_SELECTOR, rest)
    }
}

/// Objects, arrays and strings with content; every other value counts as empty
pub fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => false,
    }
}

/// Resolves mapping expressions, using `C` to decide list versus single results
#[derive(Debug, Clone, Default)]
pub struct PathResolver<C = PatternClassifier> {
    classifier: C,
}

impl PathResolver<PatternClassifier> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: PathClassifier> PathResolver<C> {
    /// Resolver with a custom definiteness classifier
    pub fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Evaluate `path` against `root`, or against `query` for request-prefixed paths
    ///
    /// `Ok(None)` means nothing matched. Malformed JSONPath is an error so
    /// that callers can skip the one entry that used it.
    pub fn resolve(
        &self,
        root: &Value,
        path: &str,
        context: ProcessorContext,
        transform_context: TransformContext,
        query: Option<&Value>,
    ) -> Result<Option<Value>> {
        let has_query = query.is_some_and(is_non_empty);
        let selected = EvaluationRoot::select(path, context, transform_context, has_query);
        trace!(path, root = selected.as_str(), "Selected evaluation root");

        match (selected, query) {
            (EvaluationRoot::DotPath, _) if path == WHOLE_VALUE_PATH => Ok(Some(root.clone())),
            (EvaluationRoot::DotPath, _) => Ok(dot_path::get(root, path).cloned()),
            (EvaluationRoot::Query, Some(query)) => self.execute_json_path(query, &query_path(path)),
            (EvaluationRoot::Query, None) | (EvaluationRoot::JsonPath, _) => {
                self.execute_json_path(root, path)
            }
        }
    }

    /// Run a JSONPath, unwrapping the first match for definite paths
    pub fn execute_json_path(&self, data: &Value, path: &str) -> Result<Option<Value>> {
        let compiled = JsonPath::parse(path)?;
        if self.classifier.is_indefinite(path) {
            Ok(Some(Value::Array(compiled.execute_owned(data)?)))
        } else {
            Ok(compiled.execute_single(data)?.cloned())
        }
    }
}
