//! Transform preview: apply input/output maps to sample data
//!
//! Each mapping entry is resolved independently. An entry whose expression
//! fails to resolve is left out of the result and never affects the others.
//! An entry that resolves to nothing is stored as an empty string.

pub mod definiteness;
pub mod dot_path;
pub mod resolver;

pub use definiteness::{PathClassifier, PatternClassifier};
pub use dot_path::sanitize_json_path;
pub use resolver::{has_request_prefix, EvaluationRoot, PathResolver};

use crate::types::{MappingEntry, ProcessorContext, TransformContext};
use crate::Result;
use serde_json::{Map, Value};
use tracing::debug;

impl<C: PathClassifier> PathResolver<C> {
    /// Apply `map` to a single input value
    pub fn transform_object(
        &self,
        input: &Value,
        map: &[MappingEntry],
        context: ProcessorContext,
        transform_context: TransformContext,
        query: Option<&Value>,
    ) -> Value {
        let mut output = Map::new();
        for entry in map {
            let path = entry.value.value.as_str();
            match self.resolve(input, path, context, transform_context, query) {
                Ok(result) => {
                    output.insert(entry.key.clone(), or_empty(result));
                }
                Err(e) => skip(entry, &e),
            }
        }
        Value::Object(output)
    }

    /// Apply `map` to every element of `input`, collecting one list per key
    ///
    /// Entries that target the search request resolve once against it
    /// instead of once per element.
    pub fn transform_array(
        &self,
        input: &[Value],
        map: &[MappingEntry],
        context: ProcessorContext,
        transform_context: TransformContext,
        query: Option<&Value>,
    ) -> Value {
        let mut output = Map::new();
        for entry in map {
            let path = entry.value.value.as_str();
            let result = match query {
                Some(query) if has_request_prefix(path) && resolver::is_non_empty(query) => self
                    .resolve(&Value::Object(Map::new()), path, context, transform_context, Some(query))
                    .map(or_empty),
                _ => self.resolve_each(input, path, context, transform_context, query),
            };
            match result {
                Ok(value) => {
                    output.insert(entry.key.clone(), value);
                }
                Err(e) => skip(entry, &e),
            }
        }
        Value::Object(output)
    }

    fn resolve_each(
        &self,
        input: &[Value],
        path: &str,
        context: ProcessorContext,
        transform_context: TransformContext,
        query: Option<&Value>,
    ) -> Result<Value> {
        let resolved = input
            .iter()
            .map(|item| {
                self.resolve(item, path, context, transform_context, query)
                    .map(|value| value.unwrap_or(Value::Null))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(resolved))
    }
}

fn or_empty(result: Option<Value>) -> Value {
    result.unwrap_or_else(|| Value::String(String::new()))
}

fn skip(entry: &MappingEntry, error: &crate::Error) {
    debug!(key = %entry.key, path = %entry.value.value, error = %error, "Skipping mapping entry");
}

/// [`PathResolver::transform_object`] with the default classifier
pub fn transform_object(
    input: &Value,
    map: &[MappingEntry],
    context: ProcessorContext,
    transform_context: TransformContext,
    query: Option<&Value>,
) -> Value {
    PathResolver::new().transform_object(input, map, context, transform_context, query)
}

/// [`PathResolver::transform_array`] with the default classifier
pub fn transform_array(
    input: &[Value],
    map: &[MappingEntry],
    context: ProcessorContext,
    transform_context: TransformContext,
    query: Option<&Value>,
) -> Value {
    PathResolver::new().transform_array(input, map, context, transform_context, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MapEntryValue;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn entry(key: &str, path: &str) -> MappingEntry {
        MappingEntry::new(key, MapEntryValue::field(path))
    }

    #[test]
    fn test_empty_map_gives_empty_object() {
        let result = transform_object(
            &json!({"a": 1}),
            &[],
            ProcessorContext::Ingest,
            TransformContext::Input,
            None,
        );
        assert_eq!(result, json!({}));
    }

    #[test]
    fn test_failing_entry_is_omitted() {
        let result = transform_object(
            &json!({"a": 1, "b": 2}),
            &[entry("first", "$.a"), entry("broken", "$.a["), entry("second", "$.b")],
            ProcessorContext::SearchRequest,
            TransformContext::Input,
            None,
        );
        assert_eq!(result, json!({"first": 1, "second": 2}));
    }

    #[test]
    fn test_unresolved_entry_is_empty_string() {
        let result = transform_object(
            &json!({"a": {"b": null}}),
            &[entry("missing", "a.c"), entry("null", "a.b"), entry("blank", "")],
            ProcessorContext::Ingest,
            TransformContext::Input,
            None,
        );
        assert_eq!(result, json!({"missing": "", "null": null, "blank": ""}));
    }

    #[test]
    fn test_array_transform_maps_each_element() {
        let result = transform_array(
            &[json!("a"), json!("b")],
            &[entry("k", "$")],
            ProcessorContext::SearchRequest,
            TransformContext::Input,
            None,
        );
        assert_eq!(result, json!({"k": ["a", "b"]}));
    }

    #[test]
    fn test_array_transform_missing_elements_are_null() {
        let result = transform_array(
            &[json!({"t": 1}), json!({})],
            &[entry("k", "$.t")],
            ProcessorContext::SearchResponse,
            TransformContext::Output,
            None,
        );
        assert_eq!(result, json!({"k": [1, null]}));
    }

    #[test]
    fn test_array_transform_resolves_query_once() {
        let query = json!({"query": {"term": "q"}});
        let result = transform_array(
            &[json!({"t": 1}), json!({"t": 2})],
            &[entry("docs", "$.t"), entry("term", "_request.query.term")],
            ProcessorContext::SearchResponse,
            TransformContext::Output,
            Some(&query),
        );
        assert_eq!(result, json!({"docs": [1, 2], "term": "q"}));
    }

    proptest! {
        #[test]
        fn prop_empty_map_is_empty_object(n in any::<i64>(), s in "[a-z]{0,8}") {
            let input = json!({"n": n, "s": s});
            let result = transform_object(&input, &[], ProcessorContext::Ingest, TransformContext::Input, None);
            prop_assert_eq!(result, json!({}));
        }

        #[test]
        fn prop_every_key_present_for_valid_paths(keys in proptest::collection::btree_set("[a-z]{1,6}", 0..6)) {
            let map: Vec<MappingEntry> = keys.iter().map(|k| entry(k, k)).collect();
            let result = transform_object(&json!({}), &map, ProcessorContext::Ingest, TransformContext::Input, None);
            let out = result.as_object().unwrap();
            prop_assert_eq!(out.len(), keys.len());
            prop_assert!(out.values().all(|v| v == &json!("")));
        }
    }
}
