//! Filter predicate evaluation
//!
//! Evaluation yields `Option<Value>`: `None` stands for "nothing there"
//! (a missing member or out-of-range index). Missing operands never raise;
//! they just make comparisons false. Truthiness follows the JavaScript rules
//! the mapping language was designed around: `null`, `false`, `0` and `""`
//! are falsy, every array and object is truthy.

use super::ast::{BinaryOperator, FilterExpression, FilterFunction, Literal};
use super::error::JsonPathError;
use regex::Regex;
use serde_json::{Number, Value};
use std::borrow::Cow;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;

type EvalResult<'v> = std::result::Result<Option<Cow<'v, Value>>, JsonPathError>;

/// Evaluates one filter expression against candidate nodes
///
/// Intermediate values borrow from the document; only computed values
/// (lengths, comparisons, function results) are owned.
pub struct FilterEvaluator<'f, 'r> {
    filter: &'f FilterExpression,
    root: &'r Value,
    regex_cache: RefCell<HashMap<String, Regex>>,
}

impl<'f, 'r> FilterEvaluator<'f, 'r> {
    pub fn new(filter: &'f FilterExpression, root: &'r Value) -> Self {
        Self {
            filter,
            root,
            regex_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Whether `current` passes the filter
    pub fn matches(&self, current: &Value) -> std::result::Result<bool, JsonPathError> {
        let result = self.evaluate(self.filter, current)?;
        Ok(result.as_deref().is_some_and(is_truthy))
    }

    fn evaluate<'v>(&'v self, expr: &FilterExpression, current: &'v Value) -> EvalResult<'v> {
        match expr {
            FilterExpression::Current => Ok(Some(Cow::Borrowed(current))),
            FilterExpression::Root => Ok(Some(Cow::Borrowed(self.root))),
            FilterExpression::Property { base, name } => {
                Ok(self.evaluate(base, current)?.and_then(|v| property(v, name)))
            }
            FilterExpression::Index { base, index } => {
                Ok(self.evaluate(base, current)?.and_then(|v| index_of(v, *index)))
            }
            FilterExpression::Literal(literal) => Ok(Some(Cow::Owned(literal_value(literal)))),
            FilterExpression::Not(operand) => {
                let value = self.evaluate(operand, current)?;
                Ok(owned_bool(!value.as_deref().is_some_and(is_truthy)))
            }
            FilterExpression::Negate(operand) => match self.evaluate(operand, current)?.as_deref() {
                None => Ok(None),
                Some(Value::Number(n)) => Ok(n.as_f64().and_then(|f| number(-f)).map(Cow::Owned)),
                Some(other) => Err(JsonPathError::type_mismatch(
                    "number",
                    type_name(other),
                    "negation",
                )),
            },
            FilterExpression::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, *operator, right, current),
            FilterExpression::Function { function, args } => {
                let target = match args.first() {
                    Some(arg) => self.evaluate(arg, current)?,
                    None => Some(Cow::Borrowed(current)),
                };
                Ok(target
                    .and_then(|v| apply_function(*function, &v))
                    .map(Cow::Owned))
            }
        }
    }

    fn evaluate_binary<'v>(
        &'v self,
        left: &FilterExpression,
        operator: BinaryOperator,
        right: &FilterExpression,
        current: &'v Value,
    ) -> EvalResult<'v> {
        let lhs = self.evaluate(left, current)?;
        match operator {
            BinaryOperator::And if !lhs.as_deref().is_some_and(is_truthy) => return Ok(owned_bool(false)),
            BinaryOperator::Or if lhs.as_deref().is_some_and(is_truthy) => return Ok(owned_bool(true)),
            _ => {}
        }
        let rhs = self.evaluate(right, current)?;
        let (lhs, rhs) = (lhs.as_deref(), rhs.as_deref());

        let result = match operator {
            BinaryOperator::And | BinaryOperator::Or => rhs.is_some_and(is_truthy),
            BinaryOperator::Equal => loosely_equal(lhs, rhs),
            BinaryOperator::NotEqual => !loosely_equal(lhs, rhs),
            BinaryOperator::LessThan => compare(lhs, rhs) == Some(Ordering::Less),
            BinaryOperator::LessThanOrEqual => {
                matches!(compare(lhs, rhs), Some(Ordering::Less | Ordering::Equal))
            }
            BinaryOperator::GreaterThan => compare(lhs, rhs) == Some(Ordering::Greater),
            BinaryOperator::GreaterThanOrEqual => {
                matches!(compare(lhs, rhs), Some(Ordering::Greater | Ordering::Equal))
            }
            BinaryOperator::RegexMatch => match (lhs, rhs) {
                (Some(Value::String(text)), Some(Value::String(pattern))) => {
                    self.regex_matches(text, pattern)?
                }
                _ => false,
            },
            BinaryOperator::In => match (lhs, rhs) {
                (Some(needle), Some(Value::Array(items))) => {
                    items.iter().any(|item| loosely_equal(Some(needle), Some(item)))
                }
                (Some(Value::String(needle)), Some(Value::String(haystack))) => {
                    haystack.contains(needle.as_str())
                }
                (Some(Value::String(key)), Some(Value::Object(map))) => map.contains_key(key),
                _ => false,
            },
        };
        Ok(owned_bool(result))
    }

    fn regex_matches(&self, text: &str, pattern: &str) -> std::result::Result<bool, JsonPathError> {
        let mut cache = self.regex_cache.borrow_mut();
        if !cache.contains_key(pattern) {
            let regex = Regex::new(pattern).map_err(|e| {
                JsonPathError::filter_evaluation(
                    format!("invalid regular expression: {}", e),
                    self.filter.to_string(),
                )
            })?;
            cache.insert(pattern.to_string(), regex);
        }
        Ok(cache.get(pattern).is_some_and(|regex| regex.is_match(text)))
    }
}

fn owned_bool<'v>(b: bool) -> Option<Cow<'v, Value>> {
    Some(Cow::Owned(Value::Bool(b)))
}

/// Member of `value`, borrowed from the document when the base is borrowed
fn property<'v>(value: Cow<'v, Value>, name: &str) -> Option<Cow<'v, Value>> {
    match value {
        Cow::Borrowed(v) => member_of(v, name),
        Cow::Owned(v) => member_of(&v, name).map(|m| Cow::Owned(m.into_owned())),
    }
}

fn member_of<'a>(value: &'a Value, name: &str) -> Option<Cow<'a, Value>> {
    match value {
        Value::Object(map) => map.get(name).map(Cow::Borrowed),
        Value::Array(items) if name == "length" => number(items.len() as f64).map(Cow::Owned),
        Value::Array(items) => name
            .parse::<usize>()
            .ok()
            .and_then(|i| items.get(i))
            .map(Cow::Borrowed),
        Value::String(s) if name == "length" => number(s.chars().count() as f64).map(Cow::Owned),
        _ => None,
    }
}

fn index_of<'v>(value: Cow<'v, Value>, index: i64) -> Option<Cow<'v, Value>> {
    match value {
        Cow::Borrowed(v) => element_of(v, index).map(Cow::Borrowed),
        Cow::Owned(v) => element_of(&v, index).cloned().map(Cow::Owned),
    }
}

fn element_of(value: &Value, index: i64) -> Option<&Value> {
    let items = value.as_array()?;
    let resolved = if index < 0 {
        items.len().checked_sub(index.unsigned_abs() as usize)?
    } else {
        index as usize
    };
    items.get(resolved)
}

fn apply_function(function: FilterFunction, value: &Value) -> Option<Value> {
    match function {
        FilterFunction::Length | FilterFunction::Size => match value {
            Value::Array(items) => number(items.len() as f64),
            Value::Object(map) => number(map.len() as f64),
            Value::String(s) => number(s.chars().count() as f64),
            _ => None,
        },
        FilterFunction::Type => Some(Value::String(type_name(value).to_string())),
        FilterFunction::Keys => value
            .as_object()
            .map(|map| Value::Array(map.keys().cloned().map(Value::String).collect())),
        FilterFunction::Values => match value {
            Value::Object(map) => Some(Value::Array(map.values().cloned().collect())),
            Value::Array(items) => Some(Value::Array(items.clone())),
            _ => None,
        },
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::String(s) => Value::String(s.clone()),
        Literal::Number(n) => number(*n).unwrap_or(Value::Null),
        Literal::Boolean(b) => Value::Bool(*b),
        Literal::Null => Value::Null,
    }
}

/// Integral floats become integer numbers so `== 1` matches `1` in documents
fn number(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Some(Value::Number(Number::from(n as i64)))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn loosely_equal(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) | (None, Some(Value::Null)) | (Some(Value::Null), None) => true,
        (Some(Value::Number(a)), Some(Value::Number(b))) => a.as_f64() == b.as_f64(),
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn compare(left: Option<&Value>, right: Option<&Value>) -> Option<Ordering> {
    match (left?, right?) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonpath::{Parser, Selector};
    use serde_json::json;

    fn filter_of(path: &str) -> FilterExpression {
        let parsed = Parser::new(path).unwrap().parse().unwrap();
        match parsed.selectors.into_iter().last() {
            Some(Selector::Filter(filter)) => filter,
            other => panic!("Expected filter selector, got {:?}", other),
        }
    }

    fn passes(path: &str, node: &Value) -> bool {
        let filter = filter_of(path);
        FilterEvaluator::new(&filter, node).matches(node).unwrap()
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!("x")));
    }

    #[test]
    fn test_comparisons() {
        let book = json!({"price": 8.95, "title": "Sayings", "tags": ["a", "b"]});
        assert!(passes("$[?(@.price < 10)]", &book));
        assert!(!passes("$[?(@.price >= 10)]", &book));
        assert!(passes("$[?(@.title == 'Sayings')]", &book));
        assert!(passes("$[?(@.title != 'Other')]", &book));
        assert!(passes("$[?(@.tags.length == 2)]", &book));
    }

    #[test]
    fn test_missing_members_do_not_match() {
        let doc = json!({"a": 1});
        assert!(!passes("$[?(@.missing > 0)]", &doc));
        assert!(!passes("$[?(@.missing)]", &doc));
        assert!(passes("$[?(!@.missing)]", &doc));
        assert!(passes("$[?(@.missing == null)]", &doc));
    }

    #[test]
    fn test_integer_literal_equals_document_integer() {
        assert!(passes("$[?(@.n == 3)]", &json!({"n": 3})));
        assert!(passes("$[?(@.n == 3)]", &json!({"n": 3.0})));
    }

    #[test]
    fn test_regex_and_in() {
        let doc = json!({"name": "John Smith", "tags": ["x"]});
        assert!(passes("$[?(@.name =~ '^J.*h$')]", &doc));
        assert!(!passes("$[?(@.name =~ '^Z')]", &doc));
        assert!(passes("$[?('x' in @.tags)]", &doc));
        assert!(passes("$[?('Smith' in @.name)]", &doc));
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let filter = filter_of("$[?(@.name =~ '(')]");
        let doc = json!({"name": "x"});
        let err = FilterEvaluator::new(&filter, &doc).matches(&doc).unwrap_err();
        assert!(matches!(err, JsonPathError::FilterEvaluation { .. }));
    }

    #[test]
    fn test_functions() {
        let doc = json!({"items": [1, 2, 3], "meta": {"k": "v"}});
        assert!(passes("$[?(length(@.items) == 3)]", &doc));
        assert!(passes("$[?(type(@.meta) == 'object')]", &doc));
        assert!(passes("$[?('k' in keys(@.meta))]", &doc));
        assert!(passes("$[?(size(values(@.meta)) == 1)]", &doc));
    }

    #[test]
    fn test_root_reference() {
        let doc = json!({"limit": 5, "value": 3});
        assert!(passes("$[?(@.value < $.limit)]", &doc));
    }

    #[test]
    fn test_root_members_borrowed_across_candidates() {
        let doc = json!({"allowed": ["a", "c"], "items": ["a", "b", "c"]});
        let filter = filter_of("$.items[?(@ in $.allowed)]");
        let evaluator = FilterEvaluator::new(&filter, &doc);
        let kept: Vec<&Value> = doc["items"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|item| evaluator.matches(item).unwrap())
            .collect();
        assert_eq!(kept, vec![&json!("a"), &json!("c")]);
        assert!(passes("$[?($.allowed[-1] == 'c')]", &doc));
        assert!(passes("$[?(length($.items) == 3)]", &doc));
    }

    #[test]
    fn test_negating_string_is_type_mismatch() {
        let filter = filter_of("$[?(-@.name > 0)]");
        let doc = json!({"name": "x"});
        let err = FilterEvaluator::new(&filter, &doc).matches(&doc).unwrap_err();
        assert!(matches!(err, JsonPathError::TypeMismatch { .. }));
    }
}
