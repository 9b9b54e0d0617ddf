//! Per-step node selection
//!
//! Every step maps one input node to zero or more output nodes. Nodes are
//! borrowed from the document, so a full evaluation never clones values.

use super::ast::{SliceBounds, Step};
use super::error::JsonPathError;
use super::filter::FilterEvaluator;
use serde_json::Value;

type SelectResult<T> = std::result::Result<T, JsonPathError>;

/// Deepest nesting the descendant walk will follow
pub const MAX_DESCENT_DEPTH: usize = 512;

/// Ordered set of selected nodes flowing between steps
#[derive(Debug, Default)]
pub struct Selection<'a> {
    nodes: Vec<&'a Value>,
}

impl<'a> Selection<'a> {
    pub fn single(node: &'a Value) -> Self {
        Self { nodes: vec![node] }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn into_nodes(self) -> Vec<&'a Value> {
        self.nodes
    }

    /// Push a node unless the very same node (by identity) is already present
    fn push_unique(&mut self, node: &'a Value) {
        if !self.nodes.iter().any(|seen| std::ptr::eq(*seen, node)) {
            self.nodes.push(node);
        }
    }
}

impl<'a> IntoIterator for Selection<'a> {
    type Item = &'a Value;
    type IntoIter = std::vec::IntoIter<&'a Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

/// Something that narrows a selection
pub trait SelectorExecutor {
    fn apply<'a>(&self, input: Selection<'a>, root: &'a Value) -> SelectResult<Selection<'a>>;
}

impl SelectorExecutor for Step {
    fn apply<'a>(&self, input: Selection<'a>, root: &'a Value) -> SelectResult<Selection<'a>> {
        let mut out = Vec::new();
        for node in input {
            select_into(self, node, root, &mut out)?;
        }
        Ok(Selection { nodes: out })
    }
}

fn select_into<'a>(
    step: &Step,
    node: &'a Value,
    root: &'a Value,
    out: &mut Vec<&'a Value>,
) -> SelectResult<()> {
    match step {
        Step::Child(name) => out.extend(member(node, name)),
        Step::Index(index) => out.extend(element(node, *index)),
        Step::Slice(bounds) => {
            if let Value::Array(items) = node {
                out.extend(slice_indices(bounds, items.len()).into_iter().map(|i| &items[i]));
            }
        }
        Step::Wildcard => out.extend(children(node)),
        Step::Descendants => descend(node, 0, &mut |n| out.push(n))?,
        Step::DescendantMember(name) => descend(node, 0, &mut |n| {
            if let Value::Object(map) = n {
                if let Some(found) = map.get(name) {
                    out.push(found);
                }
            }
        })?,
        Step::Union(members) => {
            let mut merged = Selection::default();
            for member_step in members {
                let mut partial = Vec::new();
                select_into(member_step, node, root, &mut partial)?;
                for selected in partial {
                    merged.push_unique(selected);
                }
            }
            out.extend(merged.nodes);
        }
        Step::Filter(filter) => {
            let evaluator = FilterEvaluator::new(filter, root);
            for child in children(node) {
                if evaluator.matches(child)? {
                    out.push(child);
                }
            }
        }
    }
    Ok(())
}

/// Member lookup; numeric names also index arrays
fn member<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(name),
        Value::Array(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn element(node: &Value, index: i64) -> Option<&Value> {
    let items = node.as_array()?;
    let resolved = if index < 0 {
        items.len().checked_sub(index.unsigned_abs() as usize)?
    } else {
        index as usize
    };
    items.get(resolved)
}

fn children(node: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match node {
        Value::Object(map) => Box::new(map.values()),
        Value::Array(items) => Box::new(items.iter()),
        _ => Box::new(std::iter::empty()),
    }
}

/// Pre-order walk over the node and everything below it
fn descend<'a, F>(node: &'a Value, depth: usize, visit: &mut F) -> SelectResult<()>
where
    F: FnMut(&'a Value),
{
    if depth > MAX_DESCENT_DEPTH {
        return Err(JsonPathError::execution(
            format!("Document nesting exceeds {} levels", MAX_DESCENT_DEPTH),
            "..",
        ));
    }
    visit(node);
    for child in children(node) {
        descend(child, depth + 1, visit)?;
    }
    Ok(())
}

/// Indices selected by a slice over an array of `len` items
pub fn slice_indices(bounds: &SliceBounds, len: usize) -> Vec<usize> {
    let step = bounds.step;
    if step == 0 || len == 0 {
        return Vec::new();
    }
    let len = len as i64;
    let normalize = |i: i64| if i < 0 { len + i } else { i };

    let mut indices = Vec::new();
    if step > 0 {
        let start = bounds.start.map(normalize).unwrap_or(0).clamp(0, len);
        let end = bounds.end.map(normalize).unwrap_or(len).clamp(0, len);
        let mut i = start;
        while i < end {
            indices.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
    } else {
        let start = bounds.start.map(normalize).unwrap_or(len - 1).clamp(-1, len - 1);
        let end = bounds.end.map(normalize).unwrap_or(-1).clamp(-1, len - 1);
        let mut i = start;
        while i > end {
            indices.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run<'a>(step: Step, data: &'a Value) -> Vec<&'a Value> {
        step.apply(Selection::single(data), data).unwrap().into_nodes()
    }

    #[test]
    fn test_member_and_numeric_member() {
        let data = json!({"a": [10, 20]});
        assert_eq!(run(Step::Child("a".into()), &data), vec![&json!([10, 20])]);
        assert_eq!(run(Step::Child("1".into()), &data["a"]), vec![&json!(20)]);
        assert!(run(Step::Child("missing".into()), &data).is_empty());
    }

    #[test]
    fn test_negative_index() {
        let data = json!([1, 2, 3]);
        assert_eq!(run(Step::Index(-1), &data), vec![&json!(3)]);
        assert!(run(Step::Index(-4), &data).is_empty());
        assert!(run(Step::Index(3), &data).is_empty());
    }

    #[test]
    fn test_slice_indices() {
        let b = |start, end, step| SliceBounds { start, end, step };
        assert_eq!(slice_indices(&b(Some(1), Some(3), 1), 5), vec![1, 2]);
        assert_eq!(slice_indices(&b(None, None, 2), 5), vec![0, 2, 4]);
        assert_eq!(slice_indices(&b(Some(-2), None, 1), 5), vec![3, 4]);
        assert_eq!(slice_indices(&b(None, None, -1), 3), vec![2, 1, 0]);
        assert!(slice_indices(&b(None, None, 0), 3).is_empty());
        assert!(slice_indices(&b(Some(4), Some(1), 1), 5).is_empty());
    }

    #[test]
    fn test_slice_extreme_steps() {
        let b = |start, end, step| SliceBounds { start, end, step };
        assert_eq!(slice_indices(&b(Some(4), Some(5), i64::MAX), 5), vec![4]);
        assert_eq!(slice_indices(&b(None, None, i64::MAX), 5), vec![0]);
        assert_eq!(slice_indices(&b(None, None, i64::MIN), 5), vec![4]);
        assert_eq!(slice_indices(&b(Some(0), None, i64::MIN), 5), vec![0]);
    }

    #[test]
    fn test_descendants_include_self_in_document_order() {
        let data = json!({"a": {"b": 1}, "c": [2]});
        let nodes = run(Step::Descendants, &data);
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0], &data);
        assert_eq!(nodes[1], &json!({"b": 1}));
        assert_eq!(nodes[2], &json!(1));
    }

    #[test]
    fn test_union_skips_same_node() {
        let data = json!(["x", "y"]);
        let nodes = run(Step::Union(vec![Step::Index(0), Step::Index(-2), Step::Index(1)]), &data);
        assert_eq!(nodes, vec![&json!("x"), &json!("y")]);
    }

    #[test]
    fn test_descent_depth_limit() {
        let mut deep = json!(0);
        for _ in 0..(MAX_DESCENT_DEPTH + 2) {
            deep = json!([deep]);
        }
        let err = Step::Descendants
            .apply(Selection::single(&deep), &deep)
            .unwrap_err();
        assert!(matches!(err, JsonPathError::Execution { .. }));
    }
}
