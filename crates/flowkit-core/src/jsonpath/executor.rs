//! Runs compiled paths against documents

use super::ast::CompiledPath;
use super::error::JsonPathError;
use super::selector::{Selection, SelectorExecutor};
use serde_json::Value;

/// Executes compiled JSONPath step pipelines
#[derive(Debug, Clone, Default)]
pub struct Executor {
    /// Stop after this many matches (0 = unlimited)
    pub max_results: usize,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor that stops as soon as one match is known
    pub fn first_only() -> Self {
        Self { max_results: 1 }
    }

    /// Evaluate `path` against `data`, returning every match in document order
    pub fn execute<'a>(
        &self,
        path: &CompiledPath,
        data: &'a Value,
    ) -> std::result::Result<Vec<&'a Value>, JsonPathError> {
        if let Some(name) = path.simple_property() {
            return Ok(data.as_object().and_then(|m| m.get(name)).into_iter().collect());
        }

        let mut selection = Selection::single(data);
        for step in &path.steps {
            selection = step.apply(selection, data)?;
            if selection.is_empty() {
                break;
            }
        }

        let mut nodes = selection.into_nodes();
        if self.max_results > 0 {
            nodes.truncate(self.max_results);
        }
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonpath::{compile, Parser};
    use serde_json::json;

    fn compiled(path: &str) -> CompiledPath {
        compile(&Parser::new(path).unwrap().parse().unwrap())
    }

    #[test]
    fn test_root_returns_document() {
        let data = json!("plain string");
        assert_eq!(Executor::new().execute(&compiled("$"), &data).unwrap(), vec![&data]);
    }

    #[test]
    fn test_simple_property_fast_path() {
        let data = json!({"title": "x"});
        assert_eq!(
            Executor::new().execute(&compiled("$.title"), &data).unwrap(),
            vec![&json!("x")]
        );
        assert!(Executor::new().execute(&compiled("$.title"), &json!([1])).unwrap().is_empty());
    }

    #[test]
    fn test_first_only_truncates() {
        let data = json!({"items": [1, 2, 3]});
        let results = Executor::first_only().execute(&compiled("$.items[*]"), &data).unwrap();
        assert_eq!(results, vec![&json!(1)]);
    }
}
