//! JSONPath evaluation for mapping expressions
//!
//! Supports `$`, `.name`, `['name']`, `[n]`, `[-n]`, `[start:end:step]`,
//! `*`/`[*]`, `..`, unions (`[0,1]`, `['a','b']`) and filters
//! (`[?(@.price < 10 && @.tag =~ '^x')]`). Evaluation always yields the list
//! of matched nodes; deciding whether a caller wants one value or the whole
//! list is left to [`crate::transform::definiteness`].
//!
//! ```
//! use flowkit_core::jsonpath::JsonPath;
//! use serde_json::json;
//!
//! let doc = json!({"hits": {"hits": [{"_source": {"text": "a"}}, {"_source": {"text": "b"}}]}});
//! let path = JsonPath::parse("$.hits.hits[*]._source.text").unwrap();
//! assert_eq!(path.execute(&doc).unwrap(), vec![&json!("a"), &json!("b")]);
//! ```

pub mod ast;
pub mod compiler;
pub mod error;
pub mod executor;
pub mod filter;
pub mod parser;
pub mod selector;


pub use ast::{CompiledPath, FilterExpression, Path, Selector, Step};
pub use compiler::compile;
pub use error::{ErrorSeverity, JsonPathError};
pub use executor::Executor;
pub use parser::Parser;

use crate::Result;
use serde_json::Value;

/// A parsed and compiled JSONPath expression
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPath {
    source: String,
    parsed: Path,
    compiled: CompiledPath,
}

impl JsonPath {
    /// Parse and compile an expression
    pub fn parse(path: &str) -> Result<Self> {
        let parsed = Parser::new(path)?.parse()?;
        let compiled = compile(&parsed);
        Ok(Self {
            source: path.to_string(),
            parsed,
            compiled,
        })
    }

    /// All matches, in document order
    pub fn execute<'a>(&self, data: &'a Value) -> Result<Vec<&'a Value>> {
        Ok(Executor::new().execute(&self.compiled, data)?)
    }

    /// First match, if any
    pub fn execute_single<'a>(&self, data: &'a Value) -> Result<Option<&'a Value>> {
        Ok(Executor::first_only()
            .execute(&self.compiled, data)?
            .into_iter()
            .next())
    }

    /// All matches as owned values
    pub fn execute_owned(&self, data: &Value) -> Result<Vec<Value>> {
        Ok(self.execute(data)?.into_iter().cloned().collect())
    }

    pub fn exists(&self, data: &Value) -> Result<bool> {
        Ok(self.execute_single(data)?.is_some())
    }

    /// The expression as written
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Path {
        &self.parsed
    }
}

impl std::fmt::Display for JsonPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.parsed)
    }
}

/// Parse `path` and return every match in `data`
pub fn select<'a>(path: &str, data: &'a Value) -> Result<Vec<&'a Value>> {
    JsonPath::parse(path)?.execute(data)
}

/// Parse `path` and return its first match in `data`
pub fn select_single<'a>(path: &str, data: &'a Value) -> Result<Option<&'a Value>> {
    JsonPath::parse(path)?.execute_single(data)
}

pub fn exists(path: &str, data: &Value) -> Result<bool> {
    JsonPath::parse(path)?.exists(data)
}
