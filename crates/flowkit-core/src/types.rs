//! Core data structures for mapping expressions and preview contexts
//!
//! These mirror the shapes stored inside workflow templates, so every type
//! serializes with the same field names the templates use (`transformType`,
//! `nestedVars`, ...).

use serde::{Deserialize, Serialize};

/// Pipeline stage a processor runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorContext {
    Ingest,
    SearchRequest,
    SearchResponse,
}

/// Which side of a processor a mapping expression is evaluated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformContext {
    Input,
    Output,
    Query,
}

/// How a mapping entry's `value` is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformType {
    /// Not chosen yet; templates store this as an empty string
    #[default]
    #[serde(rename = "")]
    Unset,
    Field,
    Expression,
    Template,
    String,
}

/// Named substitution inside a template-type mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedVar {
    pub name: String,
    pub transform: String,
}

/// Source side of a mapping entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEntryValue {
    #[serde(default)]
    pub transform_type: TransformType,

    /// Path expression, template text or literal, depending on `transform_type`
    #[serde(default)]
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_vars: Option<Vec<NestedVar>>,
}

/// One output-key to source-expression binding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub key: String,
    #[serde(default)]
    pub value: MapEntryValue,
}

/// An ordered input or output map
pub type MapFormValue = Vec<MappingEntry>;

impl MapEntryValue {
    /// A direct field reference
    pub fn field(path: impl Into<String>) -> Self {
        Self {
            transform_type: TransformType::Field,
            value: path.into(),
            nested_vars: None,
        }
    }

    /// A prompt template with nested substitutions
    pub fn template(template: impl Into<String>, nested_vars: Vec<NestedVar>) -> Self {
        Self {
            transform_type: TransformType::Template,
            value: template.into(),
            nested_vars: Some(nested_vars),
        }
    }
}

impl MappingEntry {
    pub fn new(key: impl Into<String>, value: MapEntryValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Entry with an empty key and an unset transform
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A resolved query placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    pub name: String,
    pub value: String,
}

impl QueryParam {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Semantic field names a user declares in the quick-configure step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickConfigureFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_response_field: Option<String>,
}

/// A declared name, treating the empty string as not declared
fn declared(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|name| !name.is_empty())
}

impl QuickConfigureFields {
    /// True when nothing was declared
    pub fn is_empty(&self) -> bool {
        self.model_id().is_none()
            && self.text_field().is_none()
            && self.image_field().is_none()
            && self.label_field().is_none()
            && self.vector_field().is_none()
            && self.embedding_length.is_none()
            && self.prompt_field().is_none()
            && self.llm_response_field().is_none()
    }

    pub fn model_id(&self) -> Option<&str> {
        declared(&self.model_id)
    }

    pub fn text_field(&self) -> Option<&str> {
        declared(&self.text_field)
    }

    pub fn image_field(&self) -> Option<&str> {
        declared(&self.image_field)
    }

    pub fn label_field(&self) -> Option<&str> {
        declared(&self.label_field)
    }

    pub fn vector_field(&self) -> Option<&str> {
        declared(&self.vector_field)
    }

    pub fn prompt_field(&self) -> Option<&str> {
        declared(&self.prompt_field)
    }

    pub fn llm_response_field(&self) -> Option<&str> {
        declared(&self.llm_response_field)
    }
}
