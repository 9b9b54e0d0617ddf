//! Workflow configuration tree stored in a workflow's UI metadata
//!
//! Every struct keeps the keys it does not model in a flattened `extra`
//! map, so a configuration survives parse and re-serialize with its
//! unrelated fields intact.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Processor kind as stored in the template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcessorType {
    /// Model inference
    Ml,
    Split,
    Sort,
    TextChunking,
    Normalization,
    Collapse,
    Rerank,
    Other(String),
}

impl ProcessorType {
    pub fn as_str(&self) -> &str {
        match self {
            ProcessorType::Ml => "ml_processor",
            ProcessorType::Split => "split_processor",
            ProcessorType::Sort => "sort_processor",
            ProcessorType::TextChunking => "text_chunking_processor",
            ProcessorType::Normalization => "normalization_processor",
            ProcessorType::Collapse => "collapse_processor",
            ProcessorType::Rerank => "rerank_processor",
            ProcessorType::Other(name) => name,
        }
    }
}

impl From<String> for ProcessorType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ml_processor" => ProcessorType::Ml,
            "split_processor" => ProcessorType::Split,
            "sort_processor" => ProcessorType::Sort,
            "text_chunking_processor" => ProcessorType::TextChunking,
            "normalization_processor" => ProcessorType::Normalization,
            "collapse_processor" => ProcessorType::Collapse,
            "rerank_processor" => ProcessorType::Rerank,
            _ => ProcessorType::Other(value),
        }
    }
}

impl From<ProcessorType> for String {
    fn from(value: ProcessorType) -> Self {
        match value {
            ProcessorType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// One form field of a processor or pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    pub id: String,

    /// Form widget type (`string`, `json`, `map`, `mapArray`, `model`, ...)
    #[serde(rename = "type", default)]
    pub field_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigField {
    /// The value as a string, if it is one
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorConfig {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub processor_type: ProcessorType,

    #[serde(default)]
    pub fields: Vec<ConfigField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_fields: Option<Vec<ConfigField>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessorConfig {
    pub fn field(&self, id: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn field_mut(&mut self, id: &str) -> Option<&mut ConfigField> {
        self.fields.iter_mut().find(|field| field.id == id)
    }

    pub fn optional_field_mut(&mut self, id: &str) -> Option<&mut ConfigField> {
        self.optional_fields
            .as_mut()?
            .iter_mut()
            .find(|field| field.id == id)
    }
}

/// Ordered processor list of one pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorsConfig {
    #[serde(default)]
    pub processors: Vec<ProcessorConfig>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// JSON string holding the index mappings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings: Option<ConfigField>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub enrich: ProcessorsConfig,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// JSON string holding the search request template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ConfigField>,

    #[serde(default)]
    pub enrich_request: ProcessorsConfig,

    #[serde(default)]
    pub enrich_response: ProcessorsConfig,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ingest and search sides of a workflow's form state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkflowConfig {
    /// Parse a configuration from a JSON value
    pub fn from_value(value: Value) -> crate::Result<Self> {
        serde_json::from_value(value).map_err(|e| crate::Error::Configuration {
            message: format!("Invalid workflow configuration: {}", e),
            source: Some(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_processor_type_round_trip() {
        let ml: ProcessorType = serde_json::from_value(json!("ml_processor")).unwrap();
        assert_eq!(ml, ProcessorType::Ml);
        let custom: ProcessorType = serde_json::from_value(json!("my_processor")).unwrap();
        assert_eq!(custom, ProcessorType::Other("my_processor".to_string()));
        assert_eq!(serde_json::to_value(custom).unwrap(), json!("my_processor"));
    }

    #[test]
    fn test_unknown_keys_survive() {
        let raw = json!({
            "ingest": {
                "enabled": {"id": "enabled", "type": "boolean", "value": true},
                "enrich": {"processors": []},
                "index": {
                    "name": {"id": "indexName", "type": "string", "value": "my-index"},
                    "mappings": {"id": "indexMappings", "type": "json", "value": "{}"}
                }
            },
            "search": {
                "request": {"id": "request", "type": "json", "value": "{}", "label": "Query"},
                "enrichRequest": {"processors": []},
                "enrichResponse": {"processors": []}
            }
        });
        let config = WorkflowConfig::from_value(raw.clone()).unwrap();
        assert!(config.ingest.extra.contains_key("enabled"));
        assert_eq!(
            config.search.request.as_ref().and_then(|f| f.extra.get("label")),
            Some(&json!("Query"))
        );
        assert_eq!(serde_json::to_value(&config).unwrap(), raw);
    }

    #[test]
    fn test_field_lookup() {
        let mut processor: ProcessorConfig = serde_json::from_value(json!({
            "id": "ml_processor_1",
            "name": "ML Processor",
            "type": "ml_processor",
            "fields": [{"id": "model", "type": "model"}],
            "optionalFields": [{"id": "query_template", "type": "jsonString", "value": "{}"}]
        }))
        .unwrap();
        assert!(processor.field("model").is_some());
        assert!(processor.field_mut("input_map").is_none());
        assert_eq!(
            processor
                .optional_field_mut("query_template")
                .and_then(|f| f.value_str().map(str::to_string)),
            Some("{}".to_string())
        );
    }

    #[test]
    fn test_malformed_config_is_configuration_error() {
        let err = WorkflowConfig::from_value(json!({"ingest": {"enrich": {"processors": "nope"}}}))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Configuration { .. }));
    }
}
