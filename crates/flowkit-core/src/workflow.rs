//! Workflow templates, provisioned resources, and template validation

use crate::config::WorkflowConfig;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Use case a workflow was created from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkflowType {
    SemanticSearch,
    MultimodalSearch,
    HybridSearch,
    SentimentAnalysis,
    Rag,
    Custom,
    Unknown(String),
}

impl WorkflowType {
    pub fn as_str(&self) -> &str {
        match self {
            WorkflowType::SemanticSearch => "Semantic Search",
            WorkflowType::MultimodalSearch => "Multimodal Search",
            WorkflowType::HybridSearch => "Hybrid Search",
            WorkflowType::SentimentAnalysis => "Sentiment Analysis",
            WorkflowType::Rag => "Retrieval-Augmented Generation",
            WorkflowType::Custom => "Custom Search",
            WorkflowType::Unknown(name) => name,
        }
    }

    /// Use cases whose model produces embeddings
    pub fn is_vector_search(&self) -> bool {
        matches!(
            self,
            WorkflowType::SemanticSearch | WorkflowType::MultimodalSearch | WorkflowType::HybridSearch
        )
    }
}

impl From<String> for WorkflowType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Semantic Search" => WorkflowType::SemanticSearch,
            "Multimodal Search" => WorkflowType::MultimodalSearch,
            "Hybrid Search" => WorkflowType::HybridSearch,
            "Sentiment Analysis" => WorkflowType::SentimentAnalysis,
            "Retrieval-Augmented Generation" => WorkflowType::Rag,
            "Custom Search" => WorkflowType::Custom,
            _ => WorkflowType::Unknown(value),
        }
    }
}

impl From<WorkflowType> for String {
    fn from(value: WorkflowType) -> Self {
        match value {
            WorkflowType::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builder state attached to a workflow template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiMetadata {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub workflow_type: Option<WorkflowType>,

    #[serde(default)]
    pub config: WorkflowConfig,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub mod step_types {
    pub const CREATE_INGEST_PIPELINE: &str = "create_ingest_pipeline";
    pub const CREATE_SEARCH_PIPELINE: &str = "create_search_pipeline";
    pub const CREATE_INDEX: &str = "create_index";
}

pub mod resource_types {
    pub const PIPELINE_ID: &str = "Ingest pipeline";
    pub const INDEX_NAME: &str = "Index";
}

/// A resource created when the workflow was provisioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResource {
    pub id: String,
    pub step_type: String,
    #[serde(rename = "type")]
    pub resource_type: String,
}

/// A workflow template, optionally with backend-assigned state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "use_case", default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflows: Option<Value>,

    #[serde(rename = "ui_metadata", default, skip_serializing_if = "Option::is_none")]
    pub ui_metadata: Option<UiMetadata>,

    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,

    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_launched: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources_created: Option<Vec<WorkflowResource>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workflow {
    /// Parse a workflow from JSON or YAML text, requiring builder metadata
    pub fn from_str_checked(contents: &str) -> crate::Result<Self> {
        let obj = get_obj_from_json_or_yaml_string(contents).ok_or_else(|| {
            crate::Error::validation("workflow", "not valid JSON or YAML", Some("a JSON or YAML object"))
        })?;
        if !is_valid_workflow(&obj) {
            return Err(crate::Error::validation("name", "workflow has no name", Some("string")));
        }
        if !is_valid_ui_workflow(&obj) {
            return Err(crate::Error::validation(
                "ui_metadata",
                "workflow has no builder configuration",
                Some("ui_metadata.config and ui_metadata.type"),
            ));
        }
        serde_json::from_value(obj).map_err(|e| crate::Error::Configuration {
            message: format!("Invalid workflow: {}", e),
            source: Some(e.into()),
        })
    }

    pub fn workflow_type(&self) -> Option<&WorkflowType> {
        self.ui_metadata.as_ref()?.workflow_type.as_ref()
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated.and_then(from_epoch_millis)
    }

    pub fn last_launched_at(&self) -> Option<DateTime<Utc>> {
        self.last_launched.and_then(from_epoch_millis)
    }

    fn resources(&self) -> &[WorkflowResource] {
        self.resources_created.as_deref().unwrap_or_default()
    }
}

fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Parse text as JSON, falling back to YAML
pub fn get_obj_from_json_or_yaml_string(contents: &str) -> Option<Value> {
    if let Ok(obj) = serde_json::from_str::<Value>(contents) {
        return Some(obj);
    }
    serde_yaml::from_str::<Value>(contents).ok()
}

/// Only `name` is required by the workflow API
pub fn is_valid_workflow(obj: &Value) -> bool {
    obj.get("name").is_some_and(|name| !name.is_null())
}

pub fn is_valid_ui_workflow(obj: &Value) -> bool {
    let present = |key: &str| {
        obj.get("ui_metadata")
            .and_then(|meta| meta.get(key))
            .is_some_and(|v| !v.is_null())
    };
    is_valid_workflow(obj) && present("config") && present("type")
}

pub fn has_provisioned_ingest_resources(workflow: Option<&Workflow>) -> bool {
    workflow.is_some_and(|w| {
        w.resources().iter().any(|r| {
            r.step_type == step_types::CREATE_INGEST_PIPELINE || r.step_type == step_types::CREATE_INDEX
        })
    })
}

pub fn has_provisioned_search_resources(workflow: Option<&Workflow>) -> bool {
    workflow.is_some_and(|w| {
        w.resources()
            .iter()
            .any(|r| r.step_type == step_types::CREATE_SEARCH_PIPELINE)
    })
}

/// Comma-joined ids of the indices and ingest pipelines that need a forced delete
pub fn get_resources_to_be_force_deleted(workflow: Option<&Workflow>) -> Option<String> {
    let ids: Vec<&str> = workflow?
        .resources()
        .iter()
        .filter(|r| {
            r.resource_type == resource_types::INDEX_NAME || r.resource_type == resource_types::PIPELINE_ID
        })
        .map(|r| r.id.as_str())
        .collect();
    (!ids.is_empty()).then(|| ids.join(","))
}

/// Resource ids grouped by the step that created them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIds {
    pub index_ids: String,
    pub ingest_pipeline_ids: String,
    pub search_pipeline_ids: String,
}

pub fn extract_ids_by_step_type(resources: &[WorkflowResource]) -> ResourceIds {
    let mut index_ids = Vec::new();
    let mut ingest_pipeline_ids = Vec::new();
    let mut search_pipeline_ids = Vec::new();
    for resource in resources {
        match resource.step_type.as_str() {
            step_types::CREATE_INDEX => index_ids.push(resource.id.as_str()),
            step_types::CREATE_INGEST_PIPELINE => ingest_pipeline_ids.push(resource.id.as_str()),
            step_types::CREATE_SEARCH_PIPELINE => search_pipeline_ids.push(resource.id.as_str()),
            _ => {}
        }
    }
    ResourceIds {
        index_ids: index_ids.join(","),
        ingest_pipeline_ids: ingest_pipeline_ids.join(","),
        search_pipeline_ids: search_pipeline_ids.join(","),
    }
}

/// `some_config_id` becomes `Some Config Id`
pub fn camel_case_to_title_string(snake_case: &str) -> String {
    snake_case
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
