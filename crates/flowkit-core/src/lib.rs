//! Flowkit Core - workflow configuration and transform-preview engine
//!
//! This crate holds the pure logic behind a search-pipeline workflow builder:
//! evaluating field-mapping expressions against sample data, reading model
//! interfaces into form fields, prefilling workflow templates, and filling
//! query placeholders. Nothing here performs I/O; callers pass data in and
//! get plain JSON back.
//!
//! # Main Components
//!
//! - **Path resolution**: dot-notation and JSONPath expressions, with
//!   definite/indefinite result shaping ([`transform::PathResolver`])
//! - **Transform preview**: input/output maps applied to documents and
//!   document lists ([`transform_object`], [`transform_array`])
//! - **Model interfaces**: JSON-Schema inputs and outputs as form fields
//! - **Quick configure**: template prefilling from declared field names
//! - **Placeholders**: `{{name}}` extraction and interpolation
//!
//! # Example
//!
//! ```
//! use flowkit_core::{transform_object, MapEntryValue, MappingEntry, ProcessorContext, TransformContext};
//! use serde_json::json;
//!
//! let doc = json!({"passage": {"text": "hello"}});
//! let map = vec![MappingEntry::new("texts", MapEntryValue::field("passage.text"))];
//! let out = transform_object(&doc, &map, ProcessorContext::Ingest, TransformContext::Input, None);
//! assert_eq!(out, json!({"texts": "hello"}));
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod jsonpath;
pub mod model_interface;
pub mod placeholders;
pub mod quick_configure;
pub mod simulate;
pub mod transform;
pub mod types;
pub mod workflow;

pub use error::{Error, Result};
pub use types::{
    MapEntryValue, MapFormValue, MappingEntry, NestedVar, ProcessorContext, QueryParam,
    QuickConfigureFields, TransformContext, TransformType,
};

pub use config::{ConfigField, ProcessorConfig, ProcessorType, WorkflowConfig};
pub use model_interface::{
    parse_model_inputs, parse_model_inputs_obj, parse_model_outputs, parse_model_outputs_obj,
    ModelField,
};
pub use placeholders::{contains_empty_values, extract_placeholders, interpolate, same_names};
pub use quick_configure::{inject_into_config, inject_quick_configure_fields};
pub use simulate::{
    prepare_docs_for_simulate, unwrap_transformed_docs, SimulateIngestPipelineResponse,
    TransformedDocs,
};
pub use transform::{
    sanitize_json_path, transform_array, transform_object, EvaluationRoot, PathClassifier,
    PathResolver, PatternClassifier,
};
pub use workflow::{Workflow, WorkflowResource, WorkflowType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve one mapping expression with the default classifier
///
/// Returns `None` when nothing matched or the expression could not be
/// evaluated.
pub fn resolve(
    root: &serde_json::Value,
    path: &str,
    context: ProcessorContext,
    transform_context: TransformContext,
    query: Option<&serde_json::Value>,
) -> Option<serde_json::Value> {
    PathResolver::new()
        .resolve(root, path, context, transform_context, query)
        .unwrap_or_else(|e| {
            tracing::debug!(path, error = %e, "Path could not be resolved");
            None
        })
}
