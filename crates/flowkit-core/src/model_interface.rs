//! Model interface parsing
//!
//! A model interface is a JSON-Schema document describing what a deployed
//! model accepts and returns. Parsing never fails: a model without an
//! interface, or with an unexpected shape, yields no fields.

use crate::constants::{
    MODEL_INPUT_SCHEMA_PATH, MODEL_OUTPUT_SCHEMA_FULL_PATH, MODEL_OUTPUT_SCHEMA_NESTED_PATH,
};
use crate::transform::dot_path;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One declared model input or output, keyed by its schema property name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelField {
    pub label: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Remaining schema keywords of the property
    #[serde(flatten)]
    pub schema: Map<String, Value>,
}

pub type ModelInputFormField = ModelField;
pub type ModelOutputFormField = ModelField;

impl ModelField {
    fn from_property(name: &str, property: &Value) -> Self {
        let mut schema = property.as_object().cloned().unwrap_or_default();
        let mut take_string = |key: &str| {
            if !matches!(schema.get(key), Some(Value::String(_))) {
                return None;
            }
            match schema.remove(key) {
                Some(Value::String(s)) => Some(s),
                _ => None,
            }
        };
        let label = take_string("label").unwrap_or_else(|| name.to_string());
        let field_type = take_string("type");
        let description = take_string("description");
        Self {
            label,
            field_type,
            description,
            schema,
        }
    }
}

fn object_at(model_interface: Option<&Value>, path: &str) -> Map<String, Value> {
    model_interface
        .and_then(|iface| dot_path::get(iface, path))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

fn output_path(full_response_path: bool) -> &'static str {
    if full_response_path {
        MODEL_OUTPUT_SCHEMA_FULL_PATH
    } else {
        MODEL_OUTPUT_SCHEMA_NESTED_PATH
    }
}

fn to_fields(properties: &Map<String, Value>) -> Vec<ModelField> {
    properties
        .iter()
        .map(|(name, property)| ModelField::from_property(name, property))
        .collect()
}

/// Declared inputs, keyed by name
///
/// Inputs always sit under the `parameters` object of the input schema.
pub fn parse_model_inputs_obj(model_interface: Option<&Value>) -> Map<String, Value> {
    object_at(model_interface, MODEL_INPUT_SCHEMA_PATH)
}

/// Declared inputs as form fields, in schema order
pub fn parse_model_inputs(model_interface: Option<&Value>) -> Vec<ModelInputFormField> {
    to_fields(&parse_model_inputs_obj(model_interface))
}

/// Declared outputs, keyed by name
pub fn parse_model_outputs_obj(
    model_interface: Option<&Value>,
    full_response_path: bool,
) -> Map<String, Value> {
    object_at(model_interface, output_path(full_response_path))
}

/// Declared outputs as form fields
///
/// `full_response_path` reads the top-level output schema instead of the
/// one nested under the inference results wrapper.
pub fn parse_model_outputs(
    model_interface: Option<&Value>,
    full_response_path: bool,
) -> Vec<ModelOutputFormField> {
    to_fields(&parse_model_outputs_obj(model_interface, full_response_path))
}
