//! Quick configure: prefill a workflow template from a few declared field names
//!
//! Given the model id and the names of the text, image, vector and label
//! fields, the template's ML processors get their model and input/output
//! maps filled in, the index mappings gain the declared fields, and the
//! search request template has its field placeholders substituted.

use crate::config::{ProcessorConfig, ProcessorType, WorkflowConfig};
use crate::constants::{
    field_ids, CLAUDE_SUMMARIZE_PROMPT, DEFAULT_PROMPT_RESULTS_FIELD, IMAGE_FIELD_PATTERN,
    LABEL_FIELD_PATTERN, MODEL_ID_PATTERN, TEXT_FIELD_PATTERN, VECTOR, VECTOR_FIELD_PATTERN,
};
use crate::model_interface::{parse_model_inputs, parse_model_outputs};
use crate::types::{MapEntryValue, MappingEntry, NestedVar, QuickConfigureFields};
use crate::workflow::{Workflow, WorkflowType};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// Apply quick-configure fields to a workflow's builder configuration
///
/// Returns the workflow unchanged when no fields were declared or the
/// workflow has no builder metadata.
pub fn inject_quick_configure_fields(
    workflow: &Workflow,
    fields: &QuickConfigureFields,
    model_interface: Option<&Value>,
) -> Workflow {
    let mut updated = workflow.clone();
    if fields.is_empty() {
        return updated;
    }
    if let Some(metadata) = updated.ui_metadata.as_mut() {
        if let Some(workflow_type) = metadata.workflow_type.clone() {
            metadata.config =
                inject_into_config(&metadata.config, &workflow_type, fields, model_interface);
        }
    }
    updated
}

/// Apply quick-configure fields to a single configuration tree
pub fn inject_into_config(
    config: &WorkflowConfig,
    workflow_type: &WorkflowType,
    fields: &QuickConfigureFields,
    model_interface: Option<&Value>,
) -> WorkflowConfig {
    let mut config = config.clone();
    if fields.is_empty() {
        return config;
    }
    debug!(workflow_type = %workflow_type, "Applying quick configure fields");

    match workflow_type {
        WorkflowType::SemanticSearch | WorkflowType::MultimodalSearch | WorkflowType::HybridSearch => {
            let is_vector = workflow_type.is_vector_search();
            update_ingest_processors(&mut config, fields, model_interface, is_vector);
            update_index_config(&mut config, fields);
            if let Some(request) = config.search.request.as_mut() {
                if let Some(injected) = inject_into_string_value(request.value.as_ref(), fields) {
                    request.value = Some(injected);
                }
            }
            update_search_request_processors(&mut config, fields, model_interface, is_vector);
        }
        WorkflowType::Rag => {
            update_index_config(&mut config, fields);
            update_rag_search_response_processors(&mut config, fields, model_interface);
        }
        WorkflowType::SentimentAnalysis | WorkflowType::Custom | WorkflowType::Unknown(_) => {}
    }
    config
}

/// Substitute the field placeholders for every declared field
pub fn inject_placeholder_values(request: &str, fields: &QuickConfigureFields) -> String {
    let substitutions = [
        (MODEL_ID_PATTERN, fields.model_id()),
        (TEXT_FIELD_PATTERN, fields.text_field()),
        (VECTOR_FIELD_PATTERN, fields.vector_field()),
        (IMAGE_FIELD_PATTERN, fields.image_field()),
        (LABEL_FIELD_PATTERN, fields.label_field()),
    ];
    substitutions
        .into_iter()
        .fold(request.to_string(), |acc, (pattern, value)| match value {
            Some(value) => acc.replace(pattern, value),
            None => acc,
        })
}

/// Placeholder injection for a config value that is a string or not set yet
fn inject_into_string_value(value: Option<&Value>, fields: &QuickConfigureFields) -> Option<Value> {
    let current = match value {
        None => "",
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return None,
    };
    Some(Value::String(inject_placeholder_values(current, fields)))
}

/// One empty entry per declared model input
pub fn generate_input_map_from_model_inputs(model_interface: Option<&Value>) -> Vec<MappingEntry> {
    parse_model_inputs(model_interface)
        .into_iter()
        .map(|input| MappingEntry::new(input.label, MapEntryValue::default()))
        .collect()
}

/// One empty entry per declared model output
pub fn generate_output_map_from_model_outputs(model_interface: Option<&Value>) -> Vec<MappingEntry> {
    parse_model_outputs(model_interface, false)
        .into_iter()
        .map(|output| MappingEntry::new(output.label, MapEntryValue::default()))
        .collect()
}

/// Overwrite the value at `index`, or append a keyless entry if the map is shorter
fn set_or_push(map: &mut Vec<MappingEntry>, index: usize, value: MapEntryValue) {
    match map.get_mut(index) {
        Some(entry) => entry.value = value,
        None => map.push(MappingEntry::new("", value)),
    }
}

/// Maps are stored as a list holding one list of entries
fn map_field_value(map: &[MappingEntry]) -> Value {
    json!([map])
}

fn set_model(processor: &mut ProcessorConfig, fields: &QuickConfigureFields) {
    if let Some(model_id) = fields.model_id() {
        if let Some(field) = processor.field_mut(field_ids::MODEL) {
            field.value = Some(json!({ "id": model_id }));
        }
    }
}

fn set_map(processor: &mut ProcessorConfig, id: &str, map: &[MappingEntry]) {
    if let Some(field) = processor.field_mut(id) {
        field.value = Some(map_field_value(map));
    }
}

fn ml_processors(processors: &mut [ProcessorConfig]) -> impl Iterator<Item = &mut ProcessorConfig> {
    processors
        .iter_mut()
        .filter(|p| p.processor_type == ProcessorType::Ml)
}

fn update_ingest_processors(
    config: &mut WorkflowConfig,
    fields: &QuickConfigureFields,
    model_interface: Option<&Value>,
    is_vector: bool,
) {
    for processor in ml_processors(&mut config.ingest.enrich.processors) {
        set_model(processor, fields);

        let mut input_map = generate_input_map_from_model_inputs(model_interface);
        if let Some(text_field) = fields.text_field() {
            set_or_push(&mut input_map, 0, MapEntryValue::field(text_field));
        }
        if let Some(image_field) = fields.image_field() {
            set_or_push(&mut input_map, 1, MapEntryValue::field(image_field));
        }
        set_map(processor, field_ids::INPUT_MAP, &input_map);

        let mut output_map = generate_output_map_from_model_outputs(model_interface);
        let default_field = if is_vector {
            fields.vector_field()
        } else {
            fields.label_field()
        };
        if let Some(default_field) = default_field {
            set_or_push(&mut output_map, 0, MapEntryValue::field(default_field));
        }
        set_map(processor, field_ids::OUTPUT_MAP, &output_map);
    }
}

/// First leaf of the request, as a dot-joined path (array items by index)
fn first_flattened_key(value: &Value, prefix: &str) -> Option<String> {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };
    match value {
        Value::Null => None,
        Value::Object(map) => map.iter().find_map(|(k, v)| first_flattened_key(v, &join(k))),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, v)| first_flattened_key(v, &join(&i.to_string()))),
        _ => Some(prefix.to_string()),
    }
}

fn default_query_value(config: &WorkflowConfig) -> String {
    config
        .search
        .request
        .as_ref()
        .and_then(|request| request.value_str())
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
        .filter(|parsed| parsed.is_object() || parsed.is_array())
        .and_then(|parsed| first_flattened_key(&parsed, ""))
        .unwrap_or_default()
}

fn update_search_request_processors(
    config: &mut WorkflowConfig,
    fields: &QuickConfigureFields,
    model_interface: Option<&Value>,
    is_vector: bool,
) {
    let query_value = default_query_value(config);
    let processors = &mut config.search.enrich_request.processors;
    let mut any_ml = false;
    for processor in ml_processors(processors) {
        any_ml = true;
        set_model(processor, fields);

        let mut input_map = generate_input_map_from_model_inputs(model_interface);
        set_or_push(&mut input_map, 0, MapEntryValue::field(query_value.as_str()));
        set_map(processor, field_ids::INPUT_MAP, &input_map);

        let mut output_map = generate_output_map_from_model_outputs(model_interface);
        let output_value = if is_vector { VECTOR } else { query_value.as_str() };
        set_or_push(&mut output_map, 0, MapEntryValue::field(output_value));
        set_map(processor, field_ids::OUTPUT_MAP, &output_map);
    }

    // The query template lives on the first request processor only
    if !any_ml {
        return;
    }
    if let Some(template) = processors
        .first_mut()
        .and_then(|first| first.optional_field_mut(field_ids::QUERY_TEMPLATE))
    {
        if let Some(injected) = inject_into_string_value(template.value.as_ref(), fields) {
            template.value = Some(injected);
        }
    }
}

fn update_rag_search_response_processors(
    config: &mut WorkflowConfig,
    fields: &QuickConfigureFields,
    model_interface: Option<&Value>,
) {
    for processor in config.search.enrich_response.processors.iter_mut() {
        match processor.processor_type {
            ProcessorType::Ml => {
                set_model(processor, fields);

                let mut input_map = generate_input_map_from_model_inputs(model_interface);
                if let (Some(_), Some(text_field)) = (fields.prompt_field(), fields.text_field()) {
                    match input_map.first_mut() {
                        Some(entry) => {
                            entry.value = MapEntryValue::template(
                                CLAUDE_SUMMARIZE_PROMPT,
                                vec![NestedVar {
                                    name: DEFAULT_PROMPT_RESULTS_FIELD.to_string(),
                                    transform: text_field.to_string(),
                                }],
                            )
                        }
                        None => input_map.push(MappingEntry::new("", MapEntryValue::field(""))),
                    }
                }
                set_map(processor, field_ids::INPUT_MAP, &input_map);

                let mut output_map = generate_output_map_from_model_outputs(model_interface);
                if let Some(response_field) = fields.llm_response_field() {
                    set_or_push(&mut output_map, 0, MapEntryValue::field(response_field));
                }
                set_map(processor, field_ids::OUTPUT_MAP, &output_map);
            }
            ProcessorType::Collapse => {
                if let Some(response_field) = fields.llm_response_field() {
                    if let Some(field) = processor.field_mut(field_ids::COLLAPSE_FIELD) {
                        field.value = Some(Value::String(response_field.to_string()));
                    }
                }
            }
            _ => {}
        }
    }
}

fn update_index_config(config: &mut WorkflowConfig, fields: &QuickConfigureFields) {
    let declared = [
        fields.text_field(),
        fields.image_field(),
        fields.vector_field(),
        fields.label_field(),
    ];
    if declared.iter().all(Option::is_none) {
        return;
    }
    let Some(mappings) = config.ingest.index.mappings.as_mut() else {
        debug!("Workflow has no index mappings field; skipping index config");
        return;
    };

    let mut existing = match mappings.value_str().map(serde_json::from_str::<Value>) {
        Some(Ok(Value::Object(obj))) => obj,
        Some(Err(e)) => {
            warn!(error = %e, "Index mappings are not valid JSON; starting from empty mappings");
            Map::new()
        }
        Some(Ok(_)) | None => Map::new(),
    };
    let mut properties = existing
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    if let Some(text_field) = fields.text_field() {
        properties.insert(text_field.to_string(), json!({ "type": "text" }));
    }
    if let Some(image_field) = fields.image_field() {
        properties.insert(image_field.to_string(), json!({ "type": "binary" }));
    }
    if let Some(vector_field) = fields.vector_field() {
        let dimension = match fields.embedding_length {
            Some(length) if length > 0 => json!(length),
            _ => json!(""),
        };
        properties.insert(
            vector_field.to_string(),
            json!({ "type": "knn_vector", "dimension": dimension }),
        );
    }
    if let Some(label_field) = fields.label_field() {
        properties.insert(label_field.to_string(), json!({ "type": "text" }));
    }

    existing.insert("properties".to_string(), Value::Object(properties));
    match serde_json::to_string_pretty(&Value::Object(existing)) {
        Ok(rendered) => mappings.value = Some(Value::String(rendered)),
        Err(e) => warn!(error = %e, "Failed to render index mappings"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields() -> QuickConfigureFields {
        QuickConfigureFields {
            model_id: Some("m1".to_string()),
            text_field: Some("body".to_string()),
            vector_field: Some("vec".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_placeholder_injection_only_for_declared_fields() {
        let request = r#"{"query": {"neural": {"{{vector_field}}": {"query_text": "{{text_field}}", "model_id": "{{model_id}}"}}}, "label": "{{label_field}}"}"#;
        let injected = inject_placeholder_values(request, &fields());
        assert_eq!(
            injected,
            r#"{"query": {"neural": {"vec": {"query_text": "body", "model_id": "m1"}}}, "label": "{{label_field}}"}"#
        );
    }

    #[test]
    fn test_set_or_push() {
        let mut map = vec![MappingEntry::new("texts", MapEntryValue::default())];
        set_or_push(&mut map, 0, MapEntryValue::field("body"));
        set_or_push(&mut map, 1, MapEntryValue::field("image"));
        assert_eq!(
            map,
            vec![
                MappingEntry::new("texts", MapEntryValue::field("body")),
                MappingEntry::new("", MapEntryValue::field("image")),
            ]
        );
    }

    #[test]
    fn test_first_flattened_key() {
        let request = json!({"query": {"match": {"title": {"query": "x"}}}, "size": 5});
        assert_eq!(first_flattened_key(&request, ""), Some("query.match.title.query".to_string()));
        let request = json!({"empty": {}, "nullish": null, "items": [{"a": 1}]});
        assert_eq!(first_flattened_key(&request, ""), Some("items.0.a".to_string()));
        assert_eq!(first_flattened_key(&json!({}), ""), None);
    }

    #[test]
    fn test_default_query_value_tolerates_bad_request() {
        let mut config = WorkflowConfig::default();
        assert_eq!(default_query_value(&config), "");
        config.search.request = serde_json::from_value(json!({"id": "request", "type": "json", "value": "{oops"})).unwrap();
        assert_eq!(default_query_value(&config), "");
        config.search.request = serde_json::from_value(json!({"id": "request", "type": "json", "value": "7"})).unwrap();
        assert_eq!(default_query_value(&config), "");
    }

    #[test]
    fn test_index_config_merges_properties() {
        let mut config: WorkflowConfig = serde_json::from_value(json!({
            "ingest": {"index": {"mappings": {
                "id": "indexMappings",
                "type": "json",
                "value": "{\"settings\": {\"knn\": true}, \"properties\": {\"existing\": {\"type\": \"keyword\"}}}"
            }}}
        }))
        .unwrap();
        update_index_config(&mut config, &fields());

        let rendered = config.ingest.index.mappings.as_ref().and_then(|m| m.value_str()).unwrap();
        let parsed: Value = serde_json::from_str(rendered).unwrap();
        assert_eq!(
            parsed,
            json!({
                "settings": {"knn": true},
                "properties": {
                    "existing": {"type": "keyword"},
                    "body": {"type": "text"},
                    "vec": {"type": "knn_vector", "dimension": ""}
                }
            })
        );
        assert!(rendered.contains("\n  \"settings\""));
    }

    #[test]
    fn test_index_config_recovers_from_invalid_json() {
        let mut config: WorkflowConfig = serde_json::from_value(json!({
            "ingest": {"index": {"mappings": {"id": "indexMappings", "type": "json", "value": "not json"}}}
        }))
        .unwrap();
        let fields = QuickConfigureFields {
            image_field: Some("photo".to_string()),
            embedding_length: Some(512),
            vector_field: Some("vec".to_string()),
            ..Default::default()
        };
        update_index_config(&mut config, &fields);
        let rendered = config.ingest.index.mappings.as_ref().and_then(|m| m.value_str()).unwrap();
        let parsed: Value = serde_json::from_str(rendered).unwrap();
        assert_eq!(
            parsed,
            json!({"properties": {
                "photo": {"type": "binary"},
                "vec": {"type": "knn_vector", "dimension": 512}
            }})
        );
    }

    #[test]
    fn test_index_config_untouched_without_field_names() {
        let original: WorkflowConfig = serde_json::from_value(json!({
            "ingest": {"index": {"mappings": {"id": "indexMappings", "type": "json", "value": "{}"}}}
        }))
        .unwrap();
        let mut config = original.clone();
        let fields = QuickConfigureFields {
            model_id: Some("m1".to_string()),
            ..Default::default()
        };
        update_index_config(&mut config, &fields);
        assert_eq!(config, original);
    }

    #[test]
    fn test_rag_without_model_inputs_pushes_empty_entry() {
        let mut config: WorkflowConfig = serde_json::from_value(json!({
            "search": {"enrichResponse": {"processors": [{
                "id": "ml_processor_1",
                "name": "ML Processor",
                "type": "ml_processor",
                "fields": [
                    {"id": "model", "type": "model"},
                    {"id": "input_map", "type": "mapArray"},
                    {"id": "output_map", "type": "mapArray"}
                ]
            }]}}
        }))
        .unwrap();
        let fields = QuickConfigureFields {
            prompt_field: Some("prompt".to_string()),
            text_field: Some("body".to_string()),
            ..Default::default()
        };
        update_rag_search_response_processors(&mut config, &fields, None);
        let processor = &config.search.enrich_response.processors[0];
        assert_eq!(
            processor.field(field_ids::INPUT_MAP).and_then(|f| f.value.clone()),
            Some(json!([[{"key": "", "value": {"transformType": "Field", "value": ""}}]]))
        );
        assert_eq!(
            processor.field(field_ids::OUTPUT_MAP).and_then(|f| f.value.clone()),
            Some(json!([[]]))
        );
        assert!(processor.field(field_ids::MODEL).and_then(|f| f.value.clone()).is_none());
    }
}
