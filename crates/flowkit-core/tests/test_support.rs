//! Shared fixtures for integration tests

#![allow(dead_code)]

use flowkit_core::{MapEntryValue, MappingEntry, Workflow};
use serde_json::{json, Value};

/// Field mapping entry
pub fn field(key: &str, path: &str) -> MappingEntry {
    MappingEntry::new(key, MapEntryValue::field(path))
}

/// Interface of a text embedding model: one text input, one embedding output
pub fn embedding_model_interface() -> Value {
    json!({
        "input": {"properties": {"parameters": {"properties": {
            "text": {"type": "string"}
        }}}},
        "output": {"properties": {"inference_results": {"items": {"properties": {
            "output": {"items": {"properties": {"dataAsMap": {"properties": {
                "embedding": {"type": "array", "items": {"type": "number"}}
            }}}}}
        }}}}}
    })
}

/// Interface of a multimodal model: text and image inputs
pub fn multimodal_model_interface() -> Value {
    json!({
        "input": {"properties": {"parameters": {"properties": {
            "inputText": {"type": "string"},
            "inputImage": {"type": "string"}
        }}}},
        "output": {"properties": {"inference_results": {"items": {"properties": {
            "output": {"items": {"properties": {"dataAsMap": {"properties": {
                "embedding": {"type": "array"}
            }}}}}
        }}}}}
    })
}

fn ml_processor(id: &str, with_query_template: bool) -> Value {
    let mut processor = json!({
        "id": id,
        "name": "ML Inference Processor",
        "type": "ml_processor",
        "fields": [
            {"label": "Model", "id": "model", "type": "model"},
            {"label": "Input Map", "id": "input_map", "type": "mapArray"},
            {"label": "Output Map", "id": "output_map", "type": "mapArray"}
        ]
    });
    if with_query_template {
        processor["optionalFields"] = json!([
            {"label": "Query Template", "id": "query_template", "type": "jsonString",
             "value": "{\"query\": {\"knn\": {\"{{vector_field}}\": {\"vector\": \"${vector}\"}}}}"}
        ]);
    }
    processor
}

fn config(ingest_processors: Vec<Value>, request_processors: Vec<Value>, response_processors: Vec<Value>) -> Value {
    json!({
        "ingest": {
            "enabled": {"id": "enabled", "type": "boolean", "value": true},
            "enrich": {"processors": ingest_processors},
            "index": {
                "name": {"id": "indexName", "type": "string", "value": "my-index"},
                "mappings": {"id": "indexMappings", "type": "json",
                             "value": "{\"properties\": {\"id\": {\"type\": \"keyword\"}}}"}
            }
        },
        "search": {
            "request": {"id": "request", "type": "json",
                        "value": "{\"query\": {\"match\": {\"{{text_field}}\": \"{{query_text}}\"}}}"},
            "enrichRequest": {"processors": request_processors},
            "enrichResponse": {"processors": response_processors}
        }
    })
}

/// A workflow template of the given use case as stored by the builder
pub fn workflow_json(workflow_type: &str) -> Value {
    let search_processors = match workflow_type {
        "Retrieval-Augmented Generation" => (
            Vec::new(),
            vec![
                ml_processor("ml_processor_response", false),
                json!({
                    "id": "collapse_processor",
                    "name": "Collapse Processor",
                    "type": "collapse_processor",
                    "fields": [{"label": "Field", "id": "field", "type": "string"}]
                }),
            ],
        ),
        _ => (vec![ml_processor("ml_processor_request", true)], Vec::new()),
    };
    json!({
        "name": "test-workflow",
        "description": "fixture",
        "use_case": "CUSTOM",
        "version": {"template": "1.0.0", "compatibility": ["2.17.0", "3.0.0"]},
        "workflows": {},
        "ui_metadata": {
            "type": workflow_type,
            "config": config(
                vec![ml_processor("ml_processor_ingest", false)],
                search_processors.0,
                search_processors.1,
            )
        }
    })
}

pub fn workflow(workflow_type: &str) -> Workflow {
    serde_json::from_value(workflow_json(workflow_type)).expect("fixture workflow parses")
}

/// Value of a processor field within an already-serialized workflow
pub fn processor_field<'a>(workflow: &'a Value, stage: &str, index: usize, id: &str) -> Option<&'a Value> {
    let processors = match stage {
        "ingest" => &workflow["ui_metadata"]["config"]["ingest"]["enrich"]["processors"],
        "request" => &workflow["ui_metadata"]["config"]["search"]["enrichRequest"]["processors"],
        _ => &workflow["ui_metadata"]["config"]["search"]["enrichResponse"]["processors"],
    };
    processors[index]["fields"]
        .as_array()?
        .iter()
        .find(|f| f["id"] == id)?
        .get("value")
}

/// Search hits as returned to a response processor
pub fn search_hits() -> Value {
    json!({
        "hits": {
            "total": {"value": 2},
            "hits": [
                {"_id": "1", "_source": {"title": "Moby Dick", "body": "Call me Ishmael.", "year": 1851}},
                {"_id": "2", "_source": {"title": "Ulysses", "body": "Stately, plump Buck Mulligan.", "year": 1922}}
            ]
        }
    })
}
