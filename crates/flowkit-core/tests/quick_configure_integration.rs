//! Quick configure applied to whole workflow templates

mod test_support;

use flowkit_core::{inject_quick_configure_fields, QuickConfigureFields, Workflow};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_support::{
    embedding_model_interface, multimodal_model_interface, processor_field, workflow, workflow_json,
};

fn applied(workflow: &Workflow, fields: &QuickConfigureFields, model_interface: Option<&Value>) -> Value {
    serde_json::to_value(inject_quick_configure_fields(workflow, fields, model_interface)).unwrap()
}

fn index_properties(workflow: &Value) -> Value {
    let raw = workflow["ui_metadata"]["config"]["ingest"]["index"]["mappings"]["value"]
        .as_str()
        .unwrap();
    serde_json::from_str::<Value>(raw).unwrap()["properties"].clone()
}

fn semantic_fields() -> QuickConfigureFields {
    QuickConfigureFields {
        model_id: Some("m1".to_string()),
        text_field: Some("body".to_string()),
        vector_field: Some("vec".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_empty_fields_leave_workflow_unchanged() {
    for workflow_type in ["Semantic Search", "Retrieval-Augmented Generation", "Custom Search"] {
        let original = workflow(workflow_type);
        let result = inject_quick_configure_fields(&original, &QuickConfigureFields::default(), None);
        assert_eq!(result, original);
    }
}

#[test]
fn test_custom_workflow_is_not_touched() {
    let original = workflow("Custom Search");
    let result = inject_quick_configure_fields(&original, &semantic_fields(), Some(&embedding_model_interface()));
    assert_eq!(result, original);
}

#[test]
fn test_semantic_search_ingest_processor() {
    let iface = embedding_model_interface();
    let result = applied(&workflow("Semantic Search"), &semantic_fields(), Some(&iface));

    assert_eq!(processor_field(&result, "ingest", 0, "model"), Some(&json!({"id": "m1"})));
    assert_eq!(
        processor_field(&result, "ingest", 0, "input_map"),
        Some(&json!([[{"key": "text", "value": {"transformType": "Field", "value": "body"}}]]))
    );
    assert_eq!(
        processor_field(&result, "ingest", 0, "output_map"),
        Some(&json!([[{"key": "embedding", "value": {"transformType": "Field", "value": "vec"}}]]))
    );
}

#[test]
fn test_semantic_search_index_mappings() {
    let result = applied(&workflow("Semantic Search"), &semantic_fields(), Some(&embedding_model_interface()));
    assert_eq!(
        index_properties(&result),
        json!({
            "id": {"type": "keyword"},
            "body": {"type": "text"},
            "vec": {"type": "knn_vector", "dimension": ""}
        })
    );
}

#[test]
fn test_semantic_search_request_side() {
    let result = applied(&workflow("Semantic Search"), &semantic_fields(), Some(&embedding_model_interface()));

    assert_eq!(
        result["ui_metadata"]["config"]["search"]["request"]["value"],
        json!("{\"query\": {\"match\": {\"body\": \"{{query_text}}\"}}}")
    );
    assert_eq!(
        processor_field(&result, "request", 0, "input_map"),
        Some(&json!([[{"key": "text", "value": {"transformType": "Field", "value": "query.match.body"}}]]))
    );
    assert_eq!(
        processor_field(&result, "request", 0, "output_map"),
        Some(&json!([[{"key": "embedding", "value": {"transformType": "Field", "value": "vector"}}]]))
    );
    let template = &result["ui_metadata"]["config"]["search"]["enrichRequest"]["processors"][0]
        ["optionalFields"][0]["value"];
    assert_eq!(
        template,
        &json!("{\"query\": {\"knn\": {\"vec\": {\"vector\": \"${vector}\"}}}}")
    );
}

#[test]
fn test_without_model_interface_entries_are_appended() {
    let result = applied(&workflow("Semantic Search"), &semantic_fields(), None);
    assert_eq!(
        processor_field(&result, "ingest", 0, "input_map"),
        Some(&json!([[{"key": "", "value": {"transformType": "Field", "value": "body"}}]]))
    );
    assert_eq!(
        processor_field(&result, "ingest", 0, "output_map"),
        Some(&json!([[{"key": "", "value": {"transformType": "Field", "value": "vec"}}]]))
    );
}

#[test]
fn test_multimodal_text_and_image_inputs() {
    let fields = QuickConfigureFields {
        text_field: Some("caption".to_string()),
        image_field: Some("photo".to_string()),
        vector_field: Some("vec".to_string()),
        embedding_length: Some(1024),
        ..Default::default()
    };
    let result = applied(&workflow("Multimodal Search"), &fields, Some(&multimodal_model_interface()));
    assert_eq!(
        processor_field(&result, "ingest", 0, "input_map"),
        Some(&json!([[
            {"key": "inputText", "value": {"transformType": "Field", "value": "caption"}},
            {"key": "inputImage", "value": {"transformType": "Field", "value": "photo"}}
        ]]))
    );
    // No model id declared, so the model field keeps its template value.
    assert_eq!(processor_field(&result, "ingest", 0, "model"), None);
    assert_eq!(
        index_properties(&result)["vec"],
        json!({"type": "knn_vector", "dimension": 1024})
    );
    assert_eq!(index_properties(&result)["photo"], json!({"type": "binary"}));
}

#[test]
fn test_sentiment_analysis_is_not_touched() {
    let fields = QuickConfigureFields {
        text_field: Some("review".to_string()),
        label_field: Some("sentiment".to_string()),
        ..Default::default()
    };
    let original = workflow("Sentiment Analysis");
    let result = inject_quick_configure_fields(&original, &fields, Some(&embedding_model_interface()));
    assert_eq!(result, original);
}

#[test]
fn test_query_template_filled_on_first_request_processor_only() {
    let mut template = workflow_json("Semantic Search");
    let processors = &mut template["ui_metadata"]["config"]["search"]["enrichRequest"]["processors"];
    let second = processors[0].clone();
    processors.as_array_mut().unwrap().push(second);
    let template: Workflow = serde_json::from_value(template).unwrap();

    let result = applied(&template, &semantic_fields(), Some(&embedding_model_interface()));
    let processors = &result["ui_metadata"]["config"]["search"]["enrichRequest"]["processors"];
    assert_eq!(
        processors[0]["optionalFields"][0]["value"],
        json!("{\"query\": {\"knn\": {\"vec\": {\"vector\": \"${vector}\"}}}}")
    );
    assert_eq!(
        processors[1]["optionalFields"][0]["value"],
        json!("{\"query\": {\"knn\": {\"{{vector_field}}\": {\"vector\": \"${vector}\"}}}}")
    );
    // Both processors still get their model and maps.
    assert_eq!(processor_field(&result, "request", 1, "model"), Some(&json!({"id": "m1"})));
    assert_eq!(
        processor_field(&result, "request", 1, "output_map"),
        Some(&json!([[{"key": "embedding", "value": {"transformType": "Field", "value": "vector"}}]]))
    );
}

#[test]
fn test_rag_response_processors() {
    let iface = json!({
        "input": {"properties": {"parameters": {"properties": {
            "prompt": {"type": "string"}, "context": {"type": "string"}
        }}}},
        "output": {"properties": {"inference_results": {"items": {"properties": {
            "output": {"items": {"properties": {"dataAsMap": {"properties": {
                "response": {"type": "string"}
            }}}}}
        }}}}}
    });
    let fields = QuickConfigureFields {
        model_id: Some("llm".to_string()),
        text_field: Some("body".to_string()),
        prompt_field: Some("prompt".to_string()),
        llm_response_field: Some("summary".to_string()),
        ..Default::default()
    };
    let result = applied(&workflow("Retrieval-Augmented Generation"), &fields, Some(&iface));

    let input_map = processor_field(&result, "response", 0, "input_map").unwrap();
    assert_eq!(input_map[0][0]["key"], json!("prompt"));
    assert_eq!(input_map[0][0]["value"]["transformType"], json!("Template"));
    assert!(input_map[0][0]["value"]["value"]
        .as_str()
        .unwrap()
        .contains("${parameters.results.toString()}"));
    assert_eq!(
        input_map[0][0]["value"]["nestedVars"],
        json!([{"name": "results", "transform": "body"}])
    );
    assert_eq!(input_map[0][1], json!({"key": "context", "value": {"transformType": "", "value": ""}}));

    assert_eq!(
        processor_field(&result, "response", 0, "output_map"),
        Some(&json!([[{"key": "response", "value": {"transformType": "Field", "value": "summary"}}]]))
    );
    assert_eq!(processor_field(&result, "response", 1, "field"), Some(&json!("summary")));
    assert_eq!(index_properties(&result)["body"], json!({"type": "text"}));

    // Ingest processors are left alone for RAG.
    assert_eq!(processor_field(&result, "ingest", 0, "input_map"), None);
}

#[test]
fn test_unrelated_template_fields_survive() {
    let result = applied(&workflow("Hybrid Search"), &semantic_fields(), Some(&embedding_model_interface()));
    assert_eq!(result["version"], json!({"template": "1.0.0", "compatibility": ["2.17.0", "3.0.0"]}));
    assert_eq!(result["ui_metadata"]["config"]["ingest"]["enabled"]["value"], json!(true));
    assert_eq!(
        result["ui_metadata"]["config"]["ingest"]["index"]["name"]["value"],
        json!("my-index")
    );
}
