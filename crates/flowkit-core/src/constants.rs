//! Fixed tokens of the mapping language and workflow templates

/// JSONPath root selector; paths starting with it are never dot-notation
pub const JSONPATH_ROOT_SELECTOR: &str = "$";

/// Marks a path that targets the original search request instead of the document
pub const REQUEST_PREFIX: &str = "_request.";

/// [`REQUEST_PREFIX`] written as an explicit JSONPath
pub const REQUEST_PREFIX_WITH_JSONPATH_ROOT_SELECTOR: &str = "$._request.";

/// Whole-value reference in dot-notation
pub const WHOLE_VALUE_PATH: &str = ".";

/// Schema location of a model's declared inputs
pub const MODEL_INPUT_SCHEMA_PATH: &str = "input.properties.parameters.properties";

/// Schema location of a model's outputs when the full response is exposed
pub const MODEL_OUTPUT_SCHEMA_FULL_PATH: &str = "output.properties";

/// Schema location of a model's outputs nested under the inference results wrapper
pub const MODEL_OUTPUT_SCHEMA_NESTED_PATH: &str =
    "output.properties.inference_results.items.properties.output.items.properties.dataAsMap.properties";

/// Output field a search-request model writes its embedding into
pub const VECTOR: &str = "vector";

/// Nested variable name carrying retrieved documents into the RAG prompt
pub const DEFAULT_PROMPT_RESULTS_FIELD: &str = "results";

/// Prompt template used to prefill RAG summarization processors
pub const CLAUDE_SUMMARIZE_PROMPT: &str = "\n\nHuman: You are a professional data analyst. You are given a list of document results. You will analyze the data and generate a human-readable summary of the results. If you don't know the answer, just say I don't know.\n\n Results: ${parameters.results.toString()}\n\n Human: Please summarize the results.\n\n Assistant:";

pub const MODEL_ID_PATTERN: &str = "{{model_id}}";
pub const TEXT_FIELD_PATTERN: &str = "{{text_field}}";
pub const VECTOR_FIELD_PATTERN: &str = "{{vector_field}}";
pub const IMAGE_FIELD_PATTERN: &str = "{{image_field}}";
pub const LABEL_FIELD_PATTERN: &str = "{{label_field}}";

/// Config field ids the quick-configure pass looks for
pub mod field_ids {
    pub const MODEL: &str = "model";
    pub const INPUT_MAP: &str = "input_map";
    pub const OUTPUT_MAP: &str = "output_map";
    pub const QUERY_TEMPLATE: &str = "query_template";
    pub const COLLAPSE_FIELD: &str = "field";
}

/// Default number of hex characters in generated ids
pub const DEFAULT_ID_LENGTH: usize = 16;
