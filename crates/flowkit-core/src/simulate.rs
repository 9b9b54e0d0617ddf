//! Payload shaping for the ingest-pipeline simulate API
//!
//! The core only builds the request documents and unwraps the response;
//! sending it is up to the caller.

use crate::constants::DEFAULT_ID_LENGTH;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One document in a simulate request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulateIngestPipelineDoc {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulateError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulateDocBody {
    #[serde(rename = "_source", default)]
    pub source: Value,
}

/// Result for one document: either the transformed doc or an error
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulateResultDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<SimulateDocBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SimulateError>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulateIngestPipelineResponse {
    #[serde(default)]
    pub docs: Vec<SimulateResultDoc>,
}

/// Transformed sources, with `null` in place of documents that failed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformedDocs {
    pub sources: Vec<Value>,
    /// Last failure reason reported, if any document failed
    pub error: Option<String>,
}

/// `<prefix>_<hex>` with up to 16 random hex characters
pub fn generate_id(prefix: Option<&str>, num_chars: usize) -> String {
    let hex = format!("{:016x}", rand::thread_rng().gen::<u64>());
    let len = num_chars.min(hex.len());
    format!("{}_{}", prefix.unwrap_or_default(), &hex[..len])
}

/// Wrap a JSON array of documents for the simulate API
///
/// Anything other than a JSON array yields no documents.
pub fn prepare_docs_for_simulate(docs: &str, index_name: &str) -> Vec<SimulateIngestPipelineDoc> {
    let parsed = match serde_json::from_str::<Value>(docs) {
        Ok(Value::Array(items)) => items,
        Ok(_) => Vec::new(),
        Err(e) => {
            debug!(error = %e, "Sample documents are not valid JSON");
            Vec::new()
        }
    };
    parsed
        .into_iter()
        .map(|source| SimulateIngestPipelineDoc {
            index: index_name.to_string(),
            id: generate_id(None, DEFAULT_ID_LENGTH),
            source,
        })
        .collect()
}

/// Pull each transformed `_source` out of a simulate response
pub fn unwrap_transformed_docs(response: &SimulateIngestPipelineResponse) -> TransformedDocs {
    let mut error = None;
    let sources = response
        .docs
        .iter()
        .map(|result| match &result.error {
            Some(err) => {
                let reason = err.reason.clone().unwrap_or_default();
                debug!(reason = %reason, "Simulate reported a failed document");
                error = Some(reason);
                Value::Null
            }
            None => result
                .doc
                .as_ref()
                .map(|doc| doc.source.clone())
                .unwrap_or(Value::Null),
        })
        .collect();
    TransformedDocs { sources, error }
}
