//! Simulate command handlers

use super::utils::{load_document, read_text};
use crate::cli::{SimulateAction, SimulateArgs, SimulatePrepareArgs, SimulateUnwrapArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use flowkit_core::{prepare_docs_for_simulate, unwrap_transformed_docs, SimulateIngestPipelineResponse};
use serde_json::json;

pub fn handle_simulate(args: SimulateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        SimulateAction::Prepare(prepare) => handle_prepare(prepare, config, output),
        SimulateAction::Unwrap(unwrap) => handle_unwrap(unwrap, output),
    }
}

fn handle_prepare(args: SimulatePrepareArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let docs = read_text(&args.docs)?;
    let index = args
        .index
        .unwrap_or_else(|| config.defaults.simulate_index.clone());

    let prepared = prepare_docs_for_simulate(&docs, &index);
    if prepared.is_empty() {
        output.warning(&format!(
            "No documents found in {}; expected a JSON array of documents",
            args.docs.display()
        ))?;
    }
    tracing::debug!(count = prepared.len(), index = %index, "Prepared simulate documents");

    output.data(&json!({ "docs": prepared }))
}

fn handle_unwrap(args: SimulateUnwrapArgs, output: &mut OutputWriter) -> Result<()> {
    let raw = load_document(&args.response)?;
    let response: SimulateIngestPipelineResponse =
        serde_json::from_value(raw).map_err(|e| Error::InvalidFormat {
            path: args.response.clone(),
            expected: format!("a simulate response ({})", e),
        })?;

    let transformed = unwrap_transformed_docs(&response);
    if let Some(reason) = &transformed.error {
        output.warning(&format!("Some documents failed to transform: {}", reason))?;
    }

    output.data(&transformed.sources)
}
