//! Model-fields command handler

use super::utils::load_document;
use crate::cli::ModelFieldsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use flowkit_core::{parse_model_inputs, parse_model_outputs};

pub fn handle_model_fields(
    args: ModelFieldsArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let interface = load_document(&args.interface)?;

    let fields = if args.outputs {
        let full_response_path = args.full_response_path || config.defaults.full_response_path;
        output.info(if full_response_path {
            "Model outputs (full response)"
        } else {
            "Model outputs"
        })?;
        parse_model_outputs(Some(&interface), full_response_path)
    } else {
        output.info("Model inputs")?;
        parse_model_inputs(Some(&interface))
    };

    output.model_fields(&fields)
}
