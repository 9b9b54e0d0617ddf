//! Preview command handler

use super::utils::{load_document, load_mapping, save_output};
use crate::cli::PreviewArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use flowkit_core::{transform_array, transform_object, ProcessorContext, TransformContext};

/// Handle the preview command
pub fn handle_preview(args: PreviewArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("preview", &args.input.display().to_string());

    let context: ProcessorContext = args.context.map(Into::into).unwrap_or(config.defaults.context);
    let transform_context: TransformContext = args
        .transform_context
        .map(Into::into)
        .unwrap_or(config.defaults.transform_context);

    output.info(&format!(
        "Previewing {} with {} ({:?} {:?})",
        args.input.display(),
        args.map.display(),
        context,
        transform_context
    ))?;

    let input = load_document(&args.input)?;
    let map = load_mapping(&args.map)?;
    let query = args.query.as_deref().map(load_document).transpose()?;

    let spinner = output.spinner("Applying mapping...");
    let result = if args.collapse {
        let docs = input.as_array().ok_or_else(|| {
            Error::invalid_args(format!(
                "--collapse needs a list of documents, but {} is not an array",
                args.input.display()
            ))
        })?;
        transform_array(docs, &map, context, transform_context, query.as_ref())
    } else {
        transform_object(&input, &map, context, transform_context, query.as_ref())
    };
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let skipped: Vec<&str> = map
        .iter()
        .filter(|entry| result.get(&entry.key).is_none())
        .map(|entry| entry.key.as_str())
        .collect();
    tracing::info!(entries = map.len(), skipped = skipped.len(), "Mapping applied");
    if !skipped.is_empty() {
        output.warning(&format!(
            "Skipped entries that could not be evaluated: {}",
            skipped.join(", ")
        ))?;
    }

    output.section("Transformed Output")?;
    output.data(&result)?;

    if let Some(path) = args.save_to {
        save_output(&path, &result, output.format())?;
        output.success(&format!("✓ Output saved to {}", path.display()))?;
    }

    Ok(())
}
