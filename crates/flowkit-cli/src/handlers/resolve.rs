//! Resolve command handler

use super::utils::load_document;
use crate::cli::ResolveArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::{OutputWriter, ResolveReport};
use flowkit_core::transform::resolver::is_non_empty;
use flowkit_core::{EvaluationRoot, PathClassifier, PathResolver, ProcessorContext, TransformContext};

pub fn handle_resolve(args: ResolveArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let context: ProcessorContext = args.context.map(Into::into).unwrap_or(config.defaults.context);
    let transform_context: TransformContext = args
        .transform_context
        .map(Into::into)
        .unwrap_or(config.defaults.transform_context);

    let input = load_document(&args.input)?;
    let query = args.query.as_deref().map(load_document).transpose()?;

    let resolver = PathResolver::new();
    let has_query = query.as_ref().map_or(false, is_non_empty);
    let root = EvaluationRoot::select(&args.path, context, transform_context, has_query);
    let definite = root == EvaluationRoot::DotPath || resolver.classifier().is_definite(&args.path);

    let value = resolver.resolve(&input, &args.path, context, transform_context, query.as_ref())?;

    output.resolution(&ResolveReport {
        path: args.path,
        root: root.as_str().to_string(),
        definite,
        value,
    })
}
