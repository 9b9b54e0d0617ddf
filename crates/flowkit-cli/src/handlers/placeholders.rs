//! Placeholders command handler

use super::utils::{parse_param, read_text};
use crate::cli::PlaceholdersArgs;
use crate::error::Result;
use crate::output::{OutputWriter, PlaceholderReport};
use flowkit_core::{contains_empty_values, extract_placeholders, interpolate, same_names, QueryParam};

pub fn handle_placeholders(args: PlaceholdersArgs, output: &mut OutputWriter) -> Result<()> {
    let template = read_text(&args.template)?;
    let placeholders = extract_placeholders(&template);

    let params = args
        .params
        .iter()
        .map(|raw| parse_param(raw))
        .collect::<Result<Vec<QueryParam>>>()?;

    let matches_other = match &args.compare {
        Some(path) => Some(same_names(&placeholders, &extract_placeholders(&read_text(path)?))),
        None => None,
    };

    let has_empty_values = contains_empty_values(&params);
    if has_empty_values {
        output.warning("Some placeholder values are empty")?;
    }

    let interpolated = if params.is_empty() {
        None
    } else {
        for name in &placeholders {
            if !params.iter().any(|p| &p.name == name) {
                output.warning(&format!("No value given for placeholder '{}'", name))?;
            }
        }
        Some(interpolate(&template, &params))
    };

    output.placeholders(&PlaceholderReport {
        placeholders,
        interpolated,
        has_empty_values,
        matches_other,
    })
}
