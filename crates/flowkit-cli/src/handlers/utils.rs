//! Shared utilities for command handlers

use crate::cli::OutputFormat;
use crate::error::{Error, ErrorContext, Result};
use flowkit_core::{MapEntryValue, MappingEntry, QueryParam};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Read a file as text, reporting a missing file distinctly
pub fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Load a JSON or YAML document, chosen by extension
pub fn load_document(path: &Path) -> Result<Value> {
    let content = read_text(path)?;

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        })
    }
}

/// Load mapping entries
///
/// Accepts the stored form, a list of `{key, value}` entries, or the
/// shorthand object `{"key": "path", ...}` where every value is a field path.
pub fn load_mapping(path: &Path) -> Result<Vec<MappingEntry>> {
    match load_document(path)? {
        Value::Array(entries) => entries
            .into_iter()
            .map(|entry| {
                serde_json::from_value(entry).map_err(|e| Error::InvalidFormat {
                    path: path.to_path_buf(),
                    expected: format!("mapping entries ({})", e),
                })
            })
            .collect(),
        Value::Object(shorthand) => shorthand
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(field) => Ok(MappingEntry::new(key, MapEntryValue::field(field))),
                other => Err(Error::InvalidFormat {
                    path: path.to_path_buf(),
                    expected: format!("a path string for '{}', found {}", key, other),
                }),
            })
            .collect(),
        _ => Err(Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "a list of mapping entries or a key-to-path object".to_string(),
        }),
    }
}

/// Parse `name=value`; the value may be empty
pub fn parse_param(raw: &str) -> Result<QueryParam> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok(QueryParam::new(name.trim(), value)),
        _ => Err(Error::invalid_args(format!(
            "expected NAME=VALUE for --param, got '{}'",
            raw
        ))),
    }
}

/// Write `value` to `path`, as YAML for YAML output and pretty JSON otherwise
pub fn save_output<T: Serialize>(path: &Path, value: &T, format: OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        _ => serde_json::to_string_pretty(value)?,
    };
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
