//! Configuration management for the CLI
//!
//! Settings come from the first configuration file found (or the one given
//! with `--config`), falling back to built-in defaults. Command-line flags
//! take precedence over both.

use crate::error::{Error, Result};
use flowkit_core::{ProcessorContext, TransformContext};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project config written by `config init`
pub const PROJECT_CONFIG_FILE: &str = ".flowkit.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults for command options
    pub defaults: DefaultsConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Values used when a command option is omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Pipeline stage for `preview` and `resolve`
    pub context: ProcessorContext,

    /// Processor side for `preview` and `resolve`
    pub transform_context: TransformContext,

    /// Read model outputs from the full response schema
    pub full_response_path: bool,

    /// Index name stamped on simulate documents
    pub simulate_index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (compact, full, json)
    pub format: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    pub timestamps: bool,

    pub thread_ids: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            context: ProcessorContext::Ingest,
            transform_context: TransformContext::Input,
            full_response_path: false,
            simulate_index: "my-index".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
            progress: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
            file: None,
            timestamps: true,
            thread_ids: false,
        }
    }
}

/// Serialization format of a config file, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match FileFormat::of(path) {
            FileFormat::Toml => toml::from_str(&content)?,
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Json => serde_json::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Config files checked in order: working directory, user config dir, home
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = ["toml", "yaml", "yml", "json"]
            .iter()
            .map(|ext| PathBuf::from(format!(".flowkit.{}", ext)))
            .collect();

        if let Some(config_dir) = dirs::config_dir() {
            let flowkit_dir = config_dir.join("flowkit");
            for ext in ["toml", "yaml", "json"] {
                paths.push(flowkit_dir.join(format!("config.{}", ext)));
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            for ext in ["toml", "yaml", "json"] {
                paths.push(home_dir.join(format!(".flowkit.{}", ext)));
            }
        }

        paths
    }

    /// Render in the format implied by `path`'s extension
    pub fn to_string_for(&self, path: &Path) -> Result<String> {
        match FileFormat::of(path) {
            FileFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e))),
            FileFormat::Yaml => Ok(serde_yaml::to_string(self)?),
            FileFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_string_for(path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}
