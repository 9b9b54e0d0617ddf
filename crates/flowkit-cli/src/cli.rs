//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use flowkit_core::{ProcessorContext, QuickConfigureFields, TransformContext};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Flowkit CLI - preview transforms and configure search workflows
///
/// Evaluate input/output maps against sample documents, inspect model
/// interfaces, and fill in workflow templates from a handful of fields.
#[derive(Parser, Debug)]
#[command(
    name = "flowkit",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FLOWKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: configured format, or human]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply a mapping to a sample document and show the transformed result
    Preview(PreviewArgs),

    /// Evaluate a single path expression against a document
    Resolve(ResolveArgs),

    /// List the inputs or outputs declared by a model interface
    ModelFields(ModelFieldsArgs),

    /// Fill a workflow template from quick-configure fields
    QuickConfigure(QuickConfigureArgs),

    /// Inspect and interpolate `{{placeholder}}` names in a query template
    Placeholders(PlaceholdersArgs),

    /// Build or unwrap ingest pipeline simulate payloads
    Simulate(SimulateArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the preview command
#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Sample input document (JSON or YAML)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Mapping file: a list of `{key, value}` entries or a `key: path` object
    #[arg(short, long, value_name = "MAP")]
    pub map: PathBuf,

    /// Pipeline stage of the processor (defaults to the configured one)
    #[arg(long, value_enum)]
    pub context: Option<ContextArg>,

    /// Side of the processor the map applies to (defaults to the configured one)
    #[arg(long, value_enum)]
    pub transform_context: Option<TransformContextArg>,

    /// Original search request, for `_request.` paths
    #[arg(long, value_name = "QUERY")]
    pub query: Option<PathBuf>,

    /// Treat the input as a list of documents and collect results per key
    #[arg(long)]
    pub collapse: bool,

    /// Output file path (stdout if not specified)
    #[arg(long = "save-to")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Dot path or JSONPath expression
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Document to evaluate against (JSON or YAML)
    #[arg(short, long, value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(long, value_enum)]
    pub context: Option<ContextArg>,

    #[arg(long, value_enum)]
    pub transform_context: Option<TransformContextArg>,

    /// Original search request, for `_request.` paths
    #[arg(long, value_name = "QUERY")]
    pub query: Option<PathBuf>,
}

/// Arguments for the model-fields command
#[derive(Parser, Debug)]
pub struct ModelFieldsArgs {
    /// Model interface document (JSON or YAML)
    #[arg(value_name = "INTERFACE")]
    pub interface: PathBuf,

    /// List outputs instead of inputs
    #[arg(long)]
    pub outputs: bool,

    /// Read outputs from the full response schema instead of the inference results
    #[arg(long)]
    pub full_response_path: bool,
}

/// Arguments for the quick-configure command
#[derive(Parser, Debug)]
pub struct QuickConfigureArgs {
    /// Workflow template (JSON or YAML)
    #[arg(value_name = "WORKFLOW")]
    pub workflow: PathBuf,

    #[arg(long)]
    pub model_id: Option<String>,

    #[arg(long)]
    pub text_field: Option<String>,

    #[arg(long)]
    pub vector_field: Option<String>,

    #[arg(long)]
    pub image_field: Option<String>,

    #[arg(long)]
    pub label_field: Option<String>,

    /// Dimension of the embedding model's output
    #[arg(long)]
    pub embedding_length: Option<u64>,

    #[arg(long)]
    pub prompt_field: Option<String>,

    #[arg(long)]
    pub llm_response_field: Option<String>,

    /// Model interface used to generate input and output map keys
    #[arg(long, value_name = "FILE")]
    pub model_interface: Option<PathBuf>,

    /// Output file path (stdout if not specified)
    #[arg(long = "save-to")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the placeholders command
#[derive(Parser, Debug)]
pub struct PlaceholdersArgs {
    /// Query template file
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Placeholder value as `name=value` (repeatable)
    #[arg(short, long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Another template to compare placeholder names with
    #[arg(long, value_name = "OTHER")]
    pub compare: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct SimulateArgs {
    #[command(subcommand)]
    pub action: SimulateAction,
}

#[derive(Subcommand, Debug)]
pub enum SimulateAction {
    /// Wrap a JSON array of documents for the simulate API
    Prepare(SimulatePrepareArgs),

    /// Extract transformed sources from a simulate response
    Unwrap(SimulateUnwrapArgs),
}

#[derive(Parser, Debug)]
pub struct SimulatePrepareArgs {
    /// JSON file holding an array of documents
    #[arg(value_name = "DOCS")]
    pub docs: PathBuf,

    /// Index name to stamp on every document (defaults to the configured one)
    #[arg(long)]
    pub index: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SimulateUnwrapArgs {
    /// Simulate API response (JSON)
    #[arg(value_name = "RESPONSE")]
    pub response: PathBuf,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default `.flowkit.toml` in the current directory
    Init(ConfigInitArgs),

    /// Show the effective configuration
    Show(ConfigShowArgs),
}

#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Pipeline stage, as accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContextArg {
    Ingest,
    SearchRequest,
    SearchResponse,
}

/// Processor side, as accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TransformContextArg {
    Input,
    Output,
    Query,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }

    /// The `--output` flag, else the configured format, else human
    pub fn output_format(&self, configured: &str) -> OutputFormat {
        self.output
            .or_else(|| OutputFormat::from_str(configured, true).ok())
            .unwrap_or(OutputFormat::Human)
    }
}

impl QuickConfigureArgs {
    pub fn fields(&self) -> QuickConfigureFields {
        QuickConfigureFields {
            model_id: self.model_id.clone(),
            text_field: self.text_field.clone(),
            vector_field: self.vector_field.clone(),
            image_field: self.image_field.clone(),
            label_field: self.label_field.clone(),
            embedding_length: self.embedding_length,
            prompt_field: self.prompt_field.clone(),
            llm_response_field: self.llm_response_field.clone(),
        }
    }
}

impl From<ContextArg> for ProcessorContext {
    fn from(context: ContextArg) -> Self {
        match context {
            ContextArg::Ingest => ProcessorContext::Ingest,
            ContextArg::SearchRequest => ProcessorContext::SearchRequest,
            ContextArg::SearchResponse => ProcessorContext::SearchResponse,
        }
    }
}

impl From<TransformContextArg> for TransformContext {
    fn from(context: TransformContextArg) -> Self {
        match context {
            TransformContextArg::Input => TransformContext::Input,
            TransformContextArg::Output => TransformContext::Output,
            TransformContextArg::Query => TransformContext::Query,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
