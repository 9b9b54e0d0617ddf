//! Output formatting and writing utilities
//!
//! Results are written as JSON, YAML, or a human-readable rendering, with
//! dedicated human layouts for path resolutions, model fields, and
//! placeholder reports.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use flowkit_core::ModelField;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Outcome of evaluating one expression with `flowkit resolve`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveReport {
    pub path: String,
    /// Where the expression was evaluated
    pub root: String,
    pub definite: bool,
    /// `None` when nothing matched
    pub value: Option<Value>,
}

/// Placeholder names of a query template, with optional interpolation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderReport {
    pub placeholders: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolated: Option<String>,
    pub has_empty_values: bool,
    /// Whether a second template uses the same placeholder names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches_other: Option<bool>,
}

/// Formatting with specialized layouts for the CLI's report types
pub trait OutputFormatter {
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    fn format_resolution(&self, report: &ResolveReport) -> Result<String>;

    fn format_model_fields(&self, fields: &[ModelField]) -> Result<String>;

    fn format_placeholders(&self, report: &PlaceholderReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_resolution(&self, report: &ResolveReport) -> Result<String> {
        match self {
            OutputFormat::Human => format_resolution_human(report),
            _ => self.format(report),
        }
    }

    fn format_model_fields(&self, fields: &[ModelField]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_model_fields_human(fields)),
            _ => self.format(&fields),
        }
    }

    fn format_placeholders(&self, report: &PlaceholderReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_placeholders_human(report)),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: progress && !quiet && io::stdout().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer (no progress indicators)
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet,
            writer,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Informational line, human format only
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Warnings are shown even in quiet mode
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            tracing::warn!("{}", message);
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.format == OutputFormat::Yaml {
            // serde_yaml already ends documents with a newline
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    pub fn resolution(&mut self, report: &ResolveReport) -> Result<()> {
        let formatted = self.format.format_resolution(report)?;
        self.writeln(formatted.trim_end())
    }

    pub fn model_fields(&mut self, fields: &[ModelField]) -> Result<()> {
        let formatted = self.format.format_model_fields(fields)?;
        self.writeln(formatted.trim_end())
    }

    pub fn placeholders(&mut self, report: &PlaceholderReport) -> Result<()> {
        let formatted = self.format.format_placeholders(report)?;
        self.writeln(formatted.trim_end())
    }

    /// Spinner for work that may take a moment on large inputs
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn format_resolution_human(report: &ResolveReport) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!("Path: {}\n", report.path));
    output.push_str(&format!("Evaluated against: {}\n", report.root));
    output.push_str(&format!(
        "Result shape: {}\n",
        if report.definite { "single value" } else { "list of matches" }
    ));
    match &report.value {
        Some(value) => {
            output.push_str("Value:\n");
            output.push_str(&serde_json::to_string_pretty(value)?);
            output.push('\n');
        }
        None => output.push_str("Value: undefined\n"),
    }

    Ok(output)
}

fn format_model_fields_human(fields: &[ModelField]) -> String {
    if fields.is_empty() {
        return "No fields declared\n".to_string();
    }

    let label_width = fields.iter().map(|f| f.label.len()).max().unwrap_or(0);
    let type_width = fields
        .iter()
        .map(|f| f.field_type.as_deref().unwrap_or("-").len())
        .max()
        .unwrap_or(1);

    let mut output = String::new();
    for field in fields {
        let line = format!(
            "{:label_width$}  {:type_width$}  {}",
            field.label,
            field.field_type.as_deref().unwrap_or("-"),
            field.description.as_deref().unwrap_or(""),
            label_width = label_width,
            type_width = type_width,
        );
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

fn format_placeholders_human(report: &PlaceholderReport) -> String {
    let mut output = String::new();

    if report.placeholders.is_empty() {
        output.push_str("No placeholders found\n");
    } else {
        output.push_str(&format!("Placeholders ({}):\n", report.placeholders.len()));
        for name in &report.placeholders {
            output.push_str(&format!("  • {}\n", name));
        }
    }

    if let Some(same) = report.matches_other {
        output.push_str(if same {
            "Other template uses the same placeholders\n"
        } else {
            "Other template uses different placeholders\n"
        });
    }

    if let Some(query) = &report.interpolated {
        output.push_str("Interpolated query:\n");
        output.push_str(query);
        output.push('\n');
    }

    output
}
