//! Flowkit CLI - command-line front end for the flowkit-core engine
//!
//! Entry point: parses arguments, loads configuration, installs logging,
//! and dispatches to the command handlers.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;

fn main() {
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    match run(cli) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Load configuration and logging, then run the command
///
/// The log guard lives until this returns so file output is flushed before
/// `main` exits.
fn run(cli: Cli) -> Result<()> {
    let config = Config::load_with_file(cli.config.as_deref())?;

    if !config.output.color {
        control::set_override(false);
    }

    let _log_guard = match init_logging(&cli, &config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    execute(cli, &config)
}

#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn execute(cli: Cli, config: &Config) -> Result<()> {
    let timer = Timer::new("cli_execution");
    let _entered = timer.span().enter();

    let format = cli.output_format(&config.output.format);
    let use_color = cli.use_color() && config.output.color;
    let mut output = OutputWriter::new(format, use_color, cli.quiet, config.output.progress);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Preview(args) => handlers::handle_preview(args, config, &mut output),
        Commands::Resolve(args) => handlers::handle_resolve(args, config, &mut output),
        Commands::ModelFields(args) => handlers::handle_model_fields(args, config, &mut output),
        Commands::QuickConfigure(args) => handlers::handle_quick_configure(args, config, &mut output),
        Commands::Placeholders(args) => handlers::handle_placeholders(args, &mut output),
        Commands::Simulate(args) => handlers::handle_simulate(args, config, &mut output),
        Commands::Config(args) => handlers::handle_config(args, config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Build the logging configuration from flags, config file, and environment
fn logging_config(cli: &Cli, config: &Config) -> LoggingConfig {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);
    logging_config.apply_settings(&config.logging, verbosity);
    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging_config
}

fn init_logging(cli: &Cli, config: &Config) -> Result<Option<WorkerGuard>> {
    logging::init_logging(logging_config(cli, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["flowkit", "-v", "resolve", "$.a", "--input", "doc.json"]);
        assert_eq!(cli.verbosity_level(), 1);
        assert!(matches!(cli.command, Commands::Resolve(_)));

        let cli = Cli::parse_from(["flowkit", "--quiet", "simulate", "unwrap", "response.json"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(cli.quiet);
    }

    #[test]
    fn test_quiet_logging_only_errors() {
        let cli = Cli::parse_from(["flowkit", "--quiet", "config", "show"]);
        let logging_config = logging_config(&cli, &Config::default());
        assert!(!logging_config.console);
        assert_eq!(logging_config.level, "error");
    }

    #[test]
    fn test_verbose_logging_overrides_config_level() {
        let cli = Cli::parse_from(["flowkit", "-vv", "config", "show"]);
        let mut config = Config::default();
        config.logging.level = "error".to_string();
        // RUST_LOG would take precedence; only check when it is unset
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(logging_config(&cli, &config).level, "debug");
        }
    }
}
