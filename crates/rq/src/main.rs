use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::load_config;
use commands::{CommandContext, CommandError, LoadedSchema};
use dispatch::{SchemaCommand, SchemaDispatch, StandaloneCommand, StandaloneDispatch};
use requery_rs::FilterError;

/// Environment variable holding the log filter, checked before `RUST_LOG`.
const LOG_ENV: &str = "RQ_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("Error: {e}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Sets up the tracing subscriber on stderr.
///
/// `RQ_LOG` or `RUST_LOG` take precedence over the level implied by
/// `--verbose`/`--quiet`.
fn init_logging(cli: &Cli) {
    let default_filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    let filter = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_filter.to_string());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!cli.no_color)
        .compact()
        .with_env_filter(filter)
        .init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    if let Some(dispatch) = StandaloneDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    let Some(dispatch) = SchemaDispatch::from_cli(cli) else {
        return Ok(());
    };

    let config = load_config()?;
    let schema = LoadedSchema::from_config(&config);
    tracing::debug!(
        entities = schema.factory.registry().entities().len(),
        "loaded schema"
    );
    dispatch.execute(&ctx, &schema)
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(FilterError::Parse { .. }) => "PARSE_ERROR",
        CommandError::Filter(
            FilterError::UnknownEntity { .. } | FilterError::UnknownField { .. },
        ) => "SCHEMA_ERROR",
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Input(_) => "INPUT_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Config(_) => ExitCode::from(5),
        CommandError::Filter(FilterError::UnknownEntity { .. }) => ExitCode::from(5),
        CommandError::Filter(_) => ExitCode::from(1),
        CommandError::Input(_) => ExitCode::from(1),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Json(_) => ExitCode::from(1),
    }
}
