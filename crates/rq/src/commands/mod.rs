//! Command implementations for the rq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod apply;
pub mod compile;
pub mod completions;
pub mod config;
pub mod reverse;
pub mod schema;

use requery_rs::{DefaultFilterFactory, FilterError, FilterResolver, FilterWrapper};

use crate::cli::{Cli, FilterArgs};
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter parsing or conversion error.
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Invalid command input, such as a rows file that is not an array.
    #[error("invalid input: {0}")]
    Input(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color,
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}

/// The configured entity schemas, ready to convert filters.
pub struct LoadedSchema {
    /// Factory over the registry built from the config file.
    pub factory: DefaultFilterFactory,
    default_entity: Option<String>,
}

impl LoadedSchema {
    /// Builds the schema registry described by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            factory: DefaultFilterFactory::from(config.registry()),
            default_entity: config.default_entity.clone(),
        }
    }

    /// Returns the configured default entity, if any.
    pub fn default_entity(&self) -> Option<&str> {
        self.default_entity.as_deref()
    }

    /// Picks the entity a command works on: the requested one, then the
    /// configured default, then the only configured entity.
    pub fn entity(&self, requested: Option<&str>) -> Result<String> {
        if let Some(entity) = requested.or(self.default_entity.as_deref()) {
            return Ok(entity.to_string());
        }

        match self.factory.registry().entities().as_slice() {
            [only] => Ok(only.name().to_string()),
            [] => Err(CommandError::Config(
                "no entities configured. Run 'rq config init' to create an example config"
                    .to_string(),
            )),
            _ => Err(CommandError::Config(
                "several entities configured; pass --entity or set default_entity".to_string(),
            )),
        }
    }

    /// Reads the filter named by `args`.
    ///
    /// `--filter` and `--complex` are parsed strictly. `--query` goes through
    /// the request resolver, which treats unreadable filters as no filter.
    pub fn wrapper(&self, args: &FilterArgs) -> Result<FilterWrapper> {
        let wrapper = match (&args.filter, &args.complex, &args.query) {
            (Some(simple), _, _) => FilterWrapper::from_simple_json(simple)?,
            (None, Some(complex), _) => FilterWrapper::from_complex_json(complex)?,
            (None, None, Some(query)) => FilterResolver::default().resolve_query(query),
            (None, None, None) => {
                tracing::debug!("no filter given, matching everything");
                FilterWrapper::Empty
            }
        };
        Ok(wrapper)
    }
}
