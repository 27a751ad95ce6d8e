//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands split by whether they need the configured entity schemas.
//! Config and completions must work without a valid config file, so they
//! never load it.

use crate::cli::{Cli, Commands, ConfigCommands, FilterArgs, Shell};
use crate::commands::apply::ApplyOptions;
use crate::commands::compile::CompileOptions;
use crate::commands::{self, CommandContext, CommandError, LoadedSchema, Result};

/// Trait for commands that run without loading the schema.
pub trait StandaloneCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that work against the configured schema.
pub trait SchemaCommand {
    /// Execute the command with the loaded schema.
    fn execute(&self, ctx: &CommandContext, schema: &LoadedSchema) -> Result<()>;
}

/// Commands that don't need the schema.
pub enum StandaloneDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> StandaloneDispatch<'a> {
    /// Try to create a standalone dispatch from the CLI command.
    /// Returns None if the command needs the schema.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl StandaloneCommand for StandaloneDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("rq - compile, reverse and apply JSON query filters");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
        Some(ConfigCommands::Init { force }) => commands::config::execute_init(ctx, *force),
    }
}

/// Commands that need the schema.
pub enum SchemaDispatch<'a> {
    Compile { filter: &'a FilterArgs, sql: bool },
    Reverse { filter: &'a FilterArgs },
    Apply { filter: &'a FilterArgs, rows: &'a std::path::Path },
    Schema { entity: Option<&'a str> },
}

impl<'a> SchemaDispatch<'a> {
    /// Create a schema dispatch from the CLI command.
    /// Returns None for standalone commands.
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Compile { filter, sql }) => Some(Self::Compile { filter, sql: *sql }),
            Some(Commands::Reverse { filter }) => Some(Self::Reverse { filter }),
            Some(Commands::Apply { filter, rows }) => Some(Self::Apply {
                filter,
                rows: rows.as_path(),
            }),
            Some(Commands::Schema { entity }) => Some(Self::Schema {
                entity: entity.as_deref(),
            }),
            _ => None,
        }
    }
}

impl SchemaCommand for SchemaDispatch<'_> {
    fn execute(&self, ctx: &CommandContext, schema: &LoadedSchema) -> Result<()> {
        match self {
            Self::Compile { filter, sql } => {
                let opts = CompileOptions {
                    filter: *filter,
                    sql: *sql,
                };
                commands::compile::execute(ctx, schema, &opts)
            }
            Self::Reverse { filter } => commands::reverse::execute(ctx, schema, filter),
            Self::Apply { filter, rows } => {
                let opts = ApplyOptions {
                    filter: *filter,
                    rows: *rows,
                };
                commands::apply::execute(ctx, schema, &opts)
            }
            Self::Schema { entity } => commands::schema::execute(ctx, schema, *entity),
        }
    }
}
