//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the rq CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// rq - compile, reverse and apply JSON query filters
#[derive(Parser, Debug)]
#[command(name = "rq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where a command reads its filter from.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Simple filter: a condition object or an array of conditions
    #[arg(short, long, conflicts_with_all = ["complex", "query"])]
    pub filter: Option<String>,

    /// Complex filter: a group object with "operator" and "operations"
    #[arg(short, long, conflicts_with = "query")]
    pub complex: Option<String>,

    /// URL query string carrying a `filter` or `complexFilter` parameter
    #[arg(long)]
    pub query: Option<String>,

    /// Entity to resolve fields against (default: from config)
    #[arg(short, long)]
    pub entity: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a filter into a predicate
    #[command(alias = "c")]
    Compile {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print a parameterized SQL WHERE clause instead of the readable form
        #[arg(long)]
        sql: bool,
    },

    /// Convert a filter into a predicate and back into the filter DSL
    #[command(alias = "r")]
    Reverse {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Filter JSON rows with a filter
    #[command(alias = "a")]
    Apply {
        #[command(flatten)]
        filter: FilterArgs,

        /// File holding a JSON array of row objects ('-' for stdin)
        #[arg(long)]
        rows: PathBuf,
    },

    /// List configured entities, or the fields of one entity
    Schema {
        /// Entity name
        entity: Option<String>,
    },

    /// View and create configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print config file path
    Path,

    /// Write an example config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
