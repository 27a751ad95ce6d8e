//! Config command implementation.
//!
//! The config file declares the entities filters are resolved against.
//! It is located at ~/.config/rq/config.toml.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use requery_rs::{EntitySchema, FieldType, SchemaRegistry};
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "RQ_CONFIG";

/// Example config written by `rq config init`.
const DEFAULT_CONFIG: &str = r#"# rq - query filter CLI configuration

# Config schema version (do not modify)
version = 1

# Entity used when --entity is not given
default_entity = "user"

# Each entity lists its filterable fields. Scalar types are
# integer, float, text, boolean, date, date_time and uuid.
# A table with an `entity` key links to another entity, so
# filters can use dotted paths such as "address.city".
[entities.user.fields]
age = "integer"
name = "text"
status = "text"
active = "boolean"
joined = "date"
address = { entity = "address" }

[entities.address.fields]
city = "text"
zip = "text"
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Entity used when a command does not name one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_entity: Option<String>,

    /// Declared entities, by name.
    #[serde(default)]
    pub entities: BTreeMap<String, EntityConfig>,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            default_entity: None,
            entities: BTreeMap::new(),
        }
    }
}

/// One entity section.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EntityConfig {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldType>,
}

impl Config {
    /// Builds a schema registry holding every configured entity.
    pub fn registry(&self) -> SchemaRegistry {
        self.entities
            .iter()
            .fold(SchemaRegistry::new(), |registry, (name, entity)| {
                let schema = entity
                    .fields
                    .iter()
                    .fold(EntitySchema::new(name), |schema, (field, field_type)| {
                        schema.with_field(field, field_type.clone())
                    });
                registry.with(schema)
            })
    }
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/rq/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            return Ok(parent.to_path_buf());
        }
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("rq"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("rq"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
///
/// A missing file is an empty config, not an error.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "config version {} is newer than this rq supports ({})",
            config.version, CONFIG_VERSION
        )));
    }

    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("Settings:");
            if let Some(ref entity) = config.default_entity {
                println!("  default_entity: {}", entity);
            }
            for (name, entity) in &config.entities {
                println!("\n[entities.{}]", name);
                println!("  fields: {}", entity.fields.len());
            }
        } else {
            println!("(No config file exists. Run 'rq config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Executes the config init command, writing the example config.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "created",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created config at: {}", path.display());
    }

    Ok(())
}
