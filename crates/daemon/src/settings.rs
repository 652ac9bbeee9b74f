//! Daemon configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `WALKIN_*` environment variables.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use walkin_core::domain::LocationSet;

const DEFAULT_CONFIG_FILE: &str = "walkin.toml";
const DEFAULT_DB_PATH: &str = "~/.walkin/queue.db";
const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9530;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub rpc_host: String,
    pub rpc_port: u16,
    /// Location vocabulary, fixed for the life of the process
    #[serde(default)]
    pub locations: Vec<String>,
    pub log_format: LogFormat,
    pub log_dir: Option<String>,
}

impl Settings {
    /// Load from `$WALKIN_CONFIG` (default `walkin.toml`) and the environment
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("WALKIN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let settings: Settings = Config::builder()
            .set_default("database_url", DEFAULT_DB_PATH)?
            .set_default("rpc_host", DEFAULT_RPC_HOST)?
            .set_default("rpc_port", DEFAULT_RPC_PORT as i64)?
            .set_default("log_format", "pretty")?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("WALKIN")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("locations"),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.rpc_port == 0 {
            anyhow::bail!("rpc_port must be non-zero");
        }
        self.location_set()?;
        Ok(())
    }

    /// Database path with `~` expanded
    pub fn database_path(&self) -> String {
        shellexpand::tilde(&self.database_url).into_owned()
    }

    pub fn location_set(&self) -> Result<LocationSet> {
        LocationSet::new(&self.locations).context("Invalid `locations` configuration")
    }
}
