use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use daylog_store::StoreConfig;

use crate::error::ServerError;

#[derive(Parser)]
#[command(name = "daylog-server", about = "Daily telemetry history store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the history API
    Serve(ConfigArgs),
    /// Sweep, then append one JSON record for now
    Record(RecordArgs),
    /// Print one day's records, one JSON value per line
    Load(LoadArgs),
    /// Print the retention window as JSON
    History(ConfigArgs),
    /// Delete partitions outside the retention window
    Sweep(ConfigArgs),
    /// List every partition file
    List(ConfigArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    /// Path to TOML config file
    #[arg(long, default_value = "config.toml", env = "DAYLOG_CONFIG")]
    pub config: String,
}

#[derive(Args, Clone, Debug)]
pub struct RecordArgs {
    #[command(flatten)]
    pub common: ConfigArgs,
    /// Read the record from this file instead of stdin
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
pub struct LoadArgs {
    #[command(flatten)]
    pub common: ConfigArgs,
    /// Calendar date, YYYY-MM-DD
    #[arg(long)]
    pub date: chrono::NaiveDate,
}

// ---- TOML Config ----

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Run a retention sweep on this period while serving. Off when unset.
    #[serde(default)]
    pub sweep_interval_secs: Option<u64>,
    pub store: StoreConfig,
}

fn default_api_port() -> u16 {
    9200
}

impl ServerConfig {
    pub fn load(path: &str) -> Result<Self, ServerError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config { context: "read", detail: format!("'{path}': {e}") })?;
        Self::parse(&content)
            .map_err(|e| ServerError::Config { context: "parse", detail: format!("'{path}': {e}") })
    }

    fn parse(content: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        config.store.validate().map_err(|e| e.to_string())?;
        if config.sweep_interval_secs == Some(0) {
            return Err("sweep_interval_secs must be positive".into());
        }
        Ok(config)
    }
}
