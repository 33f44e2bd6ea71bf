use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "GROOT";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address for the triage API.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

pub const ENV_DATA_DIR: &str = "GROOT_DATA_DIR";
pub const ENV_BIND_ADDR: &str = "GROOT_BIND_ADDR";
pub const ENV_GROWTH_MODEL: &str = "GROOT_GROWTH_MODEL";
pub const ENV_TREATMENT_MODEL: &str = "GROOT_TREATMENT_MODEL";
pub const ENV_RESOURCES: &str = "GROOT_RESOURCES";
pub const ENV_COSTS: &str = "GROOT_COSTS";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,groot_lib=debug"
}

/// Get the application data directory.
/// ~/Groot/ when a home directory exists, ./Groot otherwise.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Groot")
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {var} '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Where the engine reads its models and tables, and where the API listens.
#[derive(Debug, Clone, PartialEq)]
pub struct TriageConfig {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub growth_model_path: PathBuf,
    pub treatment_model_path: PathBuf,
    pub resources_path: PathBuf,
    pub costs_path: PathBuf,
}

impl TriageConfig {
    /// Default file layout under `data_dir`, default bind address.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            growth_model_path: data_dir.join("models").join("growth_model.json"),
            treatment_model_path: data_dir.join("models").join("treatment_model.json"),
            resources_path: data_dir.join("data").join("resources_inventory.json"),
            costs_path: data_dir.join("data").join("treatment_costs.json"),
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(app_data_dir);
        let mut config = Self::with_data_dir(&data_dir);

        let bind = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        config.bind_addr = bind.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Invalid {
                var: ENV_BIND_ADDR,
                value: bind.clone(),
                reason: e.to_string(),
            }
        })?;

        if let Some(path) = lookup(ENV_GROWTH_MODEL) {
            config.growth_model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_TREATMENT_MODEL) {
            config.treatment_model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_RESOURCES) {
            config.resources_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_COSTS) {
            config.costs_path = PathBuf::from(path);
        }

        Ok(config)
    }
}
