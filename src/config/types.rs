use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persisted configuration (config.toml)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute path of the daylog that task commands operate on
    pub daylog_file: PathBuf,
}

/// Where daylogs and the configuration file live for this invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub storage_dir: PathBuf,
    pub config_file: PathBuf,
}
