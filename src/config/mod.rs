pub mod types;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use types::{Config, Settings};

use crate::error::{DaylogError, DaylogResult};

/// Overrides the storage root
pub const DIR_ENV: &str = "DAYLOG_DIR";
/// Overrides the configuration file location
pub const CONFIG_ENV: &str = "DAYLOG_CONFIG";

impl Settings {
    /// Resolve locations from the environment, falling back to platform defaults
    pub fn resolve() -> DaylogResult<Self> {
        let storage_dir = match env::var(DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => expand(&dir),
            _ => Self::default_storage_dir()?,
        };

        let config_file = match env::var(CONFIG_ENV) {
            Ok(file) if !file.trim().is_empty() => expand(&file),
            _ => Self::default_config_file()?,
        };

        tracing::debug!(
            storage_dir = %storage_dir.display(),
            config_file = %config_file.display(),
            "resolved settings"
        );

        Ok(Self {
            storage_dir,
            config_file,
        })
    }

    fn default_storage_dir() -> DaylogResult<PathBuf> {
        if let Some(documents) = dirs::document_dir() {
            return Ok(documents.join("todo"));
        }
        home_dir().map(|home| home.join("Documents/todo"))
    }

    fn default_config_file() -> DaylogResult<PathBuf> {
        home_dir().map(|home| home.join(".config/daylog/config.toml"))
    }
}

fn home_dir() -> DaylogResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| DaylogError::Config {
        path: PathBuf::from("~"),
        message: "could not find home directory".to_string(),
    })
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).to_string())
}

impl Config {
    /// Load the config file, `Ok(None)` when it has not been created yet
    pub fn load(path: &Path) -> DaylogResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| DaylogError::io(path, e))?;
        let config: Config = toml::from_str(&content).map_err(|e| DaylogError::Config {
            path: path.to_path_buf(),
            message: format!("failed to parse TOML: {}", e),
        })?;
        Ok(Some(config))
    }

    pub fn save(&self, path: &Path) -> DaylogResult<()> {
        let toml_string = toml::to_string_pretty(self).map_err(|e| DaylogError::Config {
            path: path.to_path_buf(),
            message: format!("failed to serialize: {}", e),
        })?;
        crate::daylog::write_file_atomic(path, toml_string.as_bytes())?;
        tracing::debug!(
            path = %path.display(),
            daylog = %self.daylog_file.display(),
            "config saved"
        );
        Ok(())
    }
}
