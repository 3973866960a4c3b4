//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file and the environment.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::EngineConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "VR_DATA_DIR";

/// Loads and provides access to the engine configuration.
///
/// Settings are resolved in three layers: built-in defaults, an optional
/// YAML file, then environment variables (a `.env` file is honoured).
///
/// # File Structure
///
/// ```text
/// period:
///   start: 2025-04-15
///   end: 2025-05-16
///   notice_cutoff: 2025-05-15
///   competence: 2025-05-01
/// pricing:
///   fallback_daily_rate: "35.00"
/// paths:
///   data_dir: ./data
/// sources:
///   active: ATIVOS.xlsx
/// ```
///
/// # Example
///
/// ```no_run
/// use vr_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/vr.yaml").unwrap();
/// println!("Data directory: {}", loader.config().paths.data_dir.display());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from a YAML file, then applies environment overrides.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML (`ConfigParseError`)
    /// - The billing period is empty (`InvalidBillingPeriod`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        dotenvy::dotenv().ok();
        let config = Self::load_yaml(path.as_ref())?;
        Self::finish(config, |key| env::var(key).ok())
    }

    /// Builds the default configuration, then applies environment overrides.
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();
        Self::finish(EngineConfig::default(), |key| env::var(key).ok())
    }

    /// Wraps an already-built configuration without consulting the environment.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        Self::finish(config, |_| None)
    }

    fn finish<F>(mut config: EngineConfig, lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::apply_overrides(&mut config, lookup);
        config.period.validate()?;
        Ok(Self { config })
    }

    fn apply_overrides<F>(config: &mut EngineConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            debug!(data_dir = %dir, "Data directory overridden from environment");
            config.paths.data_dir = PathBuf::from(dir);
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml(path: &Path) -> EngineResult<EngineConfig> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}
