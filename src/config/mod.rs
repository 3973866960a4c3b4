//! Configuration loading and management for the VR engine.
//!
//! This module provides the billing period, pricing parameters, data paths
//! and source file names, loaded from YAML with environment overrides.
//!
//! # Example
//!
//! ```no_run
//! use vr_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::from_env().unwrap();
//! println!("Results go to: {}", config.config().paths.result_path().display());
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, DATA_DIR_ENV};
pub use types::{
    DEFAULT_EMPLOYEE_SHARE, DEFAULT_EMPLOYER_SHARE, DEFAULT_FALLBACK_DAILY_RATE, EngineConfig,
    PathsConfig, PricingConfig, SourceFileNames,
};
