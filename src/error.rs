//! Error types for the VR engine.
//!
//! Every fatal condition a consolidate, calculate or validate call can hit
//! is a variant of [`EngineError`]. Per-row gaps in
//! the source data are never errors; they resolve to documented defaults.

use thiserror::Error;

/// The main error type for the VR engine.
///
/// The API layer maps each variant to an HTTP status; the CLI prints it and
/// exits non-zero.
///
/// # Example
///
/// ```
/// use vr_engine::error::EngineError;
///
/// let error = EngineError::SourceNotFound {
///     path: "/data/ATIVOS.xlsx".to_string(),
/// };
/// assert_eq!(error.to_string(), "Source file not found: /data/ATIVOS.xlsx");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The configured billing window is not usable.
    #[error("Invalid billing period: {message}")]
    InvalidBillingPeriod {
        /// What is wrong with the period.
        message: String,
    },

    /// A required source file (or the archive holding it) is absent.
    #[error("Source file not found: {path}")]
    SourceNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A source file exists but could not be read as a table.
    #[error("Failed to read source '{path}': {message}")]
    SourceMalformed {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the read error.
        message: String,
    },

    /// A column needed to join or price the sources is missing.
    #[error("Join key unresolved in source '{source_name}': {column}")]
    JoinKeyUnresolved {
        /// Logical name of the source table.
        source_name: String,
        /// Description of the missing column.
        column: String,
    },

    /// A calculation was requested before any sources were consolidated.
    #[error("No sources loaded: run consolidate before calculate or validate")]
    SourcesNotLoaded,

    /// An output artifact could not be written.
    #[error("Failed to write output '{path}': {message}")]
    OutputWrite {
        /// The output path.
        path: String,
        /// A description of the write error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
