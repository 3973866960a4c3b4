//! Response types for the VR engine API.
//!
//! This module defines the success bodies of the three endpoints and the
//! error response structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::EngineError;
use crate::models::{PayoutComputation, PayoutTotals, ValidationRow};
use crate::sources::{LoadSummary, SourceKind};

/// Response body of `/consolidate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidateResponse {
    /// Human-readable summary line.
    pub summary: String,
    /// Rows read from each source.
    pub row_counts: BTreeMap<SourceKind, usize>,
}

impl From<LoadSummary> for ConsolidateResponse {
    fn from(summary: LoadSummary) -> Self {
        Self {
            summary: summary.to_string(),
            row_counts: summary.row_counts,
        }
    }
}

/// Response body of `/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateResponse {
    /// Where the payout table was written.
    pub output_path: PathBuf,
    /// Number of payout rows.
    pub row_count: usize,
    /// Column totals.
    pub totals: PayoutTotals,
    /// Each row with its audit trace.
    pub payouts: Vec<PayoutComputation>,
}

impl CalculateResponse {
    /// Builds the response from the written computations.
    pub fn new(output_path: PathBuf, payouts: Vec<PayoutComputation>) -> Self {
        let rows: Vec<_> = payouts.iter().map(|p| p.row.clone()).collect();
        Self {
            output_path,
            row_count: payouts.len(),
            totals: PayoutTotals::from_rows(&rows),
            payouts,
        }
    }
}

/// Response body of `/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    /// Where the validation report was written.
    pub output_path: PathBuf,
    /// The report rows.
    pub rows: Vec<ValidationRow>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an internal error response.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidBillingPeriod { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            EngineError::SourceNotFound { path } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "SOURCE_NOT_FOUND",
                    message,
                    format!("Expected a .zip archive or a directory holding the extracts: {}", path),
                ),
            },
            EngineError::SourceMalformed { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::new("SOURCE_MALFORMED", message),
            },
            EngineError::JoinKeyUnresolved { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::new("JOIN_KEY_UNRESOLVED", message),
            },
            EngineError::SourcesNotLoaded => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("SOURCES_NOT_LOADED", message),
            },
            EngineError::OutputWrite { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::new("OUTPUT_WRITE_ERROR", message),
            },
        }
    }
}
