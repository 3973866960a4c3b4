//! HTTP request handlers for the VR engine API.
//!
//! This module contains the handler functions for all API endpoints. Engine
//! operations read spreadsheets and write workbooks, so each one runs on
//! the blocking thread pool.

use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tokio::task::JoinError;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::EngineResult;

use super::request::ConsolidateRequest;
use super::response::{
    ApiError, ApiErrorResponse, CalculateResponse, ConsolidateResponse, ValidateResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/consolidate", post(consolidate_handler))
        .route("/calculate", post(calculate_handler))
        .route("/validate", post(validate_handler))
        .with_state(state)
}

/// Handler for POST /consolidate endpoint.
///
/// Accepts an optional `{ "source_location": ... }` body; without one the
/// configured data directory is loaded.
async fn consolidate_handler(State(state): State<AppState>, body: Bytes) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing consolidate request");

    let request = match parse_consolidate_request(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            return error_response(
                StatusCode::BAD_REQUEST,
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err)),
            );
        }
    };

    let start_time = Instant::now();
    let service = state.service();
    let outcome = tokio::task::spawn_blocking(move || {
        service
            .consolidate(request.source_location.as_deref())
            .map(ConsolidateResponse::from)
    })
    .await;

    respond(correlation_id, "consolidate", start_time, outcome)
}

/// Handler for POST /calculate endpoint.
///
/// Computes and writes the payout table, returning every row with its
/// audit trace.
async fn calculate_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculate request");

    let start_time = Instant::now();
    let service = state.service();
    let outcome = tokio::task::spawn_blocking(move || {
        service
            .calculate_rows()
            .map(|(path, payouts)| CalculateResponse::new(path, payouts))
    })
    .await;

    respond(correlation_id, "calculate", start_time, outcome)
}

/// Handler for POST /validate endpoint.
async fn validate_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing validate request");

    let start_time = Instant::now();
    let service = state.service();
    let outcome = tokio::task::spawn_blocking(move || {
        service
            .validate_rows()
            .map(|(output_path, rows)| ValidateResponse { output_path, rows })
    })
    .await;

    respond(correlation_id, "validate", start_time, outcome)
}

/// An empty body means "use the defaults".
fn parse_consolidate_request(body: &[u8]) -> Result<ConsolidateRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ConsolidateRequest::default());
    }
    serde_json::from_slice(body)
}

fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &str,
    start_time: Instant,
    outcome: Result<EngineResult<T>, JoinError>,
) -> Response {
    match outcome {
        Ok(Ok(body)) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                duration_ms = start_time.elapsed().as_millis(),
                "Request completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Ok(Err(err)) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request failed"
            );
            let api_error: ApiErrorResponse = err.into();
            error_response(api_error.status, api_error.error)
        }
        Err(join_error) => {
            error!(
                correlation_id = %correlation_id,
                operation,
                error = %join_error,
                "Engine task aborted"
            );
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal(format!("{} task failed", operation)),
            )
        }
    }
}

fn error_response(status: StatusCode, error: ApiError) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}
