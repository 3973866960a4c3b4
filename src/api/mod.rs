//! HTTP API module for the VR engine.
//!
//! This module exposes the three engine operations as REST endpoints:
//! `POST /consolidate`, `POST /calculate` and `POST /validate`.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::ConsolidateRequest;
pub use response::{
    ApiError, ApiErrorResponse, CalculateResponse, ConsolidateResponse, ValidateResponse,
};
pub use state::AppState;
