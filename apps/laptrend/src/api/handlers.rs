//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        BucketResponse, ErrorResponse, HealthResponse, ProgressQuery, ProgressResponse,
        StatusResponse, parse_score,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use laptrend_core::{DriverId, LaptrendError, compute_progress};

/// Map an engine error to its HTTP status and `{error}` body.
fn error_response(e: &LaptrendError) -> Response {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse::from(e))).into_response()
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Number of sessions visible to the engine.
pub async fn status_handler(State(state): State<AppState>) -> Response {
    match state.source.session_count() {
        Ok(session_count) => (StatusCode::OK, Json(StatusResponse { session_count })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Session count failed");
            error_response(&e)
        }
    }
}

// =============================================================================
// BUCKET HANDLER
// =============================================================================

/// Classify a 0-100 score into its qualitative bucket.
pub async fn bucket_handler(Path(raw): Path<String>) -> Response {
    match parse_score(&raw) {
        Ok(score) => (StatusCode::OK, Json(BucketResponse::for_score(score))).into_response(),
        Err(e) => error_response(&e),
    }
}

// =============================================================================
// PROGRESS HANDLER
// =============================================================================

/// Compute a driver's progress summary.
///
/// Filters are validated before the session source is touched, so a
/// malformed request never reaches storage.
pub async fn progress_handler(
    State(state): State<AppState>,
    Path(driver): Path<String>,
    Query(query): Query<ProgressQuery>,
) -> Response {
    let driver_id = DriverId::new(driver.trim());

    let mode = match query.to_mode() {
        Ok(mode) => mode,
        Err(e) => {
            tracing::debug!(driver = %driver_id.as_str(), error = %e, "Rejected progress filter");
            return error_response(&e);
        }
    };

    match compute_progress(state.source.as_ref(), &driver_id, &mode) {
        Ok(result) => {
            tracing::debug!(
                driver = %driver_id.as_str(),
                mode = %result.mode,
                entries = result.entries.len(),
                "Progress computed"
            );
            let response = ProgressResponse::new(&driver_id, &mode, &result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            if e.is_client_error() {
                tracing::debug!(driver = %driver_id.as_str(), error = %e, "Rejected progress request");
            } else {
                tracing::error!(driver = %driver_id.as_str(), error = %e, "Progress computation failed");
            }
            error_response(&e)
        }
    }
}
