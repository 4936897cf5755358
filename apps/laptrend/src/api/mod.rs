//! # Laptrend HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /drivers/{driverId}/progress-summary` - Driver progress narrative
//! - `GET /scores/{score}/bucket` - Qualitative bucket of a 0-100 score
//! - `GET /status` - Session store status
//! - `GET /health` - Health check
//!
//! ## Configuration
//!
//! - `[http] cors_origins` / `LAPTREND_CORS_ORIGINS`: allowed origins, or "*" for all (default: localhost only)
//! - `[http] rate_limit` / `LAPTREND_RATE_LIMIT`: requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use handlers::{bucket_handler, health_handler, progress_handler, status_handler};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    BucketResponse, DateRangeJson, ErrorResponse, HealthResponse, ProgressEntryJson,
    ProgressQuery, ProgressResponse, StatusResponse, SummaryJson, parse_score,
};

use crate::config::HttpConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::get,
};
use laptrend_core::{LaptrendError, SessionSource};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the read-only session source.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn SessionSource>,
}

impl AppState {
    #[must_use]
    pub fn new<S: SessionSource + 'static>(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origin list.
///
/// - `["*"]`: allows all origins
/// - `None`: localhost only
/// - otherwise: the listed origins; invalid entries are dropped
fn build_cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some([only]) if only == "*" => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", origin);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - global quota (if enabled)
pub fn create_router(state: AppState, http: &HttpConfig) -> Router {
    let cors = build_cors_layer(http.cors_origins.as_deref());

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/scores/{score}/bucket", get(handlers::bucket_handler))
        .route(
            "/drivers/{driver_id}/progress-summary",
            get(handlers::progress_handler),
        );

    if http.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", http.rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(http.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Bind `addr` and serve until the process is stopped.
pub async fn run_server(addr: &str, state: AppState, http: &HttpConfig) -> Result<(), LaptrendError> {
    let router = create_router(state, http);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| LaptrendError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Laptrend HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LaptrendError::IoError(format!("Server error: {}", e)))
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
