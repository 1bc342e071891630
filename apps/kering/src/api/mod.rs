//! # Kering HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `POST /inspections` - Ingest a batch of inspection events (per-item results)
//! - `POST /reports` - Record one inspection evidenced by an uploaded document
//! - `GET /status/{asset_id}/{part_index}` - Recorded inspections of one part
//! - `GET /graph` - The full Turtle snapshot (for external renderers)
//! - `GET /stats` - Statement/part/inspection counts
//! - `GET /health` - Health check
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `KERING_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `KERING_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `kering::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    graph_handler, health_handler, ingest_handler, part_status_handler, report_handler,
    stats_handler,
};
#[allow(unused_imports)]
pub use types::{
    ErrorResponse, HealthResponse, IngestItem, IngestItemResult, IngestResponse, InspectionPair,
    PartStatusResponse, ReportParams, ReportResponse, StatsResponse, resolve_part_iri,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use kering_core::{FactStore, KeringError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body, covering report uploads.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the fact store.
///
/// Writers (ingest, reports) take the write guard for their whole
/// append+flush sequence; queries share read guards and observe a
/// consistent snapshot.
#[derive(Clone)]
pub struct AppState {
    /// The durable fact store.
    pub store: Arc<RwLock<FactStore>>,
}

impl AppState {
    /// Create new app state around a store.
    #[must_use]
    pub fn new(store: FactStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `KERING_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("KERING_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (KERING_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in KERING_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No KERING_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
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
/// 3. Body limit - caps report uploads
/// 4. Rate Limiting - protects against overload (if enabled)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/stats", get(handlers::stats_handler))
        .route(
            "/status/{asset_id}/{part_index}",
            get(handlers::part_status_handler),
        )
        .route("/inspections", post(handlers::ingest_handler))
        .route("/reports", post(handlers::report_handler))
        .route("/graph", get(handlers::graph_handler));

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply body limit, CORS, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, store: FactStore) -> Result<(), KeringError> {
    let state = AppState::new(store);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| KeringError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Kering HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| KeringError::Io(format!("Server error: {}", e)))
}
