//! # Middleware Module
//!
//! Rate limiting middleware for the Kering HTTP API.
//!
//! A single process-wide limiter guards every route; the store's write lock
//! already serializes mutations, so the limiter only caps total request
//! pressure. Configured via `KERING_RATE_LIMIT` (requests per second,
//! default 100, 0 to disable).

use super::types::ErrorResponse;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Default rate limit: 100 requests per second.
const DEFAULT_RPS: NonZeroU32 = NonZeroU32::new(100).unwrap();

// =============================================================================
// RATE LIMITER
// =============================================================================

/// Process-wide rate limiter shared by all routes.
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Create a rate limiter capped at `requests_per_second`.
///
/// Zero falls back to [`DEFAULT_RPS`]; disabling the limiter entirely is the
/// router's decision, not the limiter's.
pub fn create_rate_limiter(requests_per_second: u32) -> GlobalRateLimiter {
    let rps = NonZeroU32::new(requests_per_second).unwrap_or(DEFAULT_RPS);
    Arc::new(RateLimiter::direct(Quota::per_second(rps)))
}

/// Read `KERING_RATE_LIMIT`, defaulting to 100 when unset or unparseable.
pub fn get_rate_limit_from_env() -> u32 {
    std::env::var("KERING_RATE_LIMIT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(100)
}

/// Reject requests beyond the configured rate with 429 and the API's usual
/// JSON error body.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    if limiter.check().is_err() {
        tracing::warn!("rate limit exceeded, rejecting {}", request.uri().path());
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new("too many requests")),
        ));
    }
    Ok(next.run(request).await)
}

// =============================================================================
// TESTS
// =============================================================================
