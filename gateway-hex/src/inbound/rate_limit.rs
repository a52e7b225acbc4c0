//! Rate limiting middleware using Governor.
//!
//! Implements per-API-key rate limiting with a token bucket algorithm.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde_json::json;
use std::{num::NonZeroU32, sync::Arc, time::Duration};

use super::auth::extract_api_key;

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// Per-key rate limiters
    limiters: DashMap<String, Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
    /// Default quota for new keys
    quota: Quota,
    period: Duration,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(60))
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state.
    ///
    /// # Arguments
    /// * `requests` - Number of requests allowed per period (at least 1)
    /// * `period` - Time period for the quota
    pub fn new(requests: u32, period: Duration) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        // One token comes back every `period / requests`.
        let quota = Quota::with_period(period / burst.get())
            .map(|q| q.allow_burst(burst))
            .unwrap_or_else(|| Quota::per_minute(burst));

        Self {
            limiters: DashMap::new(),
            quota,
            period,
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        let limiter = self
            .limiters
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(RateLimiter::direct(self.quota)))
            .clone();

        limiter.check().is_ok()
    }

    pub fn retry_after(&self) -> u64 {
        self.period.as_secs().max(1)
    }
}

/// Rate limiting middleware.
/// Runs after authentication, so the key it buckets on has been accepted.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = extract_api_key(
        request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok()),
    )
    .unwrap_or("anonymous")
    .to_string();

    if !limiter.check(&key) {
        tracing::warn!("rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "kind": "RATE_LIMITED",
                "code": 429,
                "retry_after_seconds": limiter.retry_after()
            })),
        )
            .into_response();
    }

    next.run(request).await
}
