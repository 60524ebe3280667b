// ============================================================================
// Resto API - Rate Limiting Middleware
// File: crates/resto-api/src/middleware/rate_limit.rs
// ============================================================================
//! Per-client-IP request quotas for the unauthenticated write endpoints

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use resto_shared::config::RateLimitSettings;
use tracing::warn;

use crate::error::ApiError;

pub type IpRateLimiter = DefaultKeyedRateLimiter<IpAddr>;

#[derive(Clone)]
pub struct RateLimiters {
    /// Login and password-reset requests
    pub login: Arc<IpRateLimiter>,
    /// Registration start and payment attempts
    pub registration: Arc<IpRateLimiter>,
    pub public_orders: Arc<IpRateLimiter>,
}

impl RateLimiters {
    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        Self {
            login: per_minute(settings.login_per_minute),
            registration: per_minute(settings.registration_per_minute),
            public_orders: per_minute(settings.public_orders_per_minute),
        }
    }

    /// Drop state of clients that are back under their quota
    pub fn retain_recent(&self) {
        self.login.retain_recent();
        self.registration.retain_recent();
        self.public_orders.retain_recent();
    }
}

pub fn per_minute(limit: u32) -> Arc<IpRateLimiter> {
    let limit = NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::keyed(Quota::per_minute(limit)))
}

pub async fn rate_limit(
    State(limiter): State<Arc<IpRateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if limiter.check_key(&ip).is_err() {
        warn!("Rate limit exceeded for {} on {}", ip, request.uri().path());
        return Err(ApiError::RateLimited);
    }

    Ok(next.run(request).await)
}
