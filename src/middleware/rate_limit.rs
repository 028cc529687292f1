//! Rate limiting middleware
//!
//! Process-wide limiter for mutating backend routes, backed by governor's
//! direct rate limiter. Disabled limiters admit every request.

use crate::config::AppConfig;
use crate::shared::error::{AppError, AppResult};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

pub struct RateLimitMiddleware {
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl RateLimitMiddleware {
    pub fn new(config: &AppConfig) -> Self {
        let limiter = if config.rate_limit.enabled {
            NonZeroU32::new(config.rate_limit.requests_per_minute)
                .map(|rpm| Arc::new(RateLimiter::direct(Quota::per_minute(rpm))))
        } else {
            None
        };

        Self { limiter }
    }

    /// Check whether the current request is admitted
    pub fn check(&self) -> AppResult<()> {
        match &self.limiter {
            Some(limiter) if limiter.check().is_err() => Err(AppError::RateLimit),
            _ => Ok(()),
        }
    }
}
