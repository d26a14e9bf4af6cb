//! Rate limiting middleware
//!
//! Keeps a per-account token bucket for registration attempts so a single
//! account cannot hammer the registration transaction.

use std::num::NonZeroU32;

use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use tracing::{debug, warn};

use crate::config::RateLimitConfig;
use crate::utils::errors::{PortalError, Result};

type KeyedLimiter = RateLimiter<i64, DefaultKeyedStateStore<i64>, DefaultClock>;

const CLEANUP_THRESHOLD: usize = 10_000;

pub struct RegistrationRateLimiter {
    limiter: KeyedLimiter,
}

impl RegistrationRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Result<Self> {
        let per_minute = NonZeroU32::new(config.registrations_per_minute)
            .ok_or_else(|| PortalError::Config("registrations_per_minute must be greater than 0".to_string()))?;
        let burst = NonZeroU32::new(config.burst)
            .ok_or_else(|| PortalError::Config("burst must be greater than 0".to_string()))?;

        let quota = Quota::per_minute(per_minute).allow_burst(burst);
        Ok(Self {
            limiter: RateLimiter::keyed(quota),
        })
    }

    /// Consume one attempt for the account
    pub fn check(&self, account_id: i64) -> Result<()> {
        if self.tracked_accounts() > CLEANUP_THRESHOLD {
            self.cleanup();
        }

        match self.limiter.check_key(&account_id) {
            Ok(()) => {
                debug!(account_id = account_id, "Rate limit check passed");
                Ok(())
            }
            Err(_) => {
                warn!(account_id = account_id, "Registration rate limit exceeded");
                Err(PortalError::RateLimitExceeded)
            }
        }
    }

    /// Drop buckets that have fully refilled
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    pub fn tracked_accounts(&self) -> usize {
        self.limiter.len()
    }
}

impl std::fmt::Debug for RegistrationRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRateLimiter")
            .field("tracked_accounts", &self.tracked_accounts())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn limiter(burst: u32) -> RegistrationRateLimiter {
        RegistrationRateLimiter::new(&RateLimitConfig {
            registrations_per_minute: 1,
            burst,
        })
        .unwrap()
    }

    #[test]
    fn burst_is_allowed_then_limited() {
        let limiter = limiter(2);
        assert!(limiter.check(1).is_ok());
        assert!(limiter.check(1).is_ok());
        assert_matches!(limiter.check(1), Err(PortalError::RateLimitExceeded));
    }

    #[test]
    fn accounts_are_limited_independently() {
        let limiter = limiter(1);
        assert!(limiter.check(1).is_ok());
        assert!(limiter.check(2).is_ok());
        assert!(limiter.check(1).is_err());
        assert_eq!(limiter.tracked_accounts(), 2);
    }

    #[test]
    fn zero_quota_is_a_config_error() {
        let result = RegistrationRateLimiter::new(&RateLimitConfig {
            registrations_per_minute: 0,
            burst: 1,
        });
        assert_matches!(result, Err(PortalError::Config(_)));
    }
}
