//! Rate-limit probe data and the governor that waits out an exhausted quota.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::{Duration, sleep};
use tracing::{debug, warn};

/// Selection set appended to every outgoing query.
pub const RATE_LIMIT_SELECTION: &str = "rateLimit {\n    limit\n    cost\n    remaining\n    resetAt\n  }";

/// Name of the probe field in the response `data` object.
pub const RATE_LIMIT_FIELD: &str = "rateLimit";

/// GitHub's report of the caller's GraphQL budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    pub limit: i64,
    pub cost: i64,
    pub remaining: i64,
    pub reset_at: DateTime<Utc>,
}

impl RateLimit {
    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0
    }

    /// How long a caller must wait at `now` before the budget refills.
    ///
    /// Zero while quota remains, and zero when `reset_at` is already in the past.
    pub fn wait_duration(&self, now: DateTime<Utc>) -> Duration {
        if !self.is_exhausted() {
            return Duration::ZERO;
        }
        (self.reset_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Suspends a call whose response reported an exhausted quota.
///
/// Each call governs itself: there is no shared state between calls, so two
/// calls that both observe exhaustion wait independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitGovernor;

impl RateLimitGovernor {
    pub fn new() -> Self {
        Self
    }

    /// Waits until `rate_limit.reset_at` if the quota is exhausted.
    pub async fn govern(&self, rate_limit: Option<&RateLimit>) {
        self.govern_at(rate_limit, Utc::now()).await
    }

    /// Same as [`Self::govern`] with an explicit notion of "now".
    pub async fn govern_at(&self, rate_limit: Option<&RateLimit>, now: DateTime<Utc>) {
        let Some(rate_limit) = rate_limit else {
            debug!("No rateLimit in response, skipping rate-limit governance");
            return;
        };

        if !rate_limit.is_exhausted() {
            return;
        }

        let wait = rate_limit.wait_duration(now);
        warn!(
            limit = rate_limit.limit,
            cost = rate_limit.cost,
            remaining = rate_limit.remaining,
            reset_at = %rate_limit.reset_at,
            "GraphQL rate limit exhausted, waiting {:?} for reset",
            wait
        );

        if !wait.is_zero() {
            sleep(wait).await;
        }
        debug!("Rate limit wait finished");
    }
}
