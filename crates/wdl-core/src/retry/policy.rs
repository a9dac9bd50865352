//! Backoff policy: which failure kinds retry, and how long to wait.

use crate::config::RetryConfig;
use std::time::Duration;

/// Coarse failure classes that drive the retry decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect or transfer timeout.
    Timeout,
    /// Server asked us to back off (HTTP 429 or 503).
    Throttled,
    /// Connection-level failure (refused, reset, DNS).
    Connection,
    /// Other 5xx server error.
    Http5xx(u16),
    /// Everything else; retrying will not help.
    Other,
}

/// Outcome of asking the policy about one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Capped exponential backoff over a fixed attempt budget.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles each retry.
    pub base_delay: Duration,
    /// Ceiling on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Builds a policy from its config-file form.
    pub fn from_config(cfg: &RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts,
            // max(0.0) also maps NaN to zero, keeping from_secs_f64 safe.
            base_delay: Duration::from_secs_f64(cfg.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(cfg.max_delay_secs),
        }
    }

    /// Decides whether `attempt` (1-based) may be followed by another try
    /// after failing with `kind`, and how long to wait first.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        let retryable = matches!(
            kind,
            ErrorKind::Timeout | ErrorKind::Throttled | ErrorKind::Connection | ErrorKind::Http5xx(_)
        );
        if !retryable {
            return RetryDecision::NoRetry;
        }
        // base * 2^(attempt-1), shift capped so the multiplier cannot overflow.
        let factor = 1u32 << attempt.saturating_sub(1).min(8);
        let delay = self.base_delay.saturating_mul(factor).min(self.max_delay);
        RetryDecision::RetryAfter(delay)
    }
}
