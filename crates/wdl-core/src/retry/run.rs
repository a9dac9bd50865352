//! Drives a fallible fetch under a retry policy.

use super::classify::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::fetch::FetchError;

/// Runs `op` until it succeeds or the policy gives up, sleeping the decided
/// delay between attempts. Returns the last error when retries exhaust.
pub fn run_with_retry<T>(
    policy: &RetryPolicy,
    mut op: impl FnMut() -> Result<T, FetchError>,
) -> Result<T, FetchError> {
    let mut attempt = 1u32;
    loop {
        let err = match op() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        let kind = classify(&err);
        match policy.decide(attempt, kind) {
            RetryDecision::NoRetry => return Err(err),
            RetryDecision::RetryAfter(delay) => {
                tracing::warn!(
                    "attempt {} failed ({}), retrying in {:?}",
                    attempt,
                    err,
                    delay
                );
                std::thread::sleep(delay);
                attempt += 1;
            }
        }
    }
}
