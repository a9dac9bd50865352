//! Retry with capped exponential backoff for transient fetch failures.
//!
//! Splits the problem the usual way: classify an error into a coarse kind,
//! ask the policy whether that kind deserves another attempt, and sleep the
//! decided delay before trying again.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
