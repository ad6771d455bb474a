//! HTTP Client Factory
//!
//! Builds the reqwest client used for backend round trips. The timeout is
//! the pipeline's only retry budget: a request that exceeds it is reported
//! as a failure, never silently retried.

use std::time::Duration;

/// Build a `reqwest::Client` with a bounded per-request timeout.
///
/// Falls back to a default client if the builder fails (which only happens
/// with broken TLS backends); the fallback still honors reqwest's defaults.
pub fn build_http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
