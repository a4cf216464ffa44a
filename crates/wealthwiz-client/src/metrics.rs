//! Client-side request metrics
//!
//! Recorded through the `metrics` facade; they are no-ops unless the host
//! process installs a recorder.
//!
//! - `wealthwiz_requests_total` (counter): labels `method`, `status`
//! - `wealthwiz_network_errors_total` (counter): label `method`
//! - `wealthwiz_token_refresh_total` (counter): label `outcome`

/// Record a completed network call.
pub fn record_request(method: &str, status: u16) {
    metrics::counter!(
        "wealthwiz_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a call that failed before a response arrived.
pub fn record_network_error(method: &str) {
    metrics::counter!("wealthwiz_network_errors_total", "method" => method.to_string())
        .increment(1);
}

/// Record a token refresh attempt.
pub fn record_refresh(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("wealthwiz_token_refresh_total", "outcome" => outcome).increment(1);
}
