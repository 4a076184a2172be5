//! Metrics instrumentation helpers.
//!
//! Thin wrappers over the `metrics` facade so call sites stay one-liners and
//! metric names and label keys live in one place. Consumers install whatever
//! recorder they like; without one these are no-ops.

/// Label keys and well-known label values.
pub mod labels {
    /// Label key for failure reasons.
    pub const REASON: &str = "reason";
    /// The driver rejected or failed the dial.
    pub const REASON_DRIVER: &str = "driver";
    /// Label key marking whether a close was forced.
    pub const FORCED: &str = "forced";
}

/// Counter helpers.
pub mod counters {
    use super::labels;

    /// A fresh connect attempt was started against the driver.
    pub fn connect_attempted() {
        metrics::counter!("poolgate_connect_attempts_total").increment(1);
    }

    /// A connect attempt produced a handle.
    pub fn connect_succeeded() {
        metrics::counter!("poolgate_connect_successes_total").increment(1);
    }

    /// A connect attempt failed.
    pub fn connect_failed(reason: &'static str) {
        metrics::counter!("poolgate_connect_failures_total", labels::REASON => reason)
            .increment(1);
    }

    /// A caller joined an attempt that was already in flight instead of
    /// dialing its own.
    pub fn connect_joined() {
        metrics::counter!("poolgate_connect_joins_total").increment(1);
    }

    /// A caller was served the stored handle without touching the driver.
    pub fn handle_reused() {
        metrics::counter!("poolgate_handle_reuse_total").increment(1);
    }

    /// The stored handle was released.
    pub fn pool_closed(forced: bool) {
        let forced = if forced { "true" } else { "false" };
        metrics::counter!("poolgate_pool_closes_total", labels::FORCED => forced).increment(1);
    }

    /// The driver reported a failure while releasing a handle.
    pub fn close_failed() {
        metrics::counter!("poolgate_close_failures_total").increment(1);
    }
}

/// Histogram helpers.
pub mod histograms {
    /// Wall-clock duration of a driver connect, in milliseconds.
    pub fn connect_duration(millis: u64) {
        metrics::histogram!("poolgate_connect_duration_ms").record(millis as f64);
    }
}
