//! Metrics utilities module
//!
//! Process-local counters for the payment lifecycle, snapshotted on the
//! health endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use serde::{Deserialize, Serialize};

/// Metrics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    /// Payment attempts started
    pub attempts_started: u64,

    /// Transfers acknowledged by the wallet SDK
    pub transfers_submitted: u64,

    /// Attempts that passed on-chain verification
    pub transfers_verified: u64,

    /// Terminal reports delivered (success or failure)
    pub reports_delivered: u64,

    /// Duplicate reports suppressed by the idempotency guard
    pub reports_suppressed: u64,

    /// Best-effort delivery failures (webhook or chrome channel)
    pub delivery_failures: u64,

    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Metrics collector for the application
pub struct MetricsUtils {
    attempts_started: AtomicU64,
    transfers_submitted: AtomicU64,
    transfers_verified: AtomicU64,
    reports_delivered: AtomicU64,
    reports_suppressed: AtomicU64,
    delivery_failures: AtomicU64,
    start_time: SystemTime,
}

impl MetricsUtils {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            attempts_started: AtomicU64::new(0),
            transfers_submitted: AtomicU64::new(0),
            transfers_verified: AtomicU64::new(0),
            reports_delivered: AtomicU64::new(0),
            reports_suppressed: AtomicU64::new(0),
            delivery_failures: AtomicU64::new(0),
            start_time: SystemTime::now(),
        }
    }

    pub fn increment_attempts_started(&self) {
        self.attempts_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_transfers_submitted(&self) {
        self.transfers_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_transfers_verified(&self) {
        self.transfers_verified.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reports_delivered(&self) {
        self.reports_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reports_suppressed(&self) {
        self.reports_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_delivery_failures(&self) {
        self.delivery_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics
    pub fn get_metrics(&self) -> Metrics {
        Metrics {
            attempts_started: self.attempts_started.load(Ordering::Relaxed),
            transfers_submitted: self.transfers_submitted.load(Ordering::Relaxed),
            transfers_verified: self.transfers_verified.load(Ordering::Relaxed),
            reports_delivered: self.reports_delivered.load(Ordering::Relaxed),
            reports_suppressed: self.reports_suppressed.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            uptime_seconds: self
                .start_time
                .elapsed()
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        }
    }
}

impl Default for MetricsUtils {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = MetricsUtils::new();
        metrics.increment_attempts_started();
        metrics.increment_attempts_started();
        metrics.increment_reports_delivered();
        metrics.increment_reports_suppressed();

        let snapshot = metrics.get_metrics();
        assert_eq!(snapshot.attempts_started, 2);
        assert_eq!(snapshot.reports_delivered, 1);
        assert_eq!(snapshot.reports_suppressed, 1);
        assert_eq!(snapshot.delivery_failures, 0);
    }
}
