//! Logging utilities module
//!
//! Centralized tracing initialization plus structured helpers for payment
//! lifecycle events.

use tracing::{error, info, warn};

/// Logging utilities for the application
pub struct LoggingUtils;

impl LoggingUtils {
    /// Initialize logging with the specified configuration
    pub fn initialize(level: &str) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level));

        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| crate::shared::error::AppError::Internal(format!("Failed to initialize logging: {}", e)))?;

        Ok(())
    }

    /// Log a payment lifecycle transition
    pub fn log_attempt_transition(order_id: &str, from: &str, to: &str) {
        info!(
            order_id = %order_id,
            from = %from,
            to = %to,
            "Payment attempt transition"
        );
    }

    /// Log a terminal report delivery
    pub fn log_report(order_id: &str, status: &str, tx_ref: Option<&str>) {
        info!(
            order_id = %order_id,
            status = %status,
            tx_ref = tx_ref,
            "Terminal payment report delivered"
        );
    }

    /// Log a best-effort delivery failure; never escalated to the user
    pub fn log_delivery_failure(order_id: &str, channel: &str, reason: &str) {
        warn!(
            order_id = %order_id,
            channel = %channel,
            reason = %reason,
            "Report delivery failed"
        );
    }

    /// Log an unrecoverable stage failure
    pub fn log_stage_failure(order_id: &str, stage: &str, error: &str) {
        error!(
            order_id = %order_id,
            stage = %stage,
            error = %error,
            "Payment stage failed"
        );
    }
}
