//! Use cases - payment flow orchestration
//!
//! `ProcessPaymentUseCase` drives a user-initiated send from a validated
//! intent and an established wallet connection through submission, the
//! policy-gated verification stage, and terminal reporting.
//!
//! Connection failures surface to the caller as errors without consuming the
//! order id, so the user can retry the handshake. Once a transfer has been
//! handed to the wallet, every outcome ends in exactly one terminal report.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::services::connection_service::ConnectionController;
use crate::application::services::report_service::ResultReporter;
use crate::application::services::submit_service::TransactionSubmitter;
use crate::application::services::verify_service::TransactionVerifier;
use crate::domain::attempt::{AttemptStatus, PaymentAttempt};
use crate::domain::intent::PaymentIntent;
use crate::shared::error::{AppError, AppResult, SubmitError};
use crate::shared::logging::LoggingUtils;
use crate::shared::metrics::MetricsUtils;

/// Use case for processing one payment attempt end to end
pub struct ProcessPaymentUseCase {
    connection: Arc<ConnectionController>,
    submitter: Arc<TransactionSubmitter>,
    verifier: Arc<TransactionVerifier>,
    reporter: Arc<ResultReporter>,
    metrics: Arc<MetricsUtils>,
}

impl ProcessPaymentUseCase {
    pub fn new(
        connection: Arc<ConnectionController>,
        submitter: Arc<TransactionSubmitter>,
        verifier: Arc<TransactionVerifier>,
        reporter: Arc<ResultReporter>,
        metrics: Arc<MetricsUtils>,
    ) -> Self {
        Self {
            connection,
            submitter,
            verifier,
            reporter,
            metrics,
        }
    }

    /// Execute the payment flow for a validated intent
    ///
    /// Returns the attempt in its final state. Connection errors and a
    /// retry tap that finds a submission already in flight are returned
    /// directly without a terminal report; submission and verification
    /// failures are reported terminally before returning the failed attempt.
    pub async fn execute(&self, intent: PaymentIntent) -> AppResult<PaymentAttempt> {
        self.metrics.increment_attempts_started();
        let mut attempt = PaymentAttempt::new(intent);
        info!(order_id = %attempt.intent.order_id, "Payment attempt started");

        let wallet = self.connection.connect().await.map_err(|e| {
            warn!(order_id = %attempt.intent.order_id, error = %e, "Wallet connection unavailable");
            AppError::Validation(format!("wallet connection failed: {}", e))
        })?;

        let tx_ref = match self.submitter.submit(&attempt.intent, &wallet).await {
            Ok(tx_ref) => tx_ref,
            Err(SubmitError::AlreadyInFlight) => {
                // A retry tap while the first submission is still blocked in
                // the wallet prompt. The in-flight attempt owns the terminal
                // outcome; this call must not fail it or consume the order id.
                warn!(order_id = %attempt.intent.order_id, "Submission already in flight, ignoring retry");
                return Err(AppError::Validation(SubmitError::AlreadyInFlight.to_string()));
            }
            Err(e) => {
                LoggingUtils::log_stage_failure(&attempt.intent.order_id, "submit", &e.to_string());
                attempt.advance(AttemptStatus::Failed { error_kind: e.to_string() })?;
                self.reporter.report(&mut attempt).await?;
                return Ok(attempt);
            }
        };
        self.metrics.increment_transfers_submitted();
        attempt.advance(AttemptStatus::Submitted { tx_ref: tx_ref.clone() })?;

        if self.verifier.is_enabled() {
            match self
                .verifier
                .verify(&tx_ref, &attempt.intent, &wallet.account_address)
                .await
            {
                Ok(()) => {
                    self.metrics.increment_transfers_verified();
                    attempt.advance(AttemptStatus::Verified { tx_ref })?;
                }
                Err(e) => {
                    // The transfer was submitted; it may have landed on-chain
                    // even though verification failed
                    LoggingUtils::log_stage_failure(&attempt.intent.order_id, "verify", &e.to_string());
                    attempt.advance(AttemptStatus::Failed {
                        error_kind: format!("verification failed after submission: {}", e),
                    })?;
                    self.reporter.report(&mut attempt).await?;
                    return Ok(attempt);
                }
            }
        }

        self.reporter.report(&mut attempt).await?;
        Ok(attempt)
    }
}
