//! Terminal result reporting
//!
//! Delivers the outcome of a payment attempt exactly once per order id:
//! first to the host chrome's outbound data channel, then to the external
//! callback URL when one was supplied at launch. The two channels are
//! independent and best-effort; a delivery failure on either is logged and
//! never escalated. Success schedules app close after a short delay so the
//! user can read the final state; failure leaves the app open.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};

use crate::application::ports::ChromeSink;
use crate::config::{AppConfig, SuccessCriterion};
use crate::domain::attempt::{AttemptStatus, PaymentAttempt};
use crate::infrastructure::adapters::callback_client::CallbackClient;
use crate::shared::error::{AppError, AppResult};
use crate::shared::logging::LoggingUtils;
use crate::shared::metrics::MetricsUtils;

/// Outcome of a report call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportDisposition {
    /// The terminal event was delivered
    Delivered,
    /// This order id was already reported; nothing was sent
    Duplicate,
}

/// Service owning at-most-once terminal reporting
pub struct ResultReporter {
    config: Arc<AppConfig>,
    chrome: Arc<dyn ChromeSink>,
    callback: Arc<CallbackClient>,
    metrics: Arc<MetricsUtils>,
    reported: Mutex<HashSet<String>>,
}

impl ResultReporter {
    pub fn new(
        config: Arc<AppConfig>,
        chrome: Arc<dyn ChromeSink>,
        callback: Arc<CallbackClient>,
        metrics: Arc<MetricsUtils>,
    ) -> Self {
        Self {
            config,
            chrome,
            callback,
            metrics,
            reported: Mutex::new(HashSet::new()),
        }
    }

    /// Report the attempt's terminal outcome
    ///
    /// A second call for an already-reported order id is a logged no-op. The
    /// attempt moves to `Reported` on delivery.
    pub async fn report(&self, attempt: &mut PaymentAttempt) -> AppResult<ReportDisposition> {
        let order_id = attempt.intent.order_id.clone();
        let (payload, callback_body, success) = self.build_payloads(attempt)?;

        {
            let mut reported = self
                .reported
                .lock()
                .map_err(|_| AppError::Internal("reported set poisoned".to_string()))?;
            if !reported.insert(order_id.clone()) {
                debug!(order_id = %order_id, "Duplicate terminal report suppressed");
                self.metrics.increment_reports_suppressed();
                return Ok(ReportDisposition::Duplicate);
            }
        }

        if let Err(e) = self.chrome.send_data(payload).await {
            LoggingUtils::log_delivery_failure(&order_id, "chrome", &e.to_string());
            self.metrics.increment_delivery_failures();
        }

        if let Some(url) = attempt.intent.callback_url.clone() {
            if let Err(e) = self.callback.deliver(&url, callback_body).await {
                LoggingUtils::log_delivery_failure(&order_id, "callback", &e.to_string());
                self.metrics.increment_delivery_failures();
            }
        }

        let status = if success { "success" } else { "failed" };
        LoggingUtils::log_report(&order_id, status, attempt.tx_ref().map(|t| t.as_str()));
        self.metrics.increment_reports_delivered();
        attempt.advance(AttemptStatus::Reported)?;

        if success {
            self.schedule_close();
        }
        Ok(ReportDisposition::Delivered)
    }

    /// Build the chrome payload and the richer callback body
    fn build_payloads(
        &self,
        attempt: &PaymentAttempt,
    ) -> AppResult<(serde_json::Value, serde_json::Value, bool)> {
        let intent = &attempt.intent;
        let (detail, success) = match &attempt.status {
            AttemptStatus::Verified { tx_ref } => (Some(tx_ref.as_str().to_string()), true),
            AttemptStatus::Submitted { tx_ref } => {
                if self.config.reporting.success_on == SuccessCriterion::Verified {
                    return Err(AppError::Validation(
                        "attempt is submitted but policy requires verification before reporting success"
                            .to_string(),
                    ));
                }
                (Some(tx_ref.as_str().to_string()), true)
            }
            AttemptStatus::Failed { error_kind } => (Some(error_kind.clone()), false),
            AttemptStatus::Pending | AttemptStatus::Reported => {
                return Err(AppError::Validation(format!(
                    "attempt in state {} has no terminal outcome to report",
                    attempt.status.label()
                )));
            }
        };

        let payload = if success {
            let mut payload = serde_json::json!({
                "status": "success",
                "orderId": intent.order_id,
                "txHash": detail,
                "amount": intent.amount.to_major_units(),
                "productName": intent.product_name,
            });
            if let Some(epin) = &intent.epin {
                payload["epin"] = serde_json::json!(epin);
            }
            payload
        } else {
            serde_json::json!({
                "status": "failed",
                "orderId": intent.order_id,
                "error": detail,
            })
        };

        let mut callback_body = payload.clone();
        callback_body["amount"] = serde_json::json!(intent.amount.to_major_units());
        callback_body["address"] = serde_json::json!(intent.destination_address);

        Ok((payload, callback_body, success))
    }

    fn schedule_close(&self) {
        let delay = Duration::from_secs(self.config.reporting.close_delay_seconds);
        let chrome = self.chrome.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!("Closing app after success report");
            chrome.close().await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attempt::TxRef;
    use crate::domain::intent::PaymentIntent;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingChrome {
        sent: Mutex<Vec<serde_json::Value>>,
        closes: AtomicUsize,
        fail_sends: bool,
    }

    impl RecordingChrome {
        fn new(fail_sends: bool) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                closes: AtomicUsize::new(0),
                fail_sends,
            }
        }
    }

    #[async_trait]
    impl ChromeSink for RecordingChrome {
        async fn send_data(&self, payload: serde_json::Value) -> AppResult<()> {
            if self.fail_sends {
                return Err(AppError::Http("data channel unavailable".to_string()));
            }
            self.sent.lock().unwrap().push(payload);
            Ok(())
        }

        async fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn intent() -> PaymentIntent {
        PaymentIntent::from_params(&HashMap::from([
            ("address".to_string(), "EQAbc".to_string()),
            ("orderId".to_string(), "ord-1".to_string()),
            ("amount".to_string(), "2".to_string()),
            ("productName".to_string(), "Widget".to_string()),
        ]))
        .unwrap()
    }

    fn reporter(chrome: Arc<RecordingChrome>, config: Arc<AppConfig>) -> ResultReporter {
        let callback = Arc::new(CallbackClient::new(config.clone()).unwrap());
        ResultReporter::new(config, chrome, callback, Arc::new(MetricsUtils::new()))
    }

    fn submitted_attempt() -> PaymentAttempt {
        let mut attempt = PaymentAttempt::new(intent());
        attempt
            .advance(AttemptStatus::Submitted { tx_ref: TxRef::new("boc123") })
            .unwrap();
        attempt
    }

    #[tokio::test]
    async fn test_success_report_payload() {
        let chrome = Arc::new(RecordingChrome::new(false));
        let reporter = reporter(chrome.clone(), Arc::new(AppConfig::default()));

        let mut attempt = submitted_attempt();
        let disposition = reporter.report(&mut attempt).await.unwrap();
        assert_eq!(disposition, ReportDisposition::Delivered);
        assert!(attempt.is_terminal());

        let sent = chrome.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["status"], "success");
        assert_eq!(sent[0]["orderId"], "ord-1");
        assert_eq!(sent[0]["txHash"], "boc123");
    }

    #[tokio::test]
    async fn test_duplicate_report_is_suppressed() {
        let chrome = Arc::new(RecordingChrome::new(false));
        let config = Arc::new(AppConfig::default());
        let reporter = reporter(chrome.clone(), config);

        let mut attempt = submitted_attempt();
        reporter.report(&mut attempt).await.unwrap();

        // Second report for the same order id, via a fresh attempt with a
        // different payload
        let mut second = PaymentAttempt::new(intent());
        second
            .advance(AttemptStatus::Failed { error_kind: "late failure".to_string() })
            .unwrap();
        let disposition = reporter.report(&mut second).await.unwrap();
        assert_eq!(disposition, ReportDisposition::Duplicate);
        assert_eq!(chrome.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_schedules_close() {
        let chrome = Arc::new(RecordingChrome::new(false));
        let reporter = reporter(chrome.clone(), Arc::new(AppConfig::default()));

        let mut attempt = submitted_attempt();
        reporter.report(&mut attempt).await.unwrap();
        assert_eq!(chrome.closes.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(chrome.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_report_does_not_close() {
        let chrome = Arc::new(RecordingChrome::new(false));
        let reporter = reporter(chrome.clone(), Arc::new(AppConfig::default()));

        let mut attempt = PaymentAttempt::new(intent());
        attempt
            .advance(AttemptStatus::Failed { error_kind: "rejected".to_string() })
            .unwrap();
        reporter.report(&mut attempt).await.unwrap();

        let sent = chrome.sent.lock().unwrap();
        assert_eq!(sent[0]["status"], "failed");
        assert_eq!(sent[0]["error"], "rejected");
        drop(sent);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(chrome.closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_chrome_failure_does_not_escalate() {
        let chrome = Arc::new(RecordingChrome::new(true));
        let reporter = reporter(chrome, Arc::new(AppConfig::default()));

        let mut attempt = submitted_attempt();
        let disposition = reporter.report(&mut attempt).await.unwrap();
        assert_eq!(disposition, ReportDisposition::Delivered);
        assert!(attempt.is_terminal());
    }

    #[tokio::test]
    async fn test_pending_attempt_is_not_reportable() {
        let chrome = Arc::new(RecordingChrome::new(false));
        let reporter = reporter(chrome.clone(), Arc::new(AppConfig::default()));

        let mut attempt = PaymentAttempt::new(intent());
        assert!(reporter.report(&mut attempt).await.is_err());
        // The failed call must not consume the order id
        attempt
            .advance(AttemptStatus::Submitted { tx_ref: TxRef::new("boc123") })
            .unwrap();
        assert_eq!(
            reporter.report(&mut attempt).await.unwrap(),
            ReportDisposition::Delivered
        );
    }

    #[tokio::test]
    async fn test_submitted_under_verified_policy_rejected() {
        let chrome = Arc::new(RecordingChrome::new(false));
        let mut config = AppConfig::default();
        config.reporting.success_on = SuccessCriterion::Verified;
        let reporter = reporter(chrome, Arc::new(config));

        let mut attempt = submitted_attempt();
        assert!(reporter.report(&mut attempt).await.is_err());
    }
}
