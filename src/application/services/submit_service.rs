//! Transfer submission service
//!
//! Builds the transfer request and hands it to the wallet SDK exactly once
//! per invocation. The SDK call may block on user approval inside their
//! wallet; it is treated as a single awaitable step. A per-order in-flight
//! guard rejects concurrent re-submission of the same order.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};

use crate::application::ports::{TransferRequest, WalletConnector};
use crate::config::AppConfig;
use crate::domain::attempt::TxRef;
use crate::domain::connection::ConnectedWallet;
use crate::domain::intent::PaymentIntent;
use crate::shared::error::SubmitError;

/// Service submitting transfers through the wallet SDK
pub struct TransactionSubmitter {
    config: Arc<AppConfig>,
    wallet: Arc<dyn WalletConnector>,
    inflight: Arc<Mutex<HashSet<String>>>,
}

/// Releases the in-flight slot when the submission resolves
struct InflightGuard {
    inflight: Arc<Mutex<HashSet<String>>>,
    order_id: String,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        if let Ok(mut set) = self.inflight.lock() {
            set.remove(&self.order_id);
        }
    }
}

impl TransactionSubmitter {
    pub fn new(config: Arc<AppConfig>, wallet: Arc<dyn WalletConnector>) -> Self {
        Self {
            config,
            wallet,
            inflight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Build and submit the transfer for this intent
    ///
    /// Requires a connected wallet. Returns the SDK's transaction reference
    /// on acknowledgement; a concurrent second call for the same order is
    /// rejected with [`SubmitError::AlreadyInFlight`].
    pub async fn submit(
        &self,
        intent: &PaymentIntent,
        connection: &ConnectedWallet,
    ) -> Result<TxRef, SubmitError> {
        let _guard = {
            let mut set = self
                .inflight
                .lock()
                .map_err(|_| SubmitError::SdkError("in-flight guard poisoned".to_string()))?;
            if !set.insert(intent.order_id.clone()) {
                warn!(order_id = %intent.order_id, "Rejecting concurrent submission");
                return Err(SubmitError::AlreadyInFlight);
            }
            InflightGuard {
                inflight: self.inflight.clone(),
                order_id: intent.order_id.clone(),
            }
        };

        let request = TransferRequest {
            destination: intent.destination_address.clone(),
            amount_nano: intent.amount.as_nano(),
            valid_until: Utc::now().timestamp() + self.config.transfer.validity_seconds as i64,
        };

        info!(
            order_id = %intent.order_id,
            payer = %connection.account_address,
            destination = %request.destination,
            amount_nano = %request.amount_nano,
            "Submitting transfer to wallet"
        );

        let tx_ref = self.wallet.send_transaction(&request).await?;

        info!(
            order_id = %intent.order_id,
            tx_ref = %tx_ref,
            "Wallet acknowledged transfer"
        );
        Ok(tx_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::ConnectionError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{watch, Notify};

    /// Mock wallet whose send_transaction blocks until released
    struct BlockingWallet {
        release: Notify,
        sends: AtomicUsize,
        outcome: Result<&'static str, SubmitError>,
    }

    impl BlockingWallet {
        fn new(outcome: Result<&'static str, SubmitError>) -> Self {
            Self {
                release: Notify::new(),
                sends: AtomicUsize::new(0),
                outcome,
            }
        }
    }

    #[async_trait]
    impl WalletConnector for BlockingWallet {
        async fn open_connect_flow(&self) -> Result<(), ConnectionError> {
            Ok(())
        }

        async fn restore_session(&self) -> Result<(), ConnectionError> {
            Ok(())
        }

        fn status_changes(&self) -> watch::Receiver<Option<ConnectedWallet>> {
            let (tx, rx) = watch::channel(None);
            std::mem::forget(tx);
            rx
        }

        async fn disconnect(&self) {}

        async fn send_transaction(&self, _request: &TransferRequest) -> Result<TxRef, SubmitError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            self.outcome.clone().map(TxRef::new)
        }
    }

    fn intent() -> PaymentIntent {
        PaymentIntent::from_params(&HashMap::from([
            ("address".to_string(), "EQAbc".to_string()),
            ("orderId".to_string(), "ord-1".to_string()),
            ("amount".to_string(), "1.5".to_string()),
        ]))
        .unwrap()
    }

    fn connection() -> ConnectedWallet {
        ConnectedWallet {
            account_address: "EQPayer".to_string(),
            session_token: None,
        }
    }

    #[tokio::test]
    async fn test_successful_submission() {
        let wallet = Arc::new(BlockingWallet::new(Ok("boc123")));
        let submitter = TransactionSubmitter::new(Arc::new(AppConfig::default()), wallet.clone());

        wallet.release.notify_one();
        let tx_ref = submitter.submit(&intent(), &connection()).await.unwrap();
        assert_eq!(tx_ref.as_str(), "boc123");
        assert_eq!(wallet.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_submission_rejected() {
        let wallet = Arc::new(BlockingWallet::new(Ok("boc123")));
        let submitter = Arc::new(TransactionSubmitter::new(
            Arc::new(AppConfig::default()),
            wallet.clone(),
        ));

        let first = {
            let s = submitter.clone();
            tokio::spawn(async move { s.submit(&intent(), &connection()).await })
        };
        tokio::task::yield_now().await;
        while wallet.sends.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // Second call while the first is still blocked in the wallet
        let second = submitter.submit(&intent(), &connection()).await;
        assert_eq!(second, Err(SubmitError::AlreadyInFlight));

        wallet.release.notify_one();
        assert!(first.await.unwrap().is_ok());

        // Slot released after resolution: a fresh call reaches the SDK again
        wallet.release.notify_one();
        assert!(submitter.submit(&intent(), &connection()).await.is_ok());
        assert_eq!(wallet.sends.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rejection_maps_to_error_and_releases_slot() {
        let wallet = Arc::new(BlockingWallet::new(Err(SubmitError::Rejected)));
        let submitter = TransactionSubmitter::new(Arc::new(AppConfig::default()), wallet.clone());

        wallet.release.notify_one();
        let result = submitter.submit(&intent(), &connection()).await;
        assert_eq!(result, Err(SubmitError::Rejected));
        assert!(submitter.inflight.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_request_validity_window() {
        let config = Arc::new(AppConfig::default());
        let before = Utc::now().timestamp();
        let request = TransferRequest {
            destination: "EQAbc".to_string(),
            amount_nano: 1_500_000_000,
            valid_until: before + config.transfer.validity_seconds as i64,
        };
        assert_eq!(request.valid_until - before, 600);
    }
}
