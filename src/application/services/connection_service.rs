//! Wallet connection controller
//!
//! Owns the connection lifecycle state machine. Connection completion is
//! awaited on the SDK's status subscription raced against a wall-clock
//! timeout; there is no polling and no automatic retry loop. Concurrent
//! `connect` calls join the in-flight attempt through a shared future, and a
//! superseded attempt's late result is discarded by generation check rather
//! than double-applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::application::ports::WalletConnector;
use crate::config::AppConfig;
use crate::domain::connection::{ConnectedWallet, ConnectionState};
use crate::infrastructure::adapters::session_store::SessionStore;
use crate::shared::error::ConnectionError;

type ConnectFuture = Shared<BoxFuture<'static, Result<ConnectedWallet, ConnectionError>>>;

struct Inflight {
    future: ConnectFuture,
    generation: u64,
}

struct Inner {
    wallet: Arc<dyn WalletConnector>,
    session_store: SessionStore,
    state_tx: watch::Sender<ConnectionState>,
    inflight: Mutex<Option<Inflight>>,
    next_generation: AtomicU64,
}

/// Controller owning the wallet connection lifecycle
pub struct ConnectionController {
    config: Arc<AppConfig>,
    inner: Arc<Inner>,
}

impl ConnectionController {
    pub fn new(config: Arc<AppConfig>, wallet: Arc<dyn WalletConnector>, session_store: SessionStore) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            inner: Arc::new(Inner {
                wallet,
                session_store,
                state_tx,
                inflight: Mutex::new(None),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.inner.state_tx.borrow().clone()
    }

    /// Subscribe to connection state changes
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state_tx.subscribe()
    }

    /// On startup: if a fresh connection hint exists, attempt a silent
    /// reconnect. Failure clears the hint and falls back to `Disconnected`;
    /// it is logged, never surfaced as an error.
    pub async fn restore_if_hinted(&self) {
        let Some(hint) = self.inner.session_store.fresh().await else {
            debug!("No fresh connection hint, starting disconnected");
            return;
        };
        info!(address = ?hint.address, "Fresh connection hint found, attempting silent restore");

        let timeout = Duration::from_secs(self.config.connection.restore_timeout_seconds);
        match self.connect_inner(timeout, true, false).await {
            Ok(wallet) => {
                info!(address = %wallet.account_address, "Wallet session restored");
            }
            Err(e) => {
                debug!(error = %e, "Silent restore failed, clearing hint");
            }
        }
    }

    /// Establish a wallet connection
    ///
    /// No-op when already connected; joins the in-flight attempt when one
    /// exists. Otherwise opens the wallet connection flow and waits for the
    /// status subscription to report a wallet, bounded by the configured
    /// timeout.
    pub async fn connect(&self) -> Result<ConnectedWallet, ConnectionError> {
        let timeout = Duration::from_secs(self.config.connection.timeout_seconds);
        self.connect_inner(timeout, false, false).await
    }

    /// Cancel any in-flight attempt and start fresh
    pub async fn connect_superseding(&self) -> Result<ConnectedWallet, ConnectionError> {
        let timeout = Duration::from_secs(self.config.connection.timeout_seconds);
        self.connect_inner(timeout, false, true).await
    }

    async fn connect_inner(
        &self,
        timeout: Duration,
        silent: bool,
        supersede: bool,
    ) -> Result<ConnectedWallet, ConnectionError> {
        if let Some(wallet) = self.state().connected() {
            return Ok(wallet.clone());
        }

        let future = {
            let mut slot = self.inner.inflight.lock().await;
            if supersede && slot.is_some() {
                warn!("Superseding in-flight connection attempt");
                *slot = None;
            }
            match slot.as_ref() {
                Some(inflight) => {
                    debug!(generation = inflight.generation, "Joining in-flight connection attempt");
                    inflight.future.clone()
                }
                None => {
                    let generation = self.inner.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
                    let deadline = Utc::now()
                        + chrono::Duration::from_std(timeout).unwrap_or_else(|_| chrono::Duration::seconds(30));
                    self.inner.state_tx.send_replace(ConnectionState::Connecting {
                        started_at: Utc::now(),
                        attempt: generation,
                        deadline,
                    });
                    let future = Self::drive(self.inner.clone(), generation, timeout, silent)
                        .boxed()
                        .shared();
                    *slot = Some(Inflight { future: future.clone(), generation });
                    future
                }
            }
        };

        future.await
    }

    /// Drive one connection attempt to completion and apply its outcome.
    /// Runs inside a shared future so every joiner observes the same result.
    async fn drive(
        inner: Arc<Inner>,
        generation: u64,
        timeout: Duration,
        silent: bool,
    ) -> Result<ConnectedWallet, ConnectionError> {
        let handshake = async {
            let mut status = inner.wallet.status_changes();
            if let Some(wallet) = status.borrow_and_update().clone() {
                return Ok(wallet);
            }
            if silent {
                inner.wallet.restore_session().await?;
            } else {
                inner.wallet.open_connect_flow().await?;
            }
            loop {
                status
                    .changed()
                    .await
                    .map_err(|_| ConnectionError::SdkError("status subscription closed".to_string()))?;
                if let Some(wallet) = status.borrow_and_update().clone() {
                    return Ok(wallet);
                }
            }
        };

        let result = match tokio::time::timeout(timeout, handshake).await {
            Ok(result) => result,
            Err(_) => Err(ConnectionError::Timeout),
        };

        // Apply the outcome under the inflight lock. A superseded attempt's
        // late result is discarded here, never double-applied.
        let mut slot = inner.inflight.lock().await;
        if slot.as_ref().map(|i| i.generation) != Some(generation) {
            debug!(generation, "Discarding result of superseded connection attempt");
            return Err(ConnectionError::Superseded);
        }
        *slot = None;

        match result {
            Ok(wallet) => {
                inner.state_tx.send_replace(ConnectionState::Connected(wallet.clone()));
                inner.session_store.record_connected(&wallet.account_address).await;
                info!(address = %wallet.account_address, "Wallet connected");
                Ok(wallet)
            }
            Err(e) => {
                warn!(error = %e, "Wallet connection failed");
                // The Failed value is transient: the channel only holds the
                // latest state, so subscribers may observe Disconnected
                // directly. The durable failure signal is the returned Err.
                inner.state_tx.send_replace(ConnectionState::Failed {
                    reason: e.to_string(),
                    at: Utc::now(),
                });
                inner.session_store.clear().await;
                inner.state_tx.send_replace(ConnectionState::Disconnected);
                Err(e)
            }
        }
    }

    /// Disconnect the wallet and clear the hint. Idempotent.
    pub async fn disconnect(&self) {
        self.inner.wallet.disconnect().await;
        self.inner.session_store.clear().await;
        *self.inner.inflight.lock().await = None;
        self.inner.state_tx.send_replace(ConnectionState::Disconnected);
        info!("Wallet disconnected");
    }
}
