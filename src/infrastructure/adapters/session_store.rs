//! Connection hint store
//!
//! Persists a lightweight "wallet was connected" hint across reloads so the
//! controller can attempt a silent reconnect at startup. A single record
//! under a fixed key, with a freshness TTL checked at restore time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Persisted connection hint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHint {
    pub connected: bool,
    pub address: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Store for the connection hint
#[derive(Clone)]
pub struct SessionStore {
    hint: Arc<RwLock<Option<SessionHint>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            hint: Arc::new(RwLock::new(None)),
            ttl: Duration::seconds(ttl_seconds as i64),
        }
    }

    /// Record that a wallet is currently connected
    pub async fn record_connected(&self, address: &str) {
        let hint = SessionHint {
            connected: true,
            address: Some(address.to_string()),
            timestamp: Utc::now(),
        };
        *self.hint.write().await = Some(hint);
    }

    /// Store a raw hint value
    pub async fn put(&self, hint: SessionHint) {
        *self.hint.write().await = Some(hint);
    }

    /// The stored hint, if it is still within the freshness TTL
    pub async fn fresh(&self) -> Option<SessionHint> {
        let guard = self.hint.read().await;
        match guard.as_ref() {
            Some(hint) if hint.connected && Utc::now() - hint.timestamp <= self.ttl => {
                Some(hint.clone())
            }
            _ => None,
        }
    }

    /// Remove the hint. Safe to call when none is stored.
    pub async fn clear(&self) {
        *self.hint.write().await = None;
    }

    /// Whether any hint is stored, fresh or not
    pub async fn is_empty(&self) -> bool {
        self.hint.read().await.is_none()
    }
}
