//! In-memory order record store
//!
//! Keyed by order id, mutated only through the order service. Lifecycle is
//! tied to the process; an explicitly-owned instance is injected wherever
//! records are needed rather than hidden behind a global.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::order::OrderRecord;
use crate::shared::error::AppResult;

/// Abstraction for persisting order records
#[derive(Clone)]
pub struct OrderStore {
    records: Arc<RwLock<HashMap<String, OrderRecord>>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn put(&self, record: &OrderRecord) -> AppResult<()> {
        self.records
            .write()
            .await
            .insert(record.order_id.clone(), record.clone());
        Ok(())
    }

    pub async fn get(&self, order_id: &str) -> AppResult<Option<OrderRecord>> {
        Ok(self.records.read().await.get(order_id).cloned())
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}
