//! Order record service
//!
//! CRUD over the injected order store, used by the backend endpoints and the
//! verification stage. The store is only ever mutated through this service.

use std::sync::Arc;

use tracing::info;

use crate::domain::amount::TonAmount;
use crate::domain::order::{OrderRecord, OrderStatus};
use crate::infrastructure::adapters::order_store::OrderStore;
use crate::shared::error::{AppError, AppResult};

/// Service managing order records
pub struct OrderService {
    store: OrderStore,
}

impl OrderService {
    pub fn new(store: OrderStore) -> Self {
        Self { store }
    }

    /// Create a pending order record
    pub async fn create_order(
        &self,
        order_id: String,
        amount: TonAmount,
        address: String,
        product_name: String,
    ) -> AppResult<OrderRecord> {
        if self.store.get(&order_id).await?.is_some() {
            return Err(AppError::Validation(format!("order {} already exists", order_id)));
        }
        let record = OrderRecord::new(order_id, amount, address, product_name);
        self.store.put(&record).await?;
        info!(order_id = %record.order_id, "Order created");
        Ok(record)
    }

    /// Update the status of an existing order
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> AppResult<OrderRecord> {
        let mut record = self
            .store
            .get(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("order {}", order_id)))?;
        record.status = status;
        self.store.put(&record).await?;
        info!(order_id = %order_id, status = ?status, "Order status updated");
        Ok(record)
    }

    /// Fetch an order record
    pub async fn get_order(&self, order_id: &str) -> AppResult<Option<OrderRecord>> {
        self.store.get(order_id).await
    }
}

/// Shared handle used by the HTTP handlers
pub type SharedOrderService = Arc<OrderService>;
