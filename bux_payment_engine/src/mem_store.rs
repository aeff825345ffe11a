use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    order_types::{meta_keys, Order, OrderId, OrderKey, OrderStatusType},
    traits::{OrderStore, OrderStoreError},
};

/// An in-memory [`OrderStore`]. The reference backend for tests and the demo server; a production
/// deployment implements the trait against the shop platform's own order API instead.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug, Default)]
struct StoreInner {
    orders: HashMap<OrderId, OrderRecord>,
}

#[derive(Debug)]
struct OrderRecord {
    order: Order,
    meta: HashMap<String, String>,
    notes: Vec<OrderNote>,
}

/// One entry in an order's activity log.
#[derive(Debug, Clone)]
pub struct OrderNote {
    pub created_at: DateTime<Utc>,
    pub note: String,
}

impl MemoryOrderStore {
    pub async fn seed_order(&self, order: Order) {
        let mut inner = self.inner.write().await;
        inner.orders.insert(order.id, OrderRecord { order, meta: HashMap::new(), notes: Vec::new() });
    }

    pub async fn order_snapshot(&self, id: OrderId) -> Option<Order> {
        self.inner.read().await.orders.get(&id).map(|r| r.order.clone())
    }

    pub async fn notes(&self, id: OrderId) -> Vec<OrderNote> {
        self.inner.read().await.orders.get(&id).map(|r| r.notes.clone()).unwrap_or_default()
    }

    pub async fn meta_value(&self, id: OrderId, key: &str) -> Option<String> {
        self.inner.read().await.orders.get(&id).and_then(|r| r.meta.get(key).cloned())
    }
}

impl StoreInner {
    fn record_mut(&mut self, id: OrderId) -> Result<&mut OrderRecord, OrderStoreError> {
        self.orders.get_mut(&id).ok_or(OrderStoreError::OrderNotFound(id))
    }
}

impl OrderStore for MemoryOrderStore {
    async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, OrderStoreError> {
        Ok(self.inner.read().await.orders.get(&id).map(|r| r.order.clone()))
    }

    async fn order_id_by_key(&self, key: &OrderKey) -> Result<Option<OrderId>, OrderStoreError> {
        Ok(self.inner.read().await.orders.values().find(|r| &r.order.order_key == key).map(|r| r.order.id))
    }

    async fn update_status(&self, id: OrderId, status: OrderStatusType, note: &str) -> Result<(), OrderStoreError> {
        let mut inner = self.inner.write().await;
        let record = inner.record_mut(id)?;
        record.order.status = status;
        record.notes.push(OrderNote { created_at: Utc::now(), note: note.to_string() });
        Ok(())
    }

    async fn add_note(&self, id: OrderId, note: &str) -> Result<(), OrderStoreError> {
        let mut inner = self.inner.write().await;
        inner.record_mut(id)?.notes.push(OrderNote { created_at: Utc::now(), note: note.to_string() });
        Ok(())
    }

    async fn set_meta(&self, id: OrderId, key: &str, value: &str) -> Result<(), OrderStoreError> {
        let mut inner = self.inner.write().await;
        inner.record_mut(id)?.meta.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn fetch_meta(&self, id: OrderId, key: &str) -> Result<Option<String>, OrderStoreError> {
        Ok(self.inner.read().await.orders.get(&id).and_then(|r| r.meta.get(key).cloned()))
    }

    async fn try_mark_payment_complete(&self, id: OrderId) -> Result<bool, OrderStoreError> {
        // check and set under a single write lock, so concurrent deliveries serialize here
        let mut inner = self.inner.write().await;
        let record = inner.record_mut(id)?;
        if record.meta.get(meta_keys::PAYMENT_COMPLETE).map(String::as_str) == Some(meta_keys::PAYMENT_COMPLETE_VALUE) {
            return Ok(false);
        }
        record.meta.insert(meta_keys::PAYMENT_COMPLETE.to_string(), meta_keys::PAYMENT_COMPLETE_VALUE.to_string());
        Ok(true)
    }
}
