use thiserror::Error;

use crate::order_types::{Order, OrderId, OrderKey, OrderStatusType};

/// The interface to the external order store.
///
/// The engine only ever *reads* orders and *requests* mutations; the store owns the data and its
/// lifecycle. Implementations typically sit in front of the e-commerce platform's own API.
#[allow(async_fn_in_trait)]
pub trait OrderStore: Clone {
    /// Fetch the order with the given id, or `None` if no such order exists.
    async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// Look an order id up by its order key. Used as a fallback when the id embedded in a
    /// correlation token no longer resolves (e.g. after an invoice prefix change).
    async fn order_id_by_key(&self, key: &OrderKey) -> Result<Option<OrderId>, OrderStoreError>;

    /// Transition the order to `status`, recording `note` in the order's activity log.
    async fn update_status(&self, id: OrderId, status: OrderStatusType, note: &str) -> Result<(), OrderStoreError>;

    /// Append a human-readable note to the order's activity log without changing its status.
    async fn add_note(&self, id: OrderId, note: &str) -> Result<(), OrderStoreError>;

    /// Record a piece of audit metadata against the order.
    async fn set_meta(&self, id: OrderId, key: &str, value: &str) -> Result<(), OrderStoreError>;

    /// Read a piece of audit metadata recorded against the order.
    async fn fetch_meta(&self, id: OrderId, key: &str) -> Result<Option<String>, OrderStoreError>;

    /// Atomically test-and-set the payment-complete flag
    /// ([`crate::order_types::meta_keys::PAYMENT_COMPLETE`]).
    ///
    /// Returns `true` iff this call set the flag, i.e. the caller won the race and owns the
    /// completion side effects. Two notifications for the same order may be processed
    /// concurrently; implementations MUST make the check-and-set a single atomically observed
    /// step so that only one of them can ever return `true`.
    async fn try_mark_payment_complete(&self, id: OrderId) -> Result<bool, OrderStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Order {0} does not exist in the store")]
    OrderNotFound(OrderId),
    #[error("The order store backend failed. {0}")]
    BackendError(String),
}
