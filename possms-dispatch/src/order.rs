//! Shared handle to an order that the POS and the dispatch flow both touch.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use possms_core::{LocalOrderId, Order};

/// Cloneable handle to one order.
///
/// The local id is kept outside the lock so the in-flight guard can be
/// checked without awaiting. Guards are never held across a remote call.
#[derive(Debug, Clone)]
pub struct OrderHandle {
    local_id: LocalOrderId,
    inner: Arc<RwLock<Order>>,
}

impl OrderHandle {
    pub fn new(order: Order) -> Self {
        Self {
            local_id: order.local_id.clone(),
            inner: Arc::new(RwLock::new(order)),
        }
    }

    pub fn local_id(&self) -> &LocalOrderId {
        &self.local_id
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Order> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Order> {
        self.inner.write().await
    }

    /// Clone of the current order state.
    pub async fn snapshot(&self) -> Order {
        self.inner.read().await.clone()
    }
}

impl From<Order> for OrderHandle {
    fn from(order: Order) -> Self {
        Self::new(order)
    }
}
