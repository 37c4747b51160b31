//! The remote surface the dispatch flow depends on.
//!
//! Two operations make up the whole wire contract: create an order carrying
//! the intended SMS phone, and send the receipt. Transport and encoding belong
//! to the implementation ([`crate::jsonrpc::JsonRpcBackend`] in production,
//! scripted doubles in tests).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use possms_core::BackendOrderId;

use crate::error::RemoteError;

/// Server-side order operations used by the receipt flow.
///
/// Both methods return the raw application result; interpreting it is the
/// caller's job.
#[allow(async_fn_in_trait)]
pub trait ReceiptBackend {
    /// Persist `order` (already carrying `phone`) and return the created
    /// order descriptors, normally `[{"id": <server id>, ...}]`.
    async fn create_order_with_sms_intent(
        &self,
        order: Value,
        phone: &str,
    ) -> Result<Value, RemoteError>;

    /// Ask the server to send the receipt of order `id` to `phone`.
    /// Expected results: `true`, `{"error": "..."}`, or anything else.
    async fn send_sms_receipt(&self, id: BackendOrderId, phone: &str)
        -> Result<Value, RemoteError>;
}

/// Reports whether the execution environment is online.
pub trait Connectivity {
    fn is_online(&self) -> bool;
}

/// Shared online/offline flag flipped by whoever watches the network.
#[derive(Debug, Clone)]
pub struct ConnectivityFlag(Arc<AtomicBool>);

impl ConnectivityFlag {
    pub fn new(online: bool) -> Self {
        Self(Arc::new(AtomicBool::new(online)))
    }

    pub fn online() -> Self {
        Self::new(true)
    }

    pub fn offline() -> Self {
        Self::new(false)
    }

    pub fn set_online(&self, online: bool) {
        self.0.store(online, Ordering::SeqCst);
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::online()
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
