//! Make sure an order has a durable server identity before dispatch.
//!
//! ## `ensure_synced` — 5-step protocol
//!
//! 1. Order already has a server id → return it, no remote call.
//! 2. Environment offline → [`SyncError::Offline`], no remote call.
//! 3. Export the order, inject the phone, call create once.
//! 4. Take the first descriptor's id, store it on the order, return it.
//! 5. Classify failures: network → `Network`, anything else → `BackendRejected`.

use serde_json::Value;

use possms_core::BackendOrderId;

use crate::error::SyncError;
use crate::order::OrderHandle;
use crate::remote::{Connectivity, ReceiptBackend};

/// Key the POS server reads the SMS destination from.
pub const SMS_PHONE_FIELD: &str = "phone_for_sms_receipt";

const NO_ORDER_RETURNED: &str = "no order returned";

/// Resolve the durable identity of `order`, creating it remotely if needed.
pub async fn ensure_synced<B, C>(
    order: &OrderHandle,
    phone: &str,
    backend: &B,
    connectivity: &C,
) -> Result<BackendOrderId, SyncError>
where
    B: ReceiptBackend,
    C: Connectivity,
{
    // Step 1
    let payload = {
        let current = order.read().await;
        if let Some(id) = current.backend_id {
            tracing::debug!(order = %current.local_id, server_id = %id, "order already synced");
            return Ok(id);
        }

        // Step 2
        if !connectivity.is_online() {
            tracing::warn!(order = %current.local_id, "offline; cannot create order on server");
            return Err(SyncError::Offline);
        }

        // Step 3: export under the read guard, call without it.
        let mut payload = current
            .export()
            .map_err(|e| SyncError::BackendRejected(format!("order export failed: {e}")))?;
        inject_phone(&mut payload, phone);
        payload
    };

    tracing::info!(order = %order.local_id(), "creating order on server before SMS dispatch");
    let result = backend
        .create_order_with_sms_intent(payload, phone)
        .await
        .map_err(|err| {
            tracing::warn!(order = %order.local_id(), error = %err, "order create failed");
            SyncError::from(err)
        })?;

    // Step 4
    let id = first_descriptor_id(&result)
        .ok_or_else(|| SyncError::BackendRejected(NO_ORDER_RETURNED.to_string()))?;
    order.write().await.backend_id = Some(id);
    tracing::info!(order = %order.local_id(), server_id = %id, "order synced");
    Ok(id)
}

fn inject_phone(payload: &mut Value, phone: &str) {
    if let Value::Object(fields) = payload {
        fields.insert(SMS_PHONE_FIELD.to_string(), Value::String(phone.to_string()));
    }
}

/// `[{"id": 42, ...}, ...]` → `42`. Anything else → `None`.
fn first_descriptor_id(result: &Value) -> Option<BackendOrderId> {
    result
        .as_array()?
        .first()?
        .get("id")?
        .as_i64()
        .map(BackendOrderId)
}
