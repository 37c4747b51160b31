//! `send_receipt` — the entry point presenters call when the cashier presses
//! "send SMS".
//!
//! Sequence for one trigger:
//!
//! 1. Drop the trigger if the order's register is already `Sending`;
//!    otherwise enter `Sending`.
//! 2. No order → `order not available`.
//! 3. Blank phone → `missing phone number`.
//! 4. Format gate → `invalid phone number format`.
//! 5. Store the phone on the order (kept even if later steps fail).
//! 6. Ensure the order has a server id.
//! 7. Send once and classify.
//! 8. On success flag the order as sent. Resending stays allowed.
//!
//! Every failure ends in `Status::Failed`; nothing propagates to the caller.

use std::sync::Arc;

use tokio::sync::watch;

use possms_core::{phone, validate, LocalOrderId, Validity};

use crate::error::ReceiptError;
use crate::guarantor::ensure_synced;
use crate::invoker::{dispatch_detailed, Classified, DispatchOutcome};
use crate::order::OrderHandle;
use crate::remote::{Connectivity, ReceiptBackend};
use crate::status::{Status, StatusBoard, StatusRegister};

/// Owns the status registers and the collaborators needed to dispatch.
pub struct ReceiptController<B, C> {
    backend: B,
    connectivity: C,
    board: StatusBoard,
    /// Register used when a trigger arrives without an order.
    session: Arc<StatusRegister>,
}

impl<B, C> ReceiptController<B, C>
where
    B: ReceiptBackend,
    C: Connectivity,
{
    pub fn new(backend: B, connectivity: C) -> Self {
        Self {
            backend,
            connectivity,
            board: StatusBoard::new(),
            session: Arc::new(StatusRegister::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current status of `order`.
    pub fn status(&self, order: &LocalOrderId) -> Status {
        self.board.get(order)
    }

    /// Receiver that wakes on every status change of `order`.
    pub fn subscribe(&self, order: &LocalOrderId) -> watch::Receiver<Status> {
        self.board.subscribe(order)
    }

    /// Status of triggers that arrived without an order.
    pub fn session_status(&self) -> Status {
        self.session.get()
    }

    /// Clear a finished outcome back to `Idle`.
    pub fn dismiss(&self, order: &LocalOrderId) {
        if let Some(register) = self.board.existing(order) {
            register.reset();
        }
    }

    /// Release the register of an order the POS has discarded. Existing
    /// subscribers keep their last value but see no further changes.
    pub fn forget(&self, order: &LocalOrderId) {
        self.board.forget(order);
    }

    /// Run one dispatch for `order` to `raw_phone`.
    ///
    /// Returns the terminal status, or `None` when the trigger was dropped
    /// because a dispatch for the same order is still in flight.
    pub async fn send_receipt(&self, order: Option<&OrderHandle>, raw_phone: &str) -> Option<Status> {
        let register = match order {
            Some(handle) => self.board.register(handle.local_id()),
            None => self.session.clone(),
        };
        if !register.try_begin() {
            tracing::debug!(
                order = ?order.map(|h| h.local_id().0.as_str()),
                "SMS dispatch already in flight; dropping trigger"
            );
            return None;
        }

        let status = match self.run(order, raw_phone).await {
            Ok(phone) => Status::Succeeded(phone),
            Err(err) => {
                tracing::warn!(
                    order = ?order.map(|h| h.local_id().0.as_str()),
                    error = %err,
                    recoverability = ?err.recoverability(),
                    "SMS dispatch failed"
                );
                Status::Failed(err.to_string())
            }
        };
        register.finish(status.clone());
        Some(status)
    }

    async fn run(&self, order: Option<&OrderHandle>, raw_phone: &str) -> Result<String, ReceiptError> {
        let order = order.ok_or(ReceiptError::OrderMissing)?;

        let phone = raw_phone.trim();
        match validate(phone) {
            Validity::Valid => {}
            Validity::Missing => return Err(ReceiptError::PhoneMissing),
            Validity::InvalidFormat => return Err(ReceiptError::PhoneInvalidFormat),
        }

        phone::set(&mut *order.write().await, phone);

        let id = ensure_synced(order, phone, &self.backend, &self.connectivity).await?;

        let Classified { outcome, unrecognized } = dispatch_detailed(&self.backend, id, phone).await;
        match outcome {
            DispatchOutcome::Sent => {
                order.write().await.sms_receipt_sent = true;
                Ok(phone.to_string())
            }
            DispatchOutcome::Rejected(_) if unrecognized => Err(ReceiptError::DispatchUnknown),
            DispatchOutcome::Rejected(reason) => Err(ReceiptError::DispatchRejected(reason)),
            DispatchOutcome::TransportError(message) => {
                Err(ReceiptError::DispatchTransport(message))
            }
        }
    }
}
