//! Observable dispatch status, one register per order.
//!
//! Each register is a `tokio::sync::watch` channel: the controller is the only
//! writer, presenters hold receivers and re-render on change. The register
//! also carries the in-flight guard: [`StatusRegister::try_begin`] flips to
//! `Sending` atomically and refuses while a dispatch is already running.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::watch;

use possms_core::LocalOrderId;

/// What the presenter should show for an order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Sending,
    /// Receipt accepted for delivery to this phone.
    Succeeded(String),
    /// Cashier-facing failure message.
    Failed(String),
}

impl Status {
    pub fn is_sending(&self) -> bool {
        matches!(self, Status::Sending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Succeeded(_) | Status::Failed(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "idle"),
            Status::Sending => write!(f, "sending"),
            Status::Succeeded(phone) => write!(f, "sent to {phone}"),
            Status::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// Single-writer, multi-reader status cell.
#[derive(Debug)]
pub struct StatusRegister {
    tx: watch::Sender<Status>,
}

impl StatusRegister {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Status::Idle);
        Self { tx }
    }

    /// Current value.
    pub fn get(&self) -> Status {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.tx.subscribe()
    }

    /// Enter `Sending` unless already there. Returns `false` when a dispatch
    /// is in flight and the caller must drop its request.
    pub fn try_begin(&self) -> bool {
        self.tx.send_if_modified(|status| {
            if status.is_sending() {
                false
            } else {
                *status = Status::Sending;
                true
            }
        })
    }

    /// Record the terminal outcome of the current dispatch.
    pub fn finish(&self, status: Status) {
        self.tx.send_replace(status);
    }

    /// Back to `Idle`, e.g. when the presenter dismisses the last outcome.
    /// Ignored while a dispatch is in flight.
    pub fn reset(&self) {
        self.tx.send_if_modified(|status| {
            if status.is_sending() || *status == Status::Idle {
                false
            } else {
                *status = Status::Idle;
                true
            }
        });
    }
}

impl Default for StatusRegister {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers keyed by order. A register is created when a dispatch starts or
/// a presenter subscribes; plain reads never allocate one.
#[derive(Debug, Default)]
pub struct StatusBoard {
    registers: Mutex<HashMap<LocalOrderId, Arc<StatusRegister>>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register for `order`, if one exists.
    pub fn existing(&self, order: &LocalOrderId) -> Option<Arc<StatusRegister>> {
        self.registers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(order)
            .cloned()
    }

    /// Register for `order`, creating an `Idle` one if none exists.
    pub fn register(&self, order: &LocalOrderId) -> Arc<StatusRegister> {
        let mut registers = self
            .registers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        registers
            .entry(order.clone())
            .or_insert_with(|| Arc::new(StatusRegister::new()))
            .clone()
    }

    /// Current status; `Idle` for orders without a register.
    pub fn get(&self, order: &LocalOrderId) -> Status {
        self.existing(order)
            .map(|register| register.get())
            .unwrap_or_default()
    }

    pub fn subscribe(&self, order: &LocalOrderId) -> watch::Receiver<Status> {
        self.register(order).subscribe()
    }

    /// Drop the register of an order the POS has discarded.
    pub fn forget(&self, order: &LocalOrderId) {
        let mut registers = self
            .registers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        registers.remove(order);
    }

    /// Number of orders holding a register.
    pub fn len(&self) -> usize {
        self.registers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_begin_refuses_while_sending() {
        let register = StatusRegister::new();
        assert!(register.try_begin());
        assert!(!register.try_begin());
        register.finish(Status::Failed("missing phone number".into()));
        assert!(register.try_begin());
    }

    #[test]
    fn reset_is_ignored_while_sending() {
        let register = StatusRegister::new();
        assert!(register.try_begin());
        register.reset();
        assert_eq!(register.get(), Status::Sending);
        register.finish(Status::Succeeded("+4512345678".into()));
        register.reset();
        assert_eq!(register.get(), Status::Idle);
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let register = StatusRegister::new();
        let mut rx = register.subscribe();
        assert!(register.try_begin());
        rx.changed().await.expect("changed");
        assert_eq!(*rx.borrow_and_update(), Status::Sending);
        register.finish(Status::Succeeded("+4512345678".into()));
        rx.changed().await.expect("changed");
        assert_eq!(*rx.borrow(), Status::Succeeded("+4512345678".into()));
    }

    #[test]
    fn board_hands_out_one_register_per_order() {
        let board = StatusBoard::new();
        let a = LocalOrderId::from("a");
        assert!(board.register(&a).try_begin());
        assert_eq!(board.get(&a), Status::Sending);
        assert_eq!(board.get(&LocalOrderId::from("b")), Status::Idle);
        board.forget(&a);
        assert_eq!(board.get(&a), Status::Idle);
    }

    #[test]
    fn reads_do_not_allocate_registers() {
        let board = StatusBoard::new();
        let a = LocalOrderId::from("a");
        assert_eq!(board.get(&a), Status::Idle);
        assert!(board.existing(&a).is_none());
        assert!(board.is_empty());

        let _rx = board.subscribe(&a);
        assert_eq!(board.len(), 1);
        board.forget(&a);
        assert!(board.is_empty());
    }

    #[test]
    fn status_serializes_with_state_tag() {
        let json = serde_json::to_value(Status::Failed("carrier rejected".into())).expect("json");
        assert_eq!(json["state"], "failed");
        assert_eq!(json["detail"], "carrier rejected");
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(Status::Succeeded("+1".into()).to_string(), "sent to +1");
        assert!(Status::Failed("x".into()).is_terminal());
    }
}
