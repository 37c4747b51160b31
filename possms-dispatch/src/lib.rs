//! # possms-dispatch
//!
//! Sends an order's receipt by SMS through the POS server.
//!
//! [`ReceiptController::send_receipt`] is the entry point: it validates the
//! phone, makes sure the order exists on the server ([`ensure_synced`]), issues
//! exactly one send ([`dispatch`]) and publishes the outcome on a per-order
//! [`StatusRegister`].

pub mod controller;
pub mod error;
pub mod guarantor;
pub mod invoker;
pub mod jsonrpc;
pub mod order;
pub mod remote;
pub mod status;

pub use controller::ReceiptController;
pub use error::{Recoverability, ReceiptError, RemoteError, SyncError};
pub use guarantor::ensure_synced;
pub use invoker::{classify, dispatch, DispatchOutcome};
pub use jsonrpc::JsonRpcBackend;
pub use order::OrderHandle;
pub use remote::{Connectivity, ConnectivityFlag, ReceiptBackend};
pub use status::{Status, StatusBoard, StatusRegister};
