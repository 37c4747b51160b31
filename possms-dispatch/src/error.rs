//! Error types for possms-dispatch.
//!
//! [`RemoteError`] is what a backend call can fail with. [`SyncError`] is the
//! sync guarantor's classification of it. [`ReceiptError`] is the full set of
//! reasons a `send_receipt` run ends in `Status::Failed`; its `Display` text
//! is the message shown to the cashier.

use thiserror::Error;

/// Fallback transport message when nothing better can be extracted.
pub const GENERIC_TRANSPORT_MESSAGE: &str =
    "could not connect to the server or an unexpected error occurred";

/// Reason used when the send result has no recognizable shape.
pub const UNKNOWN_REJECTION: &str = "unknown error";

/// Failure of a remote call below the application-result level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Connection refused, DNS failure, reset, timeout.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with an error envelope or a non-2xx status.
    #[error("server error: {}", .detail.as_deref().unwrap_or(.message))]
    Server {
        message: String,
        detail: Option<String>,
    },

    /// The server answered with something that is not a JSON-RPC envelope.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RemoteError {
    pub fn is_network(&self) -> bool {
        matches!(self, RemoteError::Network(_))
    }

    /// Most specific human-readable text available, if any.
    pub fn best_message(&self) -> Option<&str> {
        let text = match self {
            RemoteError::Network(msg) | RemoteError::Malformed(msg) => msg.as_str(),
            RemoteError::Server { message, detail } => detail.as_deref().unwrap_or(message),
        };
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Why an order could not be given a durable identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("cannot sync order while offline; reconnect and retry")]
    Offline,

    #[error("network error while syncing order: {0}")]
    Network(String),

    #[error("order sync rejected: {0}")]
    BackendRejected(String),
}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        let detail = err.best_message().unwrap_or(UNKNOWN_REJECTION).to_string();
        if err.is_network() {
            SyncError::Network(detail)
        } else {
            SyncError::BackendRejected(detail)
        }
    }
}

/// Whether the cashier can fix a failure without outside help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recoverability {
    Yes,
    No,
    Conditional,
}

/// Every way a receipt dispatch can end in failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptError {
    #[error("order not available")]
    OrderMissing,

    #[error("missing phone number")]
    PhoneMissing,

    #[error("invalid phone number format")]
    PhoneInvalidFormat,

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("{0}")]
    DispatchRejected(String),

    #[error("{}", UNKNOWN_REJECTION)]
    DispatchUnknown,

    #[error("{0}")]
    DispatchTransport(String),
}

impl ReceiptError {
    pub fn recoverability(&self) -> Recoverability {
        match self {
            ReceiptError::OrderMissing | ReceiptError::DispatchUnknown => Recoverability::No,
            ReceiptError::PhoneMissing
            | ReceiptError::PhoneInvalidFormat
            | ReceiptError::Sync(SyncError::Offline)
            | ReceiptError::Sync(SyncError::Network(_))
            | ReceiptError::DispatchTransport(_) => Recoverability::Yes,
            ReceiptError::Sync(SyncError::BackendRejected(_))
            | ReceiptError::DispatchRejected(_) => Recoverability::Conditional,
        }
    }
}
