//! The single remote "send" call and the classification of its result.

use serde::Serialize;
use serde_json::Value;

use possms_core::BackendOrderId;

use crate::error::{RemoteError, GENERIC_TRANSPORT_MESSAGE, UNKNOWN_REJECTION};
use crate::remote::ReceiptBackend;

/// Result of one dispatch attempt.
///
/// Rejections are usually fixable by the cashier (wrong number, blocked
/// recipient); transport errors are usually fixed by retrying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Sent,
    Rejected(String),
    TransportError(String),
}

/// A classified reply, plus whether a rejection reason came from the server
/// or stands in for a reply shape nobody recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Classified {
    pub outcome: DispatchOutcome,
    pub unrecognized: bool,
}

impl Classified {
    fn known(outcome: DispatchOutcome) -> Self {
        Self { outcome, unrecognized: false }
    }

    fn unknown() -> Self {
        Self {
            outcome: DispatchOutcome::Rejected(UNKNOWN_REJECTION.to_string()),
            unrecognized: true,
        }
    }
}

/// Call `SendSmsReceipt(id, phone)` exactly once and classify the result.
pub async fn dispatch<B: ReceiptBackend>(
    backend: &B,
    id: BackendOrderId,
    phone: &str,
) -> DispatchOutcome {
    dispatch_detailed(backend, id, phone).await.outcome
}

pub(crate) async fn dispatch_detailed<B: ReceiptBackend>(
    backend: &B,
    id: BackendOrderId,
    phone: &str,
) -> Classified {
    let classified = classify_detailed(backend.send_sms_receipt(id, phone).await);
    match &classified.outcome {
        DispatchOutcome::Sent => tracing::info!(server_id = %id, phone, "SMS receipt sent"),
        DispatchOutcome::Rejected(reason) => tracing::warn!(
            server_id = %id,
            reason = %reason,
            unrecognized = classified.unrecognized,
            "SMS receipt rejected"
        ),
        DispatchOutcome::TransportError(message) => {
            tracing::error!(server_id = %id, error = %message, "SMS receipt transport failure")
        }
    }
    classified
}

/// `true` → `Sent`; `{"error": e}` → `Rejected(e)`; other values →
/// `Rejected("unknown error")`; call failure → `TransportError`.
pub fn classify(result: Result<Value, RemoteError>) -> DispatchOutcome {
    classify_detailed(result).outcome
}

pub(crate) fn classify_detailed(result: Result<Value, RemoteError>) -> Classified {
    match result {
        Ok(Value::Bool(true)) => Classified::known(DispatchOutcome::Sent),
        Ok(Value::Object(fields)) => match fields.get("error") {
            Some(Value::String(reason)) if !reason.trim().is_empty() => {
                Classified::known(DispatchOutcome::Rejected(reason.clone()))
            }
            Some(Value::Null) | Some(Value::Bool(false)) | Some(Value::String(_)) | None => {
                Classified::unknown()
            }
            Some(other) => Classified::known(DispatchOutcome::Rejected(other.to_string())),
        },
        Ok(_) => Classified::unknown(),
        Err(err) => Classified::known(DispatchOutcome::TransportError(
            err.best_message()
                .unwrap_or(GENERIC_TRANSPORT_MESSAGE)
                .to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literal_true_is_sent() {
        assert_eq!(classify(Ok(json!(true))), DispatchOutcome::Sent);
    }

    #[test]
    fn error_field_is_rejection() {
        assert_eq!(
            classify(Ok(json!({"error": "carrier rejected"}))),
            DispatchOutcome::Rejected("carrier rejected".into())
        );
    }

    #[test]
    fn structured_error_field_is_stringified() {
        assert_eq!(
            classify(Ok(json!({"error": {"code": 7}}))),
            DispatchOutcome::Rejected(r#"{"code":7}"#.into())
        );
    }

    #[test]
    fn unexpected_shapes_are_unknown_rejections() {
        for value in [
            json!(false),
            json!(null),
            json!("true"),
            json!(1),
            json!({"success": true}),
            json!({"error": ""}),
            json!([true]),
        ] {
            assert_eq!(
                classify(Ok(value.clone())),
                DispatchOutcome::Rejected(UNKNOWN_REJECTION.into()),
                "value: {value}"
            );
        }
    }

    #[test]
    fn server_reason_matching_fallback_text_is_still_a_server_rejection() {
        let from_server = classify_detailed(Ok(json!({"error": "unknown error"})));
        assert_eq!(from_server.outcome, DispatchOutcome::Rejected(UNKNOWN_REJECTION.into()));
        assert!(!from_server.unrecognized);

        let unrecognized = classify_detailed(Ok(json!(false)));
        assert_eq!(unrecognized.outcome, DispatchOutcome::Rejected(UNKNOWN_REJECTION.into()));
        assert!(unrecognized.unrecognized);
    }

    #[test]
    fn call_failure_is_transport_error_with_extracted_message() {
        let err = RemoteError::Server {
            message: "Odoo Server Error".into(),
            detail: Some("SMS gateway timeout".into()),
        };
        assert_eq!(
            classify(Err(err)),
            DispatchOutcome::TransportError("SMS gateway timeout".into())
        );
    }

    struct FixedReply(Value);

    impl ReceiptBackend for FixedReply {
        async fn create_order_with_sms_intent(
            &self,
            _order: Value,
            _phone: &str,
        ) -> Result<Value, RemoteError> {
            unreachable!("dispatch never creates orders")
        }

        async fn send_sms_receipt(
            &self,
            _id: BackendOrderId,
            _phone: &str,
        ) -> Result<Value, RemoteError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn dispatch_classifies_backend_reply() {
        let backend = FixedReply(json!({"error": "number blocked"}));
        let outcome = tokio_test::block_on(dispatch(&backend, BackendOrderId(9), "+4512345678"));
        assert_eq!(outcome, DispatchOutcome::Rejected("number blocked".into()));
    }

    #[test]
    fn call_failure_without_message_falls_back_to_generic() {
        assert_eq!(
            classify(Err(RemoteError::Network(String::new()))),
            DispatchOutcome::TransportError(GENERIC_TRANSPORT_MESSAGE.into())
        );
    }
}
