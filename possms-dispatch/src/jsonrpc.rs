//! [`ReceiptBackend`] over the POS server's JSON-RPC `call_kw` endpoint.
//!
//! ```text
//! POST {url}/web/dataset/call_kw/pos.order/{method}
//! {"jsonrpc": "2.0", "method": "call", "id": n,
//!  "params": {"model": "pos.order", "method": ..., "args": [...], "kwargs": {}}}
//! ```
//!
//! The response is either `{"result": ...}` or
//! `{"error": {"message": ..., "data": {"message": ...}}}`. A configured SMS
//! gateway travels as `kwargs.context.sms_gateway`. ureq is blocking, so
//! every call runs on the blocking pool.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use possms_core::{BackendConfig, BackendOrderId};

use crate::error::RemoteError;
use crate::remote::ReceiptBackend;

const MODEL: &str = "pos.order";
const CREATE_METHOD: &str = "create_from_ui_with_sms";
const SEND_METHOD: &str = "action_send_sms_receipt_rpc";

#[derive(Debug, Clone)]
pub struct JsonRpcBackend {
    agent: ureq::Agent,
    base_url: String,
    database: Option<String>,
    /// Gateway account forwarded in the call context; server default when unset.
    sms_gateway: Option<String>,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcBackend {
    pub fn new(config: &BackendConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            base_url: config.url.trim_end_matches('/').to_string(),
            database: config.database.clone(),
            sms_gateway: None,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn with_sms_gateway(mut self, gateway: Option<String>) -> Self {
        self.sms_gateway = gateway.filter(|g| !g.trim().is_empty());
        self
    }

    /// `{url}/web/dataset/call_kw/pos.order/{method}`.
    pub fn endpoint(&self, method: &str) -> String {
        format!("{}/web/dataset/call_kw/{MODEL}/{method}", self.base_url)
    }

    /// POST request for `method`, with an encoded `db` query parameter when a
    /// database is configured.
    fn request(&self, method: &str) -> ureq::Request {
        let request = self.agent.post(&self.endpoint(method));
        match self.database.as_deref().filter(|db| !db.is_empty()) {
            Some(db) => request.query("db", db),
            None => request,
        }
    }

    async fn call_kw(&self, method: &'static str, args: Value) -> Result<Value, RemoteError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = request_envelope(id, method, args, self.kwargs());
        let request = self.request(method);

        tracing::debug!(url = request.url(), rpc_id = id, "JSON-RPC call");
        tokio::task::spawn_blocking(move || post_blocking(request, body))
            .await
            .map_err(|e| RemoteError::Network(format!("RPC task failed: {e}")))?
    }
}

impl ReceiptBackend for JsonRpcBackend {
    async fn create_order_with_sms_intent(
        &self,
        order: Value,
        phone: &str,
    ) -> Result<Value, RemoteError> {
        self.call_kw(CREATE_METHOD, json!([[order], phone])).await
    }

    async fn send_sms_receipt(&self, id: BackendOrderId, phone: &str) -> Result<Value, RemoteError> {
        self.call_kw(SEND_METHOD, json!([id.0, phone])).await
    }
}

impl JsonRpcBackend {
    fn kwargs(&self) -> Value {
        match &self.sms_gateway {
            Some(gateway) => json!({"context": {"sms_gateway": gateway}}),
            None => json!({}),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

fn request_envelope(id: u64, method: &str, args: Value, kwargs: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "call",
        "id": id,
        "params": {
            "model": MODEL,
            "method": method,
            "args": args,
            "kwargs": kwargs,
        },
    })
}

/// Unwrap a JSON-RPC response body into its `result`.
fn parse_response(body: Value) -> Result<Value, RemoteError> {
    let Value::Object(mut fields) = body else {
        return Err(RemoteError::Malformed(format!("expected object, got {body}")));
    };
    if let Some(error) = fields.remove("error").filter(|e| !e.is_null()) {
        return Err(server_error(&error));
    }
    fields
        .remove("result")
        .ok_or_else(|| RemoteError::Malformed("response has neither result nor error".into()))
}

fn server_error(error: &Value) -> RemoteError {
    let text = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    RemoteError::Server {
        message: text(error.get("message")).unwrap_or_default(),
        detail: text(error.get("data").and_then(|d| d.get("message"))),
    }
}

fn post_blocking(request: ureq::Request, body: Value) -> Result<Value, RemoteError> {
    match request.send_json(body) {
        Ok(response) => {
            let decoded: Value = response
                .into_json()
                .map_err(|e| RemoteError::Malformed(format!("undecodable response: {e}")))?;
            parse_response(decoded)
        }
        Err(ureq::Error::Status(code, response)) => {
            // Odoo usually still sends a JSON-RPC error body with a non-2xx status.
            match response.into_json::<Value>() {
                Ok(decoded) => match parse_response(decoded) {
                    Err(err) => Err(err),
                    Ok(_) => Err(status_error(code)),
                },
                Err(_) => Err(status_error(code)),
            }
        }
        Err(ureq::Error::Transport(transport)) => Err(RemoteError::Network(transport.to_string())),
    }
}

fn status_error(code: u16) -> RemoteError {
    RemoteError::Server {
        message: format!("HTTP status {code}"),
        detail: None,
    }
}
