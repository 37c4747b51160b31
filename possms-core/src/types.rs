//! Domain types for point-of-sale orders as seen by the SMS receipt flow.
//!
//! Field names on the wire follow the POS export format (`uid`, `server_id`,
//! `partner`, `phone_for_sms_receipt`, ...). Rust-side names describe what the
//! field means.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Client-assigned order identifier. Always present, never durable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalOrderId(pub String);

impl fmt::Display for LocalOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for LocalOrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LocalOrderId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Server-assigned order identifier; proves the order was persisted remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BackendOrderId(pub i64);

impl fmt::Display for BackendOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for BackendOrderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A customer record linked to an order. Read-only from the SMS flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Contact {
    /// Mobile number if set, otherwise landline. Blank values count as unset.
    pub fn derived_phone(&self) -> Option<&str> {
        non_blank(self.mobile.as_deref()).or_else(|| non_blank(self.phone.as_deref()))
    }
}

/// One product line on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: String,
    pub qty: f64,
    /// Line subtotal including tax.
    pub price_subtotal_incl: f64,
}

/// A payment registered against an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub method: String,
    pub amount: f64,
}

/// A point-of-sale order.
///
/// The order lifecycle belongs to the POS. The SMS flow writes `sms_phone`,
/// `sms_receipt_sent`, and (on the sync-on-demand path) `backend_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "uid")]
    pub local_id: LocalOrderId,
    #[serde(rename = "server_id", default, skip_serializing_if = "Option::is_none")]
    pub backend_id: Option<BackendOrderId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_reference: Option<String>,
    pub date_order: DateTime<Utc>,
    #[serde(rename = "partner", default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(rename = "phone_for_sms_receipt", default)]
    pub sms_phone: Option<String>,
    #[serde(rename = "is_sms_receipt_sent", default)]
    pub sms_receipt_sent: bool,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub amount_total: f64,
    #[serde(default)]
    pub amount_tax: f64,
}

impl Order {
    /// A fresh, unsynced order with no lines.
    pub fn new(local_id: impl Into<LocalOrderId>, name: impl Into<String>) -> Self {
        Self {
            local_id: local_id.into(),
            backend_id: None,
            name: name.into(),
            pos_reference: None,
            date_order: Utc::now(),
            contact: None,
            sms_phone: None,
            sms_receipt_sent: false,
            lines: vec![],
            payments: vec![],
            amount_total: 0.0,
            amount_tax: 0.0,
        }
    }

    /// `true` once the order has a durable server identity.
    pub fn is_synced(&self) -> bool {
        self.backend_id.is_some()
    }

    /// Exportable state, in the shape the POS server accepts.
    pub fn export(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Rebuild an order from its exported state.
    ///
    /// An absent SMS phone is pre-filled from the linked contact. The result
    /// is stored trimmed, like any other write of the field.
    pub fn import(value: Value) -> Result<Self, serde_json::Error> {
        let mut order: Order = serde_json::from_value(value)?;
        let phone = non_blank(order.sms_phone.as_deref())
            .or_else(|| order.contact.as_ref().and_then(Contact::derived_phone))
            .unwrap_or_default()
            .to_owned();
        crate::phone::set(&mut order, &phone);
        Ok(order)
    }
}

pub(crate) fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contact(mobile: Option<&str>, phone: Option<&str>) -> Contact {
        Contact {
            id: 7,
            name: "Jane Smith".into(),
            mobile: mobile.map(Into::into),
            phone: phone.map(Into::into),
        }
    }

    #[test]
    fn newtype_display() {
        assert_eq!(LocalOrderId::from("00001-001-0001").to_string(), "00001-001-0001");
        assert_eq!(BackendOrderId(42).to_string(), "42");
    }

    #[test]
    fn derived_phone_prefers_mobile_and_skips_blank() {
        assert_eq!(contact(Some("+4511"), Some("+4522")).derived_phone(), Some("+4511"));
        assert_eq!(contact(Some("  "), Some("+4522")).derived_phone(), Some("+4522"));
        assert_eq!(contact(None, None).derived_phone(), None);
    }

    #[test]
    fn export_uses_pos_field_names() {
        let mut order = Order::new("uid-1", "Shop/0001");
        order.backend_id = Some(BackendOrderId(9));
        order.sms_phone = Some("+4512345678".into());
        let value = order.export().expect("export");
        assert_eq!(value["uid"], json!("uid-1"));
        assert_eq!(value["server_id"], json!(9));
        assert_eq!(value["phone_for_sms_receipt"], json!("+4512345678"));
        assert_eq!(value["is_sms_receipt_sent"], json!(false));
    }

    #[test]
    fn import_prefills_phone_from_contact() {
        let mut order = Order::new("uid-2", "Shop/0002");
        order.contact = Some(contact(None, Some("+45 33 33 33 33")));
        let value = order.export().expect("export");
        let imported = Order::import(value).expect("import");
        assert_eq!(imported.sms_phone.as_deref(), Some("+45 33 33 33 33"));
    }

    #[test]
    fn import_keeps_explicit_phone() {
        let mut order = Order::new("uid-3", "Shop/0003");
        order.contact = Some(contact(Some("+4511"), None));
        order.sms_phone = Some("+4599".into());
        let imported = Order::import(order.export().expect("export")).expect("import");
        assert_eq!(imported.sms_phone.as_deref(), Some("+4599"));
    }

    #[test]
    fn import_trims_prefilled_and_explicit_phone() {
        let mut order = Order::new("uid-4", "Shop/0004");
        order.contact = Some(contact(Some(" +4511111111 "), None));
        let imported = Order::import(order.export().expect("export")).expect("import");
        assert_eq!(imported.sms_phone.as_deref(), Some("+4511111111"));

        order.sms_phone = Some("  +4599  ".into());
        let imported = Order::import(order.export().expect("export")).expect("import");
        assert_eq!(imported.sms_phone.as_deref(), Some("+4599"));

        order.contact = None;
        order.sms_phone = Some("   ".into());
        let imported = Order::import(order.export().expect("export")).expect("import");
        assert_eq!(imported.sms_phone, None);
    }
}
