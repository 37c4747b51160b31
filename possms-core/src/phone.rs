//! The per-order SMS destination number.
//!
//! The stored value is either a trimmed, non-empty string or absent. A value
//! typed by the cashier is never replaced by a contact change; only values
//! that still match the previous contact's number are re-derived.

use crate::types::{non_blank, Contact, Order};

/// Candidate destination for `order`: stored phone, contact mobile, contact
/// landline, or the empty string.
pub fn derive(order: &Order) -> String {
    non_blank(order.sms_phone.as_deref())
        .or_else(|| order.contact.as_ref().and_then(Contact::derived_phone))
        .unwrap_or_default()
        .to_owned()
}

/// Store `raw` trimmed. Blank input clears the field.
pub fn set(order: &mut Order, raw: &str) {
    let trimmed = raw.trim();
    order.sms_phone = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    };
}

/// Link (or unlink) a contact and re-derive the SMS phone.
pub fn link_contact(order: &mut Order, contact: Option<Contact>) {
    let previous = std::mem::replace(&mut order.contact, contact);
    let previous_phone = previous
        .as_ref()
        .and_then(Contact::derived_phone)
        .map(str::trim);
    let current = non_blank(order.sms_phone.as_deref()).map(str::trim);
    let auto_derived = match (current, previous_phone) {
        (None, _) => true,
        (Some(cur), Some(prev)) => cur == prev,
        (Some(_), None) => false,
    };
    if !auto_derived {
        return;
    }

    match order.contact.as_ref() {
        Some(next) => {
            let next_phone = next.derived_phone().unwrap_or_default().to_owned();
            set(order, &next_phone);
        }
        None if previous.is_some() => order.sms_phone = None,
        None => {}
    }
}
