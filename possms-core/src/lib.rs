//! possms core library — order types, phone field, validator, config, order files.
//!
//! - [`types`] — newtypes and the [`Order`] model
//! - [`phone`] — per-order SMS destination (derive / set / contact linking)
//! - [`validate`] — phone format gate
//! - [`config`] — `~/.possms/config.yaml`
//! - [`store`] — exported order files
//! - [`error`] — [`StoreError`]

pub mod config;
pub mod error;
pub mod phone;
pub mod store;
pub mod types;
pub mod validate;

pub use config::{BackendConfig, CompanyInfo, PosConfig, ReceiptSections};
pub use error::StoreError;
pub use types::{BackendOrderId, Contact, LocalOrderId, Order, OrderLine, Payment};
pub use validate::{canonicalize, validate, Validity};
