//! # possms-renderer
//!
//! Tera-based rendering of the SMS receipt body sent to customers.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use possms_core::{CompanyInfo, Order, ReceiptSections};
//! use possms_renderer::ReceiptRenderer;
//!
//! fn preview(order: &Order, company: &CompanyInfo) {
//!     if let Ok(renderer) = ReceiptRenderer::embedded() {
//!         if let Ok(body) = renderer.render(order, company, &ReceiptSections::default()) {
//!             println!("{body}");
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::ReceiptContext;
pub use engine::{ReceiptRenderer, Section};
pub use error::RenderError;
