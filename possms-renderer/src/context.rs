//! Receipt context — serializable rendering payload built from an [`Order`].
//!
//! Amounts are preformatted (two decimals, quantities without decimals) so
//! templates only place text.

use serde::{Deserialize, Serialize};

use possms_core::{CompanyInfo, Order};

use crate::error::RenderError;

/// Payment method printed when the order carries no payments.
pub const DEFAULT_PAYMENT_METHOD: &str = "Kontant";

const ORDER_DATETIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptContext {
    pub company: CompanyCtx,
    pub order: OrderCtx,
    pub items: Vec<ItemCtx>,
    pub total: TotalCtx,
    /// Present only when the order carries tax.
    pub tax: Option<TaxCtx>,
    /// Present only when the order has a named customer.
    pub customer: Option<CustomerCtx>,
    pub footer: FooterCtx,
}

/// Company header; absent fields become empty lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyCtx {
    pub name: String,
    pub phone_line: String,
    pub vat_line: String,
    pub email_line: String,
    pub website_line: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCtx {
    pub name: String,
    pub served_by_line: String,
    pub datetime: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCtx {
    pub product: String,
    pub qty: String,
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalCtx {
    pub total: String,
    pub payment_method: String,
    pub amount: String,
    pub change: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxCtx {
    pub tax_amount: String,
    pub tax_base: String,
    pub total: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCtx {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterCtx {
    pub website_line: String,
    pub unique_code: String,
}

fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

fn line_if(value: Option<&str>, render: impl FnOnce(&str) -> String) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(render)
        .unwrap_or_default()
}

impl ReceiptContext {
    pub fn from_order(order: &Order, company: &CompanyInfo) -> Self {
        let customer_name = order
            .contact
            .as_ref()
            .map(|c| c.name.trim())
            .filter(|name| !name.is_empty());

        let items = order
            .lines
            .iter()
            .map(|line| ItemCtx {
                product: line.product.clone(),
                qty: format!("{:.0}", line.qty),
                price: money(line.price_subtotal_incl),
            })
            .collect();

        let total = match order.payments.first() {
            None => TotalCtx {
                total: money(order.amount_total),
                payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
                amount: money(order.amount_total),
                change: money(0.0),
            },
            Some(first) => {
                let paid: f64 = order.payments.iter().map(|p| p.amount).sum();
                TotalCtx {
                    total: money(order.amount_total),
                    payment_method: first.method.clone(),
                    amount: money(paid),
                    change: money((paid - order.amount_total).max(0.0)),
                }
            }
        };

        let tax = (order.amount_tax > 0.0).then(|| TaxCtx {
            tax_amount: money(order.amount_tax),
            tax_base: money(order.amount_total - order.amount_tax),
            total: money(order.amount_total),
        });

        ReceiptContext {
            company: CompanyCtx {
                name: company.name.clone(),
                phone_line: line_if(company.phone.as_deref(), |v| format!("Telefon: {v}")),
                vat_line: line_if(company.vat.as_deref(), |v| format!("CVR: {v}")),
                email_line: line_if(company.email.as_deref(), str::to_string),
                website_line: line_if(company.website.as_deref(), str::to_string),
            },
            order: OrderCtx {
                name: order.name.clone(),
                served_by_line: line_if(customer_name, |v| format!("Betjent af {v}")),
                datetime: order.date_order.format(ORDER_DATETIME_FORMAT).to_string(),
            },
            items,
            total,
            tax,
            customer: customer_name.map(|name| CustomerCtx {
                name: name.to_string(),
            }),
            footer: FooterCtx {
                website_line: line_if(company.website.as_deref(), |v| {
                    format!(
                        "Du kan gå til {v} og brug koden nedenfor til at anmode om en faktura online"
                    )
                }),
                unique_code: order
                    .pos_reference
                    .clone()
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| order.name.clone()),
            },
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
