//! `possms status --order <FILE> [--json]` — SMS fields of one order.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use possms_core::{canonicalize, phone, store, validate, BackendOrderId, Order};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Exported order JSON file.
    #[arg(long, value_name = "FILE")]
    pub order: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct OrderStatusJson {
    uid: String,
    name: String,
    date: String,
    server_id: Option<BackendOrderId>,
    synced: bool,
    customer: Option<String>,
    phone: String,
    phone_validity: String,
    gateway_phone: Option<String>,
    sms_receipt_sent: bool,
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "field")]
    field: &'static str,
    #[tabled(rename = "value")]
    value: String,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let order = store::load_order(&self.order)
            .with_context(|| format!("failed to load order {}", self.order.display()))?;
        let report = build_report(&order);

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        print_table(report);
        Ok(())
    }
}

fn build_report(order: &Order) -> OrderStatusJson {
    let phone = phone::derive(order);
    OrderStatusJson {
        uid: order.local_id.0.clone(),
        name: order.name.clone(),
        date: order
            .date_order
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        server_id: order.backend_id,
        synced: order.is_synced(),
        customer: order.contact.as_ref().map(|c| c.name.clone()),
        phone_validity: validate(&phone).to_string(),
        gateway_phone: canonicalize(&phone),
        phone,
        sms_receipt_sent: order.sms_receipt_sent,
    }
}

fn print_table(report: OrderStatusJson) {
    println!("{} ({})", report.name.bold(), report.uid);

    let sent = if report.sms_receipt_sent {
        "yes".green().to_string()
    } else {
        "no".bright_black().to_string()
    };
    let server = match report.server_id {
        Some(id) => id.to_string(),
        None => "not synced".yellow().to_string(),
    };
    let rows = vec![
        FieldRow { field: "date", value: report.date },
        FieldRow { field: "server id", value: server },
        FieldRow { field: "customer", value: report.customer.unwrap_or_else(|| "-".into()) },
        FieldRow {
            field: "sms phone",
            value: if report.phone.is_empty() { "-".into() } else { report.phone },
        },
        FieldRow { field: "phone check", value: report.phone_validity },
        FieldRow {
            field: "gateway form",
            value: report.gateway_phone.unwrap_or_else(|| "-".into()),
        },
        FieldRow { field: "receipt sent", value: sent },
    ];
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
