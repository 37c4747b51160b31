//! `possms send --order <FILE> [--phone P] [--offline] [--json]`
//!
//! Runs one receipt dispatch against the configured POS server and writes the
//! order file back, so the phone, server id and sent flag survive a failed
//! attempt.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use possms_core::{config, phone, store, BackendOrderId};
use possms_dispatch::{
    ConnectivityFlag, JsonRpcBackend, OrderHandle, ReceiptController, Status,
};

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Exported order JSON file.
    #[arg(long, value_name = "FILE")]
    pub order: PathBuf,

    /// Destination phone. Defaults to the order's SMS phone, then the customer's.
    #[arg(long)]
    pub phone: Option<String>,

    /// Treat the device as offline.
    #[arg(long)]
    pub offline: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct SendReport<'a> {
    order: &'a str,
    phone: &'a str,
    server_id: Option<BackendOrderId>,
    status: &'a Status,
}

impl SendArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home_dir()?;
        let cfg = config::load_at(&home)
            .context("failed to load config — run `possms config init` first")?;
        if !cfg.sms_enabled() {
            bail!(
                "SMS receipts are disabled; set `enable_sms_receipt: true` in {}",
                config::config_path_at(&home).display()
            );
        }

        let order = store::load_order(&self.order)
            .with_context(|| format!("failed to load order {}", self.order.display()))?;
        tracing::info!(
            path = %self.order.display(),
            order = %order.local_id,
            synced = order.is_synced(),
            "loaded order file"
        );
        let phone = self.phone.unwrap_or_else(|| phone::derive(&order));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;

        let controller = ReceiptController::new(
            JsonRpcBackend::new(&cfg.backend).with_sms_gateway(cfg.sms_gateway.clone()),
            ConnectivityFlag::new(!self.offline),
        );
        let handle = OrderHandle::new(order);

        let (status, order) = runtime.block_on(async {
            let status = controller.send_receipt(Some(&handle), &phone).await;
            (status, handle.snapshot().await)
        });
        let Some(status) = status else {
            bail!("a receipt dispatch for this order is already in flight");
        };

        store::save_order(&self.order, &order)
            .with_context(|| format!("failed to write order {}", self.order.display()))?;
        tracing::info!(
            path = %self.order.display(),
            server_id = ?order.backend_id,
            sent = order.sms_receipt_sent,
            "saved order file"
        );

        if self.json {
            let report = SendReport {
                order: &order.local_id.0,
                phone: order.sms_phone.as_deref().unwrap_or_default(),
                server_id: order.backend_id,
                status: &status,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize send JSON")?
            );
        } else {
            match &status {
                Status::Succeeded(to) => {
                    println!("{} SMS receipt for {} sent to {to}", "✓".green(), order.name)
                }
                Status::Failed(message) => {
                    println!("{} {}", "✗".red(), message.red())
                }
                other => println!("{other}"),
            }
        }

        if let Status::Failed(message) = status {
            bail!("SMS receipt not sent: {message}");
        }
        Ok(())
    }
}
