//! `possms preview --order <FILE>`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use possms_core::{config, store, PosConfig, StoreError};
use possms_renderer::ReceiptRenderer;

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Exported order JSON file.
    #[arg(long, value_name = "FILE")]
    pub order: PathBuf,
}

impl PreviewArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home_dir()?;
        // Previewing works before `config init`; company header is then empty.
        let cfg = match config::load_at(&home) {
            Ok(cfg) => cfg,
            Err(StoreError::ConfigNotFound { .. }) => PosConfig::default(),
            Err(err) => return Err(err).context("failed to load config"),
        };
        let order = store::load_order(&self.order)
            .with_context(|| format!("failed to load order {}", self.order.display()))?;

        let renderer = ReceiptRenderer::for_home(&home).context("failed to load receipt templates")?;
        let body = renderer
            .render(&order, &cfg.company, &cfg.receipt)
            .context("failed to render receipt")?;
        println!("{body}");
        Ok(())
    }
}
