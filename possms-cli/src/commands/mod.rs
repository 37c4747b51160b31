pub mod config;
pub mod preview;
pub mod send;
pub mod status;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};

pub(crate) fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}
