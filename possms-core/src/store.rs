//! Order files: one exported order as pretty JSON.
//!
//! Reads go through [`Order::import`] so contact pre-fill applies; writes are
//! atomic (`<file>.tmp` sibling → `chmod 0600` → `rename`).

use std::path::{Path, PathBuf};

use crate::config::set_file_permissions;
use crate::error::{io_err, StoreError};
use crate::types::Order;

/// Load an exported order from `path`.
pub fn load_order(path: &Path) -> Result<Order, StoreError> {
    if !path.exists() {
        return Err(StoreError::OrderNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| order_parse(path, e))?;
    Order::import(value).map_err(|e| order_parse(path, e))
}

/// Atomically write `order` to `path` in export form.
pub fn save_order(path: &Path, order: &Order) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = tmp_path(path);
    let json = serde_json::to_string_pretty(&order.export()?)?;
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.tmp", path.display()))
}

fn order_parse(path: &Path, source: serde_json::Error) -> StoreError {
    StoreError::OrderParse {
        path: path.to_path_buf(),
        source,
    }
}
