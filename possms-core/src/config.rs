//! POS-side configuration for SMS receipts.
//!
//! # Storage layout
//!
//! ```text
//! ~/.possms/
//!   config.yaml      (mode 0600)
//!   templates/       (optional receipt template overrides, *.tera)
//! ```
//!
//! # API pattern
//!
//! Every filesystem function has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, StoreError};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8069";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Root of `config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PosConfig {
    /// Cashiers only get the SMS option when this is set.
    #[serde(default)]
    pub enable_sms_receipt: bool,
    #[serde(default)]
    pub backend: BackendConfig,
    /// Gateway account name passed through to the server; server default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_gateway: Option<String>,
    #[serde(default)]
    pub company: CompanyInfo,
    #[serde(default)]
    pub receipt: ReceiptSections,
}

impl PosConfig {
    pub fn sms_enabled(&self) -> bool {
        self.enable_sms_receipt
    }
}

/// Where the POS server lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
            database: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Company header printed on receipts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Section toggles for the SMS receipt body. All on by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptSections {
    pub show_company_info: bool,
    pub show_separator: bool,
    pub show_order_info: bool,
    pub show_items: bool,
    pub show_total: bool,
    pub show_tax: bool,
    pub show_customer: bool,
    pub show_footer: bool,
}

impl Default for ReceiptSections {
    fn default() -> Self {
        Self {
            show_company_info: true,
            show_separator: true,
            show_order_info: true,
            show_items: true,
            show_total: true,
            show_tax: true,
            show_customer: true,
            show_footer: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<home>/.possms/`
pub fn root_dir_at(home: &Path) -> PathBuf {
    home.join(".possms")
}

/// `<home>/.possms/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    root_dir_at(home).join("config.yaml")
}

/// `<home>/.possms/templates/` — pure, no I/O.
pub fn templates_dir_at(home: &Path) -> PathBuf {
    root_dir_at(home).join("templates")
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load `<home>/.possms/config.yaml`.
///
/// Returns `StoreError::ConfigNotFound` if absent,
/// `StoreError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(home: &Path) -> Result<PosConfig, StoreError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Err(StoreError::ConfigNotFound { path });
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<PosConfig, StoreError> {
    load_at(&home()?)
}

/// Atomically save the config: serialize → `.yaml.tmp` → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, config: &PosConfig) -> Result<(), StoreError> {
    let dir = root_dir_at(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        set_dir_permissions(&dir)?;
    }
    let path = config_path_at(home);
    let tmp = path.with_file_name("config.yaml.tmp");
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(config: &PosConfig) -> Result<(), StoreError> {
    save_at(&home()?, config)
}

/// Write `config` unless a config already exists, in which case the existing
/// one is returned unchanged.
pub fn init_at(home: &Path, config: PosConfig) -> Result<PosConfig, StoreError> {
    if config_path_at(home).exists() {
        return load_at(home);
    }
    save_at(home, &config)?;
    Ok(config)
}

/// `init_at` convenience wrapper.
pub fn init(config: PosConfig) -> Result<PosConfig, StoreError> {
    init_at(&home()?, config)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

pub(crate) fn home() -> Result<PathBuf, StoreError> {
    dirs::home_dir().ok_or(StoreError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(unix)]
pub(crate) fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
pub(crate) fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
