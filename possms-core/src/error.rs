//! Error types for possms-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from config and order-file operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Config YAML failed to parse — includes file path and serde_yaml line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Order file is not valid order JSON.
    #[error("failed to parse order at {path}: {source}")]
    OrderParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (order export).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.possms/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}; run `possms config init`")]
    ConfigNotFound { path: PathBuf },

    /// The order file did not exist.
    #[error("order file not found at {path}")]
    OrderNotFound { path: PathBuf },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
