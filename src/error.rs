use std::path::PathBuf;

use thiserror::Error;

/// Why a raw input row could not become a [`LoanRecord`](crate::data::model::LoanRecord).
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("missing value for column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("column '{column}': '{value}' is not a binary label (0 or 1)")]
    NotBinary { column: &'static str, value: String },
}

/// Failure to read a dashboard configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("histogram '{name}' needs ascending bin edges")]
    InvalidBins { name: &'static str },

    #[error("page size must be at least 1")]
    ZeroPageSize,
}
