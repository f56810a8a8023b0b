//! Error types for hostsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Only configuration,
//! range, and output problems are errors; probe failures, missing OS
//! commands, and DNS failures are absorbed where they happen.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while expanding a subnet into host addresses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid IPv4 network '{0}'")]
    InvalidRange(String),

    #[error("refusing prefix /{0} (use /8 through /30)")]
    UnsafePrefixLength(u8),

    #[error("refusing to scan {count} hosts (max {max}); use a smaller subnet")]
    RangeTooLarge { count: u64, max: u64 },
}

/// Configuration errors, reported before any probing starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("--active requires --subnet (e.g. 192.168.1.0/24)")]
    MissingSubnet,

    #[error("worker count must be at least 1")]
    InvalidWorkers,

    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors writing the inventory file.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("cannot create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Top-level error for CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Range(_) => 2,
            Self::Output(_) | Self::Other(_) => 1,
        }
    }
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type alias for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
