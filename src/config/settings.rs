//! Application settings and paths.
//!
//! Settings live in an XDG-compliant config directory and supply the
//! defaults for every tunable on the `inventory` command.

use crate::cli::OutputFormat;
use crate::dns::{DEFAULT_DNS_CONCURRENCY, DEFAULT_LOOKUP_TIMEOUT};
use crate::error::{ConfigError, ConfigResult};
use crate::passive::DEFAULT_COMMAND_TIMEOUT;
use crate::scanner::DEFAULT_WORKERS;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/hostsweep)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory. Nothing is created.
    pub fn discover() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "hostsweep", "hostsweep").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default number of concurrent probers.
    pub default_workers: usize,
    /// Default per-probe timeout in milliseconds.
    pub default_timeout_ms: u64,
    /// Default inventory file path.
    pub default_output: PathBuf,
    /// Default inventory file format.
    pub default_format: OutputFormat,
    /// Resolve hostnames by default.
    pub reverse_dns: bool,
    /// Maximum probes per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Reverse lookups in flight at once.
    pub dns_concurrency: usize,
    /// Per-lookup timeout in milliseconds.
    pub dns_timeout_ms: u64,
    /// Limit for neighbor/ARP table commands in milliseconds.
    pub command_timeout_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_workers: DEFAULT_WORKERS,
            default_timeout_ms: 750,
            default_output: PathBuf::from("inventory.jsonl"),
            default_format: OutputFormat::Jsonl,
            reverse_dns: false,
            rate_limit: 0,
            dns_concurrency: DEFAULT_DNS_CONCURRENCY,
            dns_timeout_ms: DEFAULT_LOOKUP_TIMEOUT.as_millis() as u64,
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT.as_millis() as u64,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, or defaults if there is no
    /// settings file.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::discover()?.settings_file();

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Load from `path` if given, otherwise from the default location.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Save settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFailed {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
