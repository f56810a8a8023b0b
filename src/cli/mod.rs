//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `hostsweep inventory` - Build the host inventory
//! - `hostsweep range <cidr>` - Preview what a sweep would cover
//! - `hostsweep settings show|init` - Inspect or create the settings file

mod inventory;
mod range;
mod settings;

pub use inventory::InventoryCommand;
pub use range::RangeCommand;
pub use settings::{SettingsAction, SettingsCommand};

use crate::config::AppSettings;
use crate::error::CliResult;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// hostsweep - local network host inventory.
///
/// Reads the neighbor/ARP tables, optionally ping-sweeps a subnet and
/// resolves hostnames, and writes one record per IPv4 address.
#[derive(Parser, Debug)]
#[command(name = "hostsweep")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inventory the hosts on your local network segment", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (progress bar and debug logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to custom settings file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover hosts and write the inventory file
    #[command(alias = "inv")]
    Inventory(InventoryCommand),

    /// Show the usable host range of a subnet without probing it
    #[command(alias = "r")]
    Range(RangeCommand),

    /// Inspect or create the settings file
    Settings(SettingsCommand),
}

impl Cli {
    /// Dispatch to the selected subcommand.
    pub async fn execute(&self) -> CliResult<()> {
        match &self.command {
            Commands::Inventory(cmd) => {
                let settings = AppSettings::resolve(self.config.as_deref())?;
                cmd.execute(&settings, self.verbose, self.quiet).await
            }
            Commands::Range(cmd) => cmd.execute(),
            Commands::Settings(cmd) => cmd.execute(self.config.as_deref()),
        }
    }
}

/// Output format for the inventory file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// Comma-separated values with a header row
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jsonl => write!(f, "jsonl"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inventory() {
        let cli = Cli::try_parse_from([
            "hostsweep",
            "inventory",
            "--active",
            "--subnet",
            "192.168.1.0/24",
            "--format",
            "csv",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Inventory(cmd) => {
                assert!(cmd.active);
                assert_eq!(cmd.subnet.as_deref(), Some("192.168.1.0/24"));
                assert_eq!(cmd.format, Some(OutputFormat::Csv));
                assert_eq!(cmd.workers, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["hostsweep", "-v", "-q", "range", "10.0.0.0/24"]).is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Jsonl.to_string(), "jsonl");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }
}
