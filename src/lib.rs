//! # hostsweep - Local Network Host Inventory
//!
//! hostsweep builds an inventory of the IPv4 hosts on the local segment by
//! combining what the operating system already knows (neighbor/ARP tables)
//! with an optional ping sweep and optional reverse DNS.
//!
//! ## Features
//!
//! - **Passive discovery**: `ip neigh` and `arp` table parsing on Linux, BSD/macOS and Windows
//! - **Opt-in active sweep**: bounded worker pool over a guarded CIDR range
//! - **Evidence merging**: table observations outrank ping results, MACs are never lost
//! - **Reverse DNS**: best-effort, concurrent, time-limited
//! - **Output formats**: JSON Lines and CSV
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use hostsweep::scanner::{run_sweep, PingProber, SweepConfig};
//! use hostsweep::types::HostRange;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let range = HostRange::parse("192.168.1.0/24").unwrap();
//!     let prober = Arc::new(PingProber::new(Duration::from_millis(750)));
//!
//!     let outcomes = run_sweep(prober, range.hosts(), &SweepConfig::new(64)).await;
//!     for addr in outcomes.reachable() {
//!         println!("{} is up", addr);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Host ranges, evidence and output records
//! - [`passive`] - Neighbor/ARP table snapshots
//! - [`scanner`] - Probing and the concurrent sweep
//! - [`merge`] - Combining passive and active evidence
//! - [`dns`] - Hostname enrichment
//! - [`pipeline`] - The end-to-end run
//! - [`output`] - Inventory writers and terminal messages
//! - [`config`] - Settings file handling
//! - [`error`] - Error types and exit codes

pub mod cli;
pub mod config;
pub mod dns;
pub mod error;
pub mod logging;
pub mod merge;
pub mod output;
pub mod passive;
pub mod pipeline;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError, OutputError, RangeError};
pub use merge::{merge_evidence, Inventory};
pub use pipeline::{run_inventory, InventoryReport, RunPlan};
pub use scanner::{run_sweep, Prober, SweepConfig, SweepOutcomes};
pub use types::{DiscoveryMethod, HardwareAddress, HostRange, HostRecord, PassiveEvidence, PassiveSnapshot};
