//! Passive neighbor discovery.
//!
//! Reads what the operating system already knows about its neighbors,
//! without sending any traffic. The neighbor table (`ip neigh`) is preferred;
//! the ARP table is the fallback when it yields nothing. Missing or failing
//! commands produce an empty snapshot, never an error.

mod parse;

pub use parse::{parse_arp_table, parse_ip_neigh};

use crate::types::PassiveSnapshot;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default limit on how long a table command may run.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// A source of passive neighbor evidence.
#[async_trait]
pub trait NeighborSource: Send + Sync {
    /// Read the current neighbor evidence, keyed by address.
    async fn snapshot(&self) -> PassiveSnapshot;
}

/// Reads the host's own neighbor and ARP tables via OS commands.
#[derive(Debug, Clone)]
pub struct SystemNeighborTable {
    command_timeout: Duration,
}

impl SystemNeighborTable {
    /// Create a reader whose commands are killed after `command_timeout`.
    pub fn new(command_timeout: Duration) -> Self {
        Self { command_timeout }
    }
}

impl Default for SystemNeighborTable {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

#[async_trait]
impl NeighborSource for SystemNeighborTable {
    async fn snapshot(&self) -> PassiveSnapshot {
        if cfg!(target_os = "windows") {
            let arp = run_command("arp", &["-a"], self.command_timeout).await;
            let snapshot = parse_arp_table(&arp);
            debug!(entries = snapshot.len(), "read arp table");
            return snapshot;
        }

        let neigh = run_command("ip", &["neigh"], self.command_timeout).await;
        let snapshot = parse_ip_neigh(&neigh);
        if !snapshot.is_empty() {
            debug!(entries = snapshot.len(), "read neighbor table");
            return snapshot;
        }

        let arp = run_command("arp", &["-an"], self.command_timeout).await;
        let snapshot = parse_arp_table(&arp);
        debug!(entries = snapshot.len(), "neighbor table empty, read arp table");
        snapshot
    }
}

/// Run `program` and return its stdout, or an empty string on any failure.
async fn run_command(program: &str, args: &[&str], limit: Duration) -> String {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    match timeout(limit, cmd.output()).await {
        Ok(Ok(output)) => {
            if !output.status.success() {
                debug!(program, status = %output.status, "table command exited unsuccessfully");
            }
            String::from_utf8_lossy(&output.stdout).into_owned()
        }
        Ok(Err(e)) => {
            debug!(program, error = %e, "table command unavailable");
            String::new()
        }
        Err(_) => {
            warn!(program, timeout_ms = limit.as_millis() as u64, "table command timed out");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiscoveryMethod;

    #[tokio::test]
    async fn test_missing_command_is_empty() {
        let output = run_command(
            "hostsweep-no-such-binary",
            &["neigh"],
            Duration::from_secs(1),
        )
        .await;
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_system_snapshot_never_fails() {
        // Whatever the host has, reading it must not panic or error.
        let reader = SystemNeighborTable::new(Duration::from_secs(2));
        let snapshot = reader.snapshot().await;
        assert!(snapshot
            .values()
            .all(|evidence| evidence.discovery_method != DiscoveryMethod::ActiveProbe));
    }
}
