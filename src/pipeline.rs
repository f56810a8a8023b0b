//! End-to-end inventory run.
//!
//! passive read → (range sweep → passive re-read → merge) → reverse DNS →
//! timestamp. Everything that can fail fatally (range validation,
//! configuration) is settled while building the [`RunPlan`], so a run itself
//! always produces an inventory.

use crate::dns::{enrich_hostnames, ReverseResolver, SystemResolver};
use crate::merge::{merge_evidence, Inventory};
use crate::passive::{NeighborSource, SystemNeighborTable};
use crate::scanner::{run_sweep, PingProber, Prober, SweepConfig};
use crate::types::{completion_time, HostRange, HostRecord};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Parameters of the active sweep.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub range: HostRange,
    pub probe_timeout: Duration,
    pub config: SweepConfig,
}

/// Parameters of hostname enrichment.
#[derive(Debug, Clone, Copy)]
pub struct DnsPlan {
    pub concurrency: usize,
    pub lookup_timeout: Duration,
}

/// A fully validated run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Present when the active sweep is enabled.
    pub sweep: Option<SweepPlan>,
    /// Present when reverse DNS is enabled.
    pub dns: Option<DnsPlan>,
    /// Limit for passive table commands.
    pub command_timeout: Duration,
}

/// The data sources and probes a run talks to.
pub struct Collaborators {
    pub neighbors: Box<dyn NeighborSource>,
    pub prober: Arc<dyn Prober>,
    pub resolver: Option<Box<dyn ReverseResolver>>,
}

impl Collaborators {
    /// The real OS-backed collaborators for `plan`.
    pub fn system(plan: &RunPlan) -> Self {
        let probe_timeout = plan
            .sweep
            .as_ref()
            .map_or(Duration::from_millis(750), |sweep| sweep.probe_timeout);

        Self {
            neighbors: Box::new(SystemNeighborTable::new(plan.command_timeout)),
            prober: Arc::new(PingProber::new(probe_timeout)),
            resolver: plan
                .dns
                .map(|dns| Box::new(SystemResolver::new(dns.lookup_timeout)) as Box<dyn ReverseResolver>),
        }
    }
}

/// Result of a run.
#[derive(Debug, Clone)]
pub struct InventoryReport {
    /// Final records, sorted by address.
    pub records: Vec<HostRecord>,
    /// Addresses probed by the sweep (0 when passive only).
    pub swept: usize,
    /// Addresses that answered the sweep.
    pub reachable: usize,
}

/// Execute `plan` against `collaborators`.
pub async fn run_inventory(plan: &RunPlan, collaborators: &Collaborators) -> InventoryReport {
    info!("reading passive neighbor tables");
    let pre_sweep = collaborators.neighbors.snapshot().await;
    info!(entries = pre_sweep.len(), "passive snapshot taken");

    let (mut inventory, swept, reachable) = match &plan.sweep {
        Some(sweep) => {
            let hosts = sweep.range.hosts();
            let outcomes = run_sweep(Arc::clone(&collaborators.prober), hosts, &sweep.config).await;

            info!("re-reading passive neighbor tables after sweep");
            let post_sweep = collaborators.neighbors.snapshot().await;

            let inventory = merge_evidence(&pre_sweep, &outcomes, &post_sweep);
            (inventory, outcomes.len(), outcomes.reachable_count())
        }
        None => (Inventory::from_passive(&pre_sweep), 0, 0),
    };

    if let (Some(dns), Some(resolver)) = (plan.dns, collaborators.resolver.as_deref()) {
        enrich_hostnames(&mut inventory, resolver, dns.concurrency).await;
    }

    let records = inventory.into_records(completion_time());
    info!(records = records.len(), swept, reachable, "inventory complete");

    InventoryReport {
        records,
        swept,
        reachable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DiscoveryMethod, HardwareAddress, PassiveEvidence, PassiveSnapshot};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::net::Ipv4Addr;
    use std::sync::Mutex;

    /// Returns scripted snapshots in order, repeating the last one.
    struct ScriptedNeighbors {
        snapshots: Mutex<Vec<PassiveSnapshot>>,
        reads: Mutex<usize>,
    }

    impl ScriptedNeighbors {
        fn new(snapshots: Vec<PassiveSnapshot>) -> Self {
            Self {
                snapshots: Mutex::new(snapshots),
                reads: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl NeighborSource for ScriptedNeighbors {
        async fn snapshot(&self) -> PassiveSnapshot {
            let mut reads = self.reads.lock().unwrap();
            let snapshots = self.snapshots.lock().unwrap();
            let index = (*reads).min(snapshots.len().saturating_sub(1));
            *reads += 1;
            snapshots.get(index).cloned().unwrap_or_default()
        }
    }

    struct SetProber {
        up: HashSet<Ipv4Addr>,
    }

    #[async_trait]
    impl Prober for SetProber {
        async fn probe(&self, addr: Ipv4Addr) -> bool {
            self.up.contains(&addr)
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(1)
        }
    }

    struct MapResolver(HashMap<Ipv4Addr, String>);

    #[async_trait]
    impl ReverseResolver for MapResolver {
        async fn reverse_lookup(&self, addr: Ipv4Addr) -> Option<String> {
            self.0.get(&addr).cloned()
        }
    }

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    fn gateway_snapshot() -> PassiveSnapshot {
        PassiveSnapshot::from([(
            ip("192.168.1.1"),
            PassiveEvidence::new(
                HardwareAddress::parse("aa:bb:cc:dd:ee:ff"),
                DiscoveryMethod::NeighborTable,
            ),
        )])
    }

    fn sweep_plan(cidr: &str) -> SweepPlan {
        SweepPlan {
            range: HostRange::parse(cidr).unwrap(),
            probe_timeout: Duration::from_millis(1),
            config: SweepConfig::new(4),
        }
    }

    #[tokio::test]
    async fn test_active_run_end_to_end() {
        let plan = RunPlan {
            sweep: Some(sweep_plan("192.168.1.0/30")),
            dns: None,
            command_timeout: Duration::from_secs(1),
        };
        let collaborators = Collaborators {
            neighbors: Box::new(ScriptedNeighbors::new(vec![gateway_snapshot()])),
            prober: Arc::new(SetProber {
                up: HashSet::from([ip("192.168.1.1")]),
            }),
            resolver: None,
        };

        let report = run_inventory(&plan, &collaborators).await;

        assert_eq!(report.swept, 2);
        assert_eq!(report.reachable, 1);
        assert_eq!(report.records.len(), 1);

        let gateway = &report.records[0];
        assert_eq!(gateway.address, ip("192.168.1.1"));
        assert_eq!(
            gateway.hardware_address.map(|m| m.to_string()).as_deref(),
            Some("aa:bb:cc:dd:ee:ff")
        );
        assert_eq!(gateway.discovery_method, DiscoveryMethod::NeighborTable);
        assert_eq!(gateway.reachable, Some(true));
    }

    #[tokio::test]
    async fn test_post_sweep_read_fills_mac() {
        let post = PassiveSnapshot::from([(
            ip("10.9.0.2"),
            PassiveEvidence::new(
                HardwareAddress::parse("02:00:00:00:00:02"),
                DiscoveryMethod::NeighborTable,
            ),
        )]);
        let plan = RunPlan {
            sweep: Some(sweep_plan("10.9.0.0/29")),
            dns: None,
            command_timeout: Duration::from_secs(1),
        };
        let neighbors = ScriptedNeighbors::new(vec![PassiveSnapshot::new(), post]);
        let collaborators = Collaborators {
            neighbors: Box::new(neighbors),
            prober: Arc::new(SetProber {
                up: HashSet::from([ip("10.9.0.2"), ip("10.9.0.5")]),
            }),
            resolver: None,
        };

        let report = run_inventory(&plan, &collaborators).await;

        assert_eq!(report.swept, 6);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].discovery_method, DiscoveryMethod::NeighborTable);
        assert!(report.records[0].hardware_address.is_some());
        assert_eq!(report.records[1].discovery_method, DiscoveryMethod::ActiveProbe);
        assert!(report.records[1].hardware_address.is_none());
    }

    #[tokio::test]
    async fn test_passive_only_run_with_dns() {
        let plan = RunPlan {
            sweep: None,
            dns: Some(DnsPlan {
                concurrency: 2,
                lookup_timeout: Duration::from_millis(10),
            }),
            command_timeout: Duration::from_secs(1),
        };
        let collaborators = Collaborators {
            neighbors: Box::new(ScriptedNeighbors::new(vec![gateway_snapshot()])),
            prober: Arc::new(SetProber { up: HashSet::new() }),
            resolver: Some(Box::new(MapResolver(HashMap::from([(
                ip("192.168.1.1"),
                "router.lan".to_string(),
            )])))),
        };

        let report = run_inventory(&plan, &collaborators).await;

        assert_eq!(report.swept, 0);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].hostname.as_deref(), Some("router.lan"));
        assert_eq!(report.records[0].reachable, None);
    }

    #[tokio::test]
    async fn test_all_records_share_timestamp() {
        let mut snapshot = gateway_snapshot();
        snapshot.insert(
            ip("192.168.1.7"),
            PassiveEvidence::new(None, DiscoveryMethod::NeighborTable),
        );
        let plan = RunPlan {
            sweep: None,
            dns: None,
            command_timeout: Duration::from_secs(1),
        };
        let collaborators = Collaborators {
            neighbors: Box::new(ScriptedNeighbors::new(vec![snapshot])),
            prober: Arc::new(SetProber { up: HashSet::new() }),
            resolver: None,
        };

        let report = run_inventory(&plan, &collaborators).await;
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].observed_at, report.records[1].observed_at);
    }
}
