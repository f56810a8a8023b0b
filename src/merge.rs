//! Evidence merging.
//!
//! Combines the pre-sweep passive snapshot, the sweep outcomes, and the
//! post-sweep passive snapshot into one entry per address. Discovery methods
//! are compared by [`DiscoveryMethod::rank`]: an entry can be upgraded from
//! `ping` to a passive source but never the other way round. A hardware
//! address, once known, is never overwritten.

use crate::scanner::SweepOutcomes;
use crate::types::{DiscoveryMethod, HardwareAddress, HostRecord, PassiveEvidence, PassiveSnapshot};
use chrono::{DateTime, Utc};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

/// Everything known about one address before the run is stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub hardware_address: Option<HardwareAddress>,
    pub hostname: Option<String>,
    pub reachable: Option<bool>,
    pub discovery_method: DiscoveryMethod,
}

impl From<PassiveEvidence> for HostEntry {
    fn from(evidence: PassiveEvidence) -> Self {
        Self {
            hardware_address: evidence.hardware_address,
            hostname: None,
            reachable: None,
            discovery_method: evidence.discovery_method,
        }
    }
}

/// The working record set of a single run, keyed and ordered by address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    hosts: BTreeMap<Ipv4Addr, HostEntry>,
}

impl Inventory {
    /// Start from a passive snapshot, unchanged.
    pub fn from_passive(snapshot: &PassiveSnapshot) -> Self {
        Self {
            hosts: snapshot
                .iter()
                .map(|(addr, evidence)| (*addr, HostEntry::from(*evidence)))
                .collect(),
        }
    }

    /// Create `ping` entries for reachable addresses not already known.
    pub fn add_reachable(&mut self, outcomes: &SweepOutcomes) {
        for addr in outcomes.reachable() {
            self.hosts.entry(addr).or_insert_with(|| HostEntry {
                hardware_address: None,
                hostname: None,
                reachable: None,
                discovery_method: DiscoveryMethod::ActiveProbe,
            });
        }
    }

    /// Fold a later passive snapshot into the set.
    ///
    /// Unknown addresses are adopted as-is. Known addresses gain a hardware
    /// address only if they had none, and their discovery method only moves
    /// to a higher rank.
    pub fn absorb_passive(&mut self, snapshot: &PassiveSnapshot) {
        for (addr, evidence) in snapshot {
            match self.hosts.entry(*addr) {
                Entry::Vacant(slot) => {
                    slot.insert(HostEntry::from(*evidence));
                }
                Entry::Occupied(mut slot) => {
                    let host = slot.get_mut();
                    if host.hardware_address.is_none() {
                        host.hardware_address = evidence.hardware_address;
                    }
                    if evidence.discovery_method.rank() > host.discovery_method.rank() {
                        host.discovery_method = evidence.discovery_method;
                    }
                }
            }
        }
    }

    /// Attach sweep verdicts to every entry that was part of the sweep.
    pub fn attach_reachability(&mut self, outcomes: &SweepOutcomes) {
        for (addr, host) in self.hosts.iter_mut() {
            if let Some(up) = outcomes.get(*addr) {
                host.reachable = Some(up);
            }
        }
    }

    /// Set the hostname for a known address. Returns false if unknown.
    pub fn set_hostname(&mut self, addr: Ipv4Addr, hostname: String) -> bool {
        match self.hosts.get_mut(&addr) {
            Some(host) => {
                host.hostname = Some(hostname);
                true
            }
            None => false,
        }
    }

    /// Look up one entry.
    pub fn get(&self, addr: Ipv4Addr) -> Option<&HostEntry> {
        self.hosts.get(&addr)
    }

    /// Addresses in ascending order.
    pub fn addresses(&self) -> Vec<Ipv4Addr> {
        self.hosts.keys().copied().collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Stamp every entry with the run's completion time.
    pub fn into_records(self, observed_at: DateTime<Utc>) -> Vec<HostRecord> {
        self.hosts
            .into_iter()
            .map(|(address, host)| HostRecord {
                address,
                hardware_address: host.hardware_address,
                hostname: host.hostname,
                reachable: host.reachable,
                discovery_method: host.discovery_method,
                observed_at,
            })
            .collect()
    }
}

/// Merge the three evidence sources of an active run.
pub fn merge_evidence(
    pre_sweep: &PassiveSnapshot,
    outcomes: &SweepOutcomes,
    post_sweep: &PassiveSnapshot,
) -> Inventory {
    let mut inventory = Inventory::from_passive(pre_sweep);
    inventory.add_reachable(outcomes);
    inventory.absorb_passive(post_sweep);
    inventory.attach_reachability(outcomes);
    inventory
}
