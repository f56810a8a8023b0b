//! Host evidence and inventory record types.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use pnet::util::MacAddr;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// How a host was established in the inventory.
///
/// Passive sources always outrank the active probe; see [`DiscoveryMethod::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiscoveryMethod {
    /// Entry from the OS neighbor table (`ip neigh`).
    #[serde(rename = "neigh")]
    NeighborTable,
    /// Entry from the OS ARP table (`arp -an` / `arp -a`).
    #[serde(rename = "arp")]
    ArpTable,
    /// Host answered the ping sweep and was seen nowhere else.
    #[serde(rename = "ping")]
    ActiveProbe,
}

impl DiscoveryMethod {
    /// Informativeness of the source. Higher wins during merge; equal ranks
    /// keep whatever was recorded first.
    pub fn rank(self) -> u8 {
        match self {
            Self::NeighborTable | Self::ArpTable => 1,
            Self::ActiveProbe => 0,
        }
    }

    /// Wire tag used in output files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NeighborTable => "neigh",
            Self::ArpTable => "arp",
            Self::ActiveProbe => "ping",
        }
    }
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated hardware (MAC) address, always rendered lower-case with
/// zero-padded octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HardwareAddress(MacAddr);

impl HardwareAddress {
    /// Parse a MAC written with `:` or `-` separators.
    ///
    /// Returns `None` for placeholders such as `(incomplete)`.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().replace('-', ":");
        MacAddr::from_str(&normalized).ok().map(Self)
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for HardwareAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What a single passive table read knows about one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassiveEvidence {
    pub hardware_address: Option<HardwareAddress>,
    pub discovery_method: DiscoveryMethod,
}

impl PassiveEvidence {
    /// Create passive evidence.
    pub fn new(hardware_address: Option<HardwareAddress>, discovery_method: DiscoveryMethod) -> Self {
        Self {
            hardware_address,
            discovery_method,
        }
    }
}

/// A point-in-time read of the passive tables, keyed by address.
pub type PassiveSnapshot = BTreeMap<Ipv4Addr, PassiveEvidence>;

/// One line of the final inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRecord {
    #[serde(rename = "ip")]
    pub address: Ipv4Addr,
    #[serde(rename = "mac", skip_serializing_if = "Option::is_none")]
    pub hardware_address: Option<HardwareAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reachable: Option<bool>,
    #[serde(rename = "seen_via")]
    pub discovery_method: DiscoveryMethod,
    #[serde(rename = "timestamp", serialize_with = "serialize_timestamp")]
    pub observed_at: DateTime<Utc>,
}

impl HostRecord {
    /// `observed_at` rendered as RFC 3339 UTC with whole seconds.
    pub fn timestamp(&self) -> String {
        format_timestamp(&self.observed_at)
    }
}

/// The current time truncated to whole seconds.
pub fn completion_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}
