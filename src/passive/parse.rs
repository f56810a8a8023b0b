//! Parsers for OS neighbor and ARP table listings.
//!
//! All parsers are lenient: lines that do not describe an IPv4 neighbor are
//! skipped rather than reported.

use crate::types::{DiscoveryMethod, HardwareAddress, PassiveEvidence, PassiveSnapshot};
use std::net::Ipv4Addr;

/// Parse `ip neigh` output.
///
/// ```text
/// 192.168.1.1 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE
/// 192.168.1.9 dev eth0  FAILED
/// fe80::1 dev eth0 lladdr aa:bb:cc:dd:ee:ff router STALE
/// ```
///
/// IPv6 rows are skipped. Rows without a usable `lladdr` are kept with no
/// hardware address.
pub fn parse_ip_neigh(output: &str) -> PassiveSnapshot {
    let mut snapshot = PassiveSnapshot::new();

    for line in output.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            continue;
        }
        let Ok(addr) = fields[0].parse::<Ipv4Addr>() else {
            continue;
        };

        let mac = fields
            .windows(2)
            .find(|pair| pair[0] == "lladdr")
            .and_then(|pair| HardwareAddress::parse(pair[1]));

        snapshot.insert(addr, PassiveEvidence::new(mac, DiscoveryMethod::NeighborTable));
    }

    snapshot
}

/// Parse `arp -an` (BSD, macOS, net-tools) or `arp -a` (Windows) output.
///
/// ```text
/// ? (192.168.1.1) at aa:bb:cc:dd:ee:ff on en0 ifscope [ethernet]
/// ? (192.168.1.7) at (incomplete) on en0 ifscope [ethernet]
///   192.168.1.1           aa-bb-cc-dd-ee-ff     dynamic
/// ```
pub fn parse_arp_table(output: &str) -> PassiveSnapshot {
    let mut snapshot = PassiveSnapshot::new();

    for line in output.lines() {
        let parsed = parse_bsd_arp_line(line).or_else(|| parse_windows_arp_line(line));
        if let Some((addr, mac)) = parsed {
            snapshot.insert(addr, PassiveEvidence::new(mac, DiscoveryMethod::ArpTable));
        }
    }

    snapshot
}

/// `? (ip) at mac ...`
fn parse_bsd_arp_line(line: &str) -> Option<(Ipv4Addr, Option<HardwareAddress>)> {
    let open = line.find('(')?;
    let close = open + line[open..].find(')')?;
    let at = line.find(" at ")?;
    if at < close {
        return None;
    }

    let addr = line[open + 1..close].trim().parse::<Ipv4Addr>().ok()?;
    let mac = line[at + 4..]
        .split_whitespace()
        .next()
        .and_then(HardwareAddress::parse);

    Some((addr, mac))
}

/// `ip  aa-bb-cc-dd-ee-ff  dynamic`; rows without a valid MAC are dropped.
fn parse_windows_arp_line(line: &str) -> Option<(Ipv4Addr, Option<HardwareAddress>)> {
    let mut fields = line.split_whitespace();
    let addr = fields.next()?.parse::<Ipv4Addr>().ok()?;
    let mac = HardwareAddress::parse(fields.next()?)?;
    Some((addr, Some(mac)))
}
