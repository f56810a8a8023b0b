//! Subnet expansion with safety guards.
//!
//! Turns an IPv4 CIDR specifier into the list of usable host addresses,
//! refusing degenerate prefixes and ranges above a hard host ceiling.

use crate::error::RangeError;
use ipnetwork::Ipv4Network;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// A validated IPv4 range whose usable hosts are safe to sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostRange {
    network: Ipv4Network,
}

impl HostRange {
    /// Shortest accepted prefix length.
    pub const MIN_PREFIX: u8 = 8;
    /// Longest accepted prefix length.
    pub const MAX_PREFIX: u8 = 30;
    /// Absolute ceiling on usable hosts, independent of the prefix guard.
    pub const MAX_HOSTS: u64 = 4096;

    /// Parse and validate a CIDR specifier such as `192.168.1.0/24`.
    ///
    /// Host bits in the address part are ignored, so `192.168.1.77/24`
    /// describes the same range as `192.168.1.0/24`.
    pub fn parse(spec: &str) -> Result<Self, RangeError> {
        let spec = spec.trim();
        if !spec.contains('/') {
            return Err(RangeError::InvalidRange(spec.to_string()));
        }

        let parsed: Ipv4Network = spec
            .parse()
            .map_err(|_| RangeError::InvalidRange(spec.to_string()))?;

        let prefix = parsed.prefix();
        if !(Self::MIN_PREFIX..=Self::MAX_PREFIX).contains(&prefix) {
            return Err(RangeError::UnsafePrefixLength(prefix));
        }

        // Normalise to the network address.
        let network = Ipv4Network::new(parsed.network(), prefix)
            .map_err(|_| RangeError::InvalidRange(spec.to_string()))?;

        let range = Self { network };
        let count = range.host_count();
        if count > Self::MAX_HOSTS {
            return Err(RangeError::RangeTooLarge {
                count,
                max: Self::MAX_HOSTS,
            });
        }

        Ok(range)
    }

    /// The network address (excluded from the sweep).
    pub fn network_address(&self) -> Ipv4Addr {
        self.network.network()
    }

    /// The broadcast address (excluded from the sweep).
    pub fn broadcast_address(&self) -> Ipv4Addr {
        self.network.broadcast()
    }

    /// Prefix length.
    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    /// Number of addresses strictly between network and broadcast.
    pub fn host_count(&self) -> u64 {
        let network = u32::from(self.network_address()) as u64;
        let broadcast = u32::from(self.broadcast_address()) as u64;
        broadcast.saturating_sub(network).saturating_sub(1)
    }

    /// Iterate the usable hosts in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> {
        let first = u32::from(self.network_address()) + 1;
        let broadcast = u32::from(self.broadcast_address());
        (first..broadcast).map(Ipv4Addr::from)
    }

    /// Collect the usable hosts in ascending order.
    pub fn hosts(&self) -> Vec<Ipv4Addr> {
        self.iter().collect()
    }
}

impl FromStr for HostRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HostRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network_address(), self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slash_30_has_two_hosts() {
        let range = HostRange::parse("192.168.1.0/30").unwrap();
        assert_eq!(
            range.hosts(),
            vec![Ipv4Addr::new(192, 168, 1, 1), Ipv4Addr::new(192, 168, 1, 2)]
        );
    }

    #[test]
    fn test_host_count_matches_enumeration() {
        for prefix in 20..=30u8 {
            let range = HostRange::parse(&format!("10.20.0.0/{}", prefix)).unwrap();
            let hosts = range.hosts();
            let network = u32::from(range.network_address());
            let broadcast = u32::from(range.broadcast_address());

            assert_eq!(hosts.len() as u64, (broadcast - network - 1) as u64);
            assert_eq!(hosts.len() as u64, range.host_count());

            let unique: HashSet<_> = hosts.iter().copied().collect();
            assert_eq!(unique.len(), hosts.len());
            assert!(!unique.contains(&range.network_address()));
            assert!(!unique.contains(&range.broadcast_address()));
        }
    }

    #[test]
    fn test_host_bits_are_masked() {
        let range = HostRange::parse("192.168.1.77/24").unwrap();
        assert_eq!(range.network_address(), Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(range.to_string(), "192.168.1.0/24");
        assert_eq!(range.host_count(), 254);
    }

    #[test]
    fn test_prefix_guard() {
        assert_eq!(
            HostRange::parse("10.0.0.0/7"),
            Err(RangeError::UnsafePrefixLength(7))
        );
        assert_eq!(
            HostRange::parse("10.0.0.0/31"),
            Err(RangeError::UnsafePrefixLength(31))
        );
        assert_eq!(
            HostRange::parse("10.0.0.1/32"),
            Err(RangeError::UnsafePrefixLength(32))
        );

        // /8 passes the prefix guard and is then stopped by the host ceiling.
        assert!(matches!(
            HostRange::parse("10.0.0.0/8"),
            Err(RangeError::RangeTooLarge { .. })
        ));
    }

    #[test]
    fn test_range_too_large() {
        assert_eq!(
            HostRange::parse("172.16.0.0/16"),
            Err(RangeError::RangeTooLarge {
                count: 65534,
                max: 4096
            })
        );
        // /20 is the widest prefix under the ceiling.
        assert_eq!(HostRange::parse("172.16.0.0/20").unwrap().host_count(), 4094);
        assert!(HostRange::parse("172.16.0.0/19").is_err());
    }

    #[test]
    fn test_invalid_range() {
        for spec in ["", "not-a-net", "192.168.1.0", "300.1.1.0/24", "10.0.0.0/33", "fe80::/64"] {
            assert!(
                matches!(HostRange::parse(spec), Err(RangeError::InvalidRange(_))),
                "expected InvalidRange for {:?}",
                spec
            );
        }
    }
}
