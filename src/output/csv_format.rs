//! CSV output formatting.

use crate::error::OutputResult;
use crate::types::HostRecord;
use std::io::Write;

/// Column order of the CSV export.
pub const CSV_HEADER: [&str; 6] = ["ip", "mac", "hostname", "reachable", "seen_via", "timestamp"];

/// Write records as CSV with a header row. Absent fields are empty cells.
pub fn write_csv<W: Write>(out: W, records: &[HostRecord]) -> OutputResult<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(CSV_HEADER)?;

    for record in records {
        wtr.write_record([
            record.address.to_string(),
            record
                .hardware_address
                .map_or(String::new(), |mac| mac.to_string()),
            record.hostname.clone().unwrap_or_default(),
            record.reachable.map_or(String::new(), |up| up.to_string()),
            record.discovery_method.to_string(),
            record.timestamp(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DiscoveryMethod, HardwareAddress};
    use chrono::{TimeZone, Utc};
    use std::net::Ipv4Addr;

    #[test]
    fn test_csv_rows() {
        let observed_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let records = vec![
            HostRecord {
                address: Ipv4Addr::new(10, 0, 0, 1),
                hardware_address: HardwareAddress::parse("aa:bb:cc:dd:ee:ff"),
                hostname: Some("gw, main".to_string()),
                reachable: Some(false),
                discovery_method: DiscoveryMethod::ArpTable,
                observed_at,
            },
            HostRecord {
                address: Ipv4Addr::new(10, 0, 0, 2),
                hardware_address: None,
                hostname: None,
                reachable: None,
                discovery_method: DiscoveryMethod::NeighborTable,
                observed_at,
            },
        ];

        let mut buf = Vec::new();
        write_csv(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "ip,mac,hostname,reachable,seen_via,timestamp\n\
             10.0.0.1,aa:bb:cc:dd:ee:ff,\"gw, main\",false,arp,2024-01-02T03:04:05Z\n\
             10.0.0.2,,,,neigh,2024-01-02T03:04:05Z\n"
        );
    }
}
