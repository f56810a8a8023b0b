//! Range subcommand implementation.
//!
//! Handles `hostsweep range <cidr>`: applies the same guards as an active
//! sweep and reports what would be probed, without sending anything.

use crate::error::CliResult;
use crate::output;
use crate::types::HostRange;
use clap::Parser;

/// Show the usable host range of a subnet.
#[derive(Parser, Debug)]
pub struct RangeCommand {
    /// IPv4 subnet in CIDR notation
    #[arg(value_name = "CIDR")]
    pub subnet: String,

    /// Print every usable host address
    #[arg(short, long)]
    pub list: bool,
}

impl RangeCommand {
    /// Execute the range command.
    pub fn execute(&self) -> CliResult<()> {
        let range = HostRange::parse(&self.subnet)?;

        if self.list {
            for host in range.iter() {
                println!("{}", host);
            }
        } else {
            output::print_range_summary(&range);
        }

        Ok(())
    }
}
