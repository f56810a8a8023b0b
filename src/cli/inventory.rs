//! Inventory subcommand implementation.
//!
//! Handles `hostsweep inventory`: validates options, runs the pipeline and
//! writes the inventory file.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::error::{CliResult, ConfigError};
use crate::output;
use crate::pipeline::{run_inventory, Collaborators, DnsPlan, RunPlan, SweepPlan};
use crate::scanner::SweepConfig;
use crate::types::HostRange;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Discover hosts and write the inventory file.
#[derive(Parser, Debug)]
pub struct InventoryCommand {
    /// IPv4 subnet to sweep (required with --active)
    ///
    /// Examples:
    ///   192.168.1.0/24     254 hosts
    ///   10.0.4.0/22        1022 hosts
    #[arg(short, long, value_name = "CIDR")]
    pub subnet: Option<String>,

    /// Opt in to a ping sweep across --subnet
    #[arg(short, long)]
    pub active: bool,

    /// Best-effort reverse DNS for every record
    #[arg(short, long)]
    pub dns: bool,

    /// Output file path [default: inventory.jsonl]
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Output file format [default: jsonl]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Ping timeout in milliseconds [default: 750]
    #[arg(short = 't', long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Number of concurrent probers [default: 64]
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Maximum probes per second, 0 for unlimited [default: 0]
    #[arg(short = 'r', long = "rate")]
    pub rate_limit: Option<u32>,
}

/// Where and how the inventory will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub format: OutputFormat,
}

impl InventoryCommand {
    /// Resolve flags against `settings` into a validated run.
    ///
    /// All configuration and range errors surface here, before any table
    /// is read or any probe is sent.
    pub fn plan(&self, settings: &AppSettings, verbose: bool) -> CliResult<(RunPlan, OutputTarget)> {
        let workers = self.workers.unwrap_or(settings.default_workers);
        if workers == 0 {
            return Err(ConfigError::InvalidWorkers.into());
        }

        let sweep = if self.active {
            let subnet = self
                .subnet
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .ok_or(ConfigError::MissingSubnet)?;
            let range = HostRange::parse(subnet)?;

            let mut config = SweepConfig::new(workers)
                .with_rate_limit(self.rate_limit.unwrap_or(settings.rate_limit));
            if verbose {
                config = config.with_progress();
            }

            Some(SweepPlan {
                range,
                probe_timeout: Duration::from_millis(
                    self.timeout_ms.unwrap_or(settings.default_timeout_ms),
                ),
                config,
            })
        } else {
            if let Some(ref subnet) = self.subnet {
                warn!(%subnet, "--subnet has no effect without --active");
            }
            None
        };

        let dns = (self.dns || settings.reverse_dns).then(|| DnsPlan {
            concurrency: settings.dns_concurrency,
            lookup_timeout: Duration::from_millis(settings.dns_timeout_ms),
        });

        let plan = RunPlan {
            sweep,
            dns,
            command_timeout: Duration::from_millis(settings.command_timeout_ms),
        };
        let target = OutputTarget {
            path: self.out.clone().unwrap_or_else(|| settings.default_output.clone()),
            format: self.format.unwrap_or(settings.default_format),
        };

        Ok((plan, target))
    }

    /// Execute the inventory command.
    pub async fn execute(&self, settings: &AppSettings, verbose: bool, quiet: bool) -> CliResult<()> {
        let (plan, target) = self.plan(settings, verbose)?;

        if !quiet {
            if let Some(ref sweep) = plan.sweep {
                output::print_info(&format!(
                    "Sweeping {} ({} hosts, {} workers)",
                    sweep.range,
                    sweep.range.host_count(),
                    sweep.config.workers
                ));
            }
        }

        let collaborators = Collaborators::system(&plan);
        let report = run_inventory(&plan, &collaborators).await;

        let written = output::write_inventory(&report.records, &target.path, target.format)?;

        if !quiet && plan.sweep.is_some() {
            output::print_info(&format!(
                "{} of {} hosts answered the sweep",
                report.reachable, report.swept
            ));
        }
        output::print_success(&output::written_message(written, &target.path));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CliError, RangeError};

    fn command(args: &[&str]) -> InventoryCommand {
        let mut argv = vec!["inventory"];
        argv.extend_from_slice(args);
        InventoryCommand::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_active_without_subnet_is_config_error() {
        let err = command(&["--active"])
            .plan(&AppSettings::default(), false)
            .unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::MissingSubnet)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_bad_subnet_is_range_error() {
        let err = command(&["--active", "--subnet", "10.0.0.0/16"])
            .plan(&AppSettings::default(), false)
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Range(RangeError::RangeTooLarge { count: 65534, .. })
        ));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = command(&["--workers", "0"])
            .plan(&AppSettings::default(), false)
            .unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::InvalidWorkers)));
    }

    #[test]
    fn test_passive_only_plan() {
        let (plan, target) = command(&[]).plan(&AppSettings::default(), false).unwrap();
        assert!(plan.sweep.is_none());
        assert!(plan.dns.is_none());
        assert_eq!(target.path, PathBuf::from("inventory.jsonl"));
        assert_eq!(target.format, OutputFormat::Jsonl);
    }

    #[test]
    fn test_subnet_without_active_is_ignored() {
        let (plan, _) = command(&["--subnet", "not-a-subnet"])
            .plan(&AppSettings::default(), false)
            .unwrap();
        assert!(plan.sweep.is_none());
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = AppSettings {
            default_workers: 16,
            default_timeout_ms: 300,
            reverse_dns: true,
            ..AppSettings::default()
        };
        let (plan, target) = command(&[
            "-a",
            "-s",
            "192.168.50.0/24",
            "-w",
            "8",
            "-o",
            "hosts.csv",
            "-f",
            "csv",
        ])
        .plan(&settings, true)
        .unwrap();

        let sweep = plan.sweep.unwrap();
        assert_eq!(sweep.range.host_count(), 254);
        assert_eq!(sweep.config.workers, 8);
        assert!(sweep.config.progress);
        assert_eq!(sweep.probe_timeout, Duration::from_millis(300));
        assert!(plan.dns.is_some());
        assert_eq!(
            target,
            OutputTarget {
                path: PathBuf::from("hosts.csv"),
                format: OutputFormat::Csv
            }
        );
    }
}
