//! Diagnostic logging setup.
//!
//! Logs go to stderr so they never mix with `range --list` output on stdout.
//! `RUST_LOG` takes precedence over the `--verbose`/`--quiet` flags.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Pick the default filter directive for the given flags.
fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "hostsweep=debug,warn"
    } else {
        "warn"
    }
}

/// Install the global subscriber.
pub fn init(verbose: bool, quiet: bool) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => {
            EnvFilter::try_new(&directives).with_context(|| format!("invalid RUST_LOG: {directives}"))?
        }
        _ => EnvFilter::new(default_directive(verbose, quiet)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
