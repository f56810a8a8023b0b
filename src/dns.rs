//! Reverse DNS enrichment.
//!
//! Best-effort PTR lookups applied to the merged inventory. A failed or
//! slow lookup simply leaves the hostname empty.

use crate::merge::Inventory;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Default per-lookup time budget.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Default number of lookups in flight.
pub const DEFAULT_DNS_CONCURRENCY: usize = 16;

/// Resolves an address to a hostname.
#[async_trait]
pub trait ReverseResolver: Send + Sync {
    /// Return the hostname for `addr`, or `None` if there is none.
    async fn reverse_lookup(&self, addr: Ipv4Addr) -> Option<String>;
}

/// Resolver using the system's DNS configuration.
pub struct SystemResolver {
    resolver: TokioAsyncResolver,
    lookup_timeout: Duration,
}

impl SystemResolver {
    /// Build a resolver from the system configuration, falling back to the
    /// library defaults when it cannot be read.
    pub fn new(lookup_timeout: Duration) -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            debug!(error = %e, "system resolver configuration unavailable, using defaults");
            let mut opts = ResolverOpts::default();
            opts.timeout = lookup_timeout;
            TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
        });

        Self {
            resolver,
            lookup_timeout,
        }
    }
}

#[async_trait]
impl ReverseResolver for SystemResolver {
    async fn reverse_lookup(&self, addr: Ipv4Addr) -> Option<String> {
        let lookup = self.resolver.reverse_lookup(IpAddr::V4(addr));
        match timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(response)) => response
                .iter()
                .find_map(|name| clean_hostname(&name.to_string(), addr)),
            Ok(Err(e)) => {
                debug!(%addr, error = %e, "reverse lookup failed");
                None
            }
            Err(_) => {
                debug!(%addr, "reverse lookup timed out");
                None
            }
        }
    }
}

/// Strip the root dot and discard names that are empty or just the address.
fn clean_hostname(raw: &str, addr: Ipv4Addr) -> Option<String> {
    let name = raw.trim().trim_end_matches('.');
    if name.is_empty() || name == addr.to_string() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Look up every address in the inventory and record any hostnames found.
///
/// Returns the number of hostnames attached.
pub async fn enrich_hostnames<R>(inventory: &mut Inventory, resolver: &R, concurrency: usize) -> usize
where
    R: ReverseResolver + ?Sized,
{
    let addresses = inventory.addresses();
    if addresses.is_empty() {
        return 0;
    }
    info!(hosts = addresses.len(), "resolving hostnames");

    let lookups: Vec<(Ipv4Addr, Option<String>)> = stream::iter(addresses)
        .map(|addr| async move { (addr, resolver.reverse_lookup(addr).await) })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut resolved = 0;
    for (addr, hostname) in lookups {
        if let Some(hostname) = hostname {
            if inventory.set_hostname(addr, hostname) {
                resolved += 1;
            }
        }
    }

    info!(resolved, "hostname resolution complete");
    resolved
}
