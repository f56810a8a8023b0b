//! Prober trait abstraction.
//!
//! Defines a common interface for reachability checks, so the sweep
//! coordinator can be driven by the system `ping` in production and by
//! scripted fakes in tests.

use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Trait for single-host reachability checks.
///
/// A probe makes exactly one attempt, bounded by [`Prober::timeout`], and
/// never errors: anything short of a reply is `false`.
///
/// # Example
///
/// ```ignore
/// use hostsweep::scanner::Prober;
///
/// async fn is_up<P: Prober>(prober: &P, addr: Ipv4Addr) -> bool {
///     prober.probe(addr).await
/// }
/// ```
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one address.
    async fn probe(&self, addr: Ipv4Addr) -> bool;

    /// Per-probe time budget.
    fn timeout(&self) -> Duration;
}
