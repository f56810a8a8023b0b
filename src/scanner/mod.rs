//! Scanner module - coordinates the active ping sweep.
//!
//! A fixed pool of workers drains a pre-filled queue of addresses, probes
//! each one, and publishes exactly one outcome per address. The coordinator
//! joins every worker before reading results, so outcomes from slow workers
//! are never lost.

pub mod icmp;
pub mod rate_limiter;
pub mod traits;

use futures::FutureExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, VecDeque};
use std::net::Ipv4Addr;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub use icmp::PingProber;
pub use rate_limiter::RateLimiter;
pub use traits::Prober;

/// Default number of concurrent probers.
pub const DEFAULT_WORKERS: usize = 64;

/// Configuration for a sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Number of concurrent workers. Zero is treated as one.
    pub workers: usize,
    /// Optional shared probe pacing.
    pub rate_limit: Option<RateLimiter>,
    /// Show a progress bar on stderr.
    pub progress: bool,
}

impl SweepConfig {
    /// Create a sweep configuration with `workers` concurrent probers.
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            rate_limit: None,
            progress: false,
        }
    }

    /// Limit probes per second across all workers (0 = unlimited).
    pub fn with_rate_limit(mut self, rate: u32) -> Self {
        self.rate_limit = RateLimiter::new(rate);
        self
    }

    /// Enable the progress bar.
    pub fn with_progress(mut self) -> Self {
        self.progress = true;
        self
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

/// Outcome of a sweep: one reachability verdict per swept address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepOutcomes {
    outcomes: BTreeMap<Ipv4Addr, bool>,
}

impl SweepOutcomes {
    /// Number of swept addresses.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether nothing was swept.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// The verdict for `addr`, if it was part of the sweep.
    pub fn get(&self, addr: Ipv4Addr) -> Option<bool> {
        self.outcomes.get(&addr).copied()
    }

    /// All verdicts in address order.
    pub fn iter(&self) -> impl Iterator<Item = (Ipv4Addr, bool)> + '_ {
        self.outcomes.iter().map(|(addr, up)| (*addr, *up))
    }

    /// Addresses that answered.
    pub fn reachable(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.iter().filter(|(_, up)| *up).map(|(addr, _)| addr)
    }

    /// Count of addresses that answered.
    pub fn reachable_count(&self) -> usize {
        self.outcomes.values().filter(|up| **up).count()
    }
}

impl FromIterator<(Ipv4Addr, bool)> for SweepOutcomes {
    fn from_iter<I: IntoIterator<Item = (Ipv4Addr, bool)>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

/// Probe every address in `hosts` with bounded concurrency.
///
/// The returned outcomes contain exactly one entry per distinct address in
/// `hosts`. A probe that panics is logged and counts as unreachable; its
/// worker keeps draining the queue. Should a worker still die, any address
/// left without a verdict is recorded as unreachable after the join.
pub async fn run_sweep<P>(prober: Arc<P>, hosts: Vec<Ipv4Addr>, config: &SweepConfig) -> SweepOutcomes
where
    P: Prober + ?Sized + 'static,
{
    if hosts.is_empty() {
        return SweepOutcomes::default();
    }

    let start_time = Instant::now();
    let workers = config.workers.max(1);
    let rounds = hosts.len().div_ceil(workers) as u32;
    info!(
        hosts = hosts.len(),
        workers,
        worst_case_ms = (prober.timeout() * rounds).as_millis() as u64,
        "starting ping sweep"
    );

    let progress = config.progress.then(|| new_progress_bar(hosts.len()));

    // Fill the queue before any worker starts draining it.
    let queue: Arc<Mutex<VecDeque<Ipv4Addr>>> = Arc::new(Mutex::new(hosts.iter().copied().collect()));
    let (tx, mut rx) = mpsc::unbounded_channel::<(Ipv4Addr, bool)>();

    let mut pool = JoinSet::new();
    for worker_id in 0..workers {
        let queue = Arc::clone(&queue);
        let prober = Arc::clone(&prober);
        let tx = tx.clone();
        let limiter = config.rate_limit.clone();
        let progress = progress.clone();

        pool.spawn(async move {
            let mut probed = 0usize;
            while let Some(addr) = next_address(&queue) {
                if let Some(ref limiter) = limiter {
                    limiter.wait().await;
                }

                let up = match AssertUnwindSafe(prober.probe(addr)).catch_unwind().await {
                    Ok(up) => up,
                    Err(_) => {
                        warn!(%addr, worker_id, "probe panicked, recording host as unreachable");
                        false
                    }
                };
                if tx.send((addr, up)).is_err() {
                    break;
                }
                probed += 1;

                if let Some(ref pb) = progress {
                    pb.inc(1);
                    if up {
                        pb.set_message(format!("{} is up", addr));
                    }
                }
            }
            debug!(worker_id, probed, "sweep worker finished");
        });
    }
    drop(tx);

    // Barrier: every worker has exited before results are read.
    while let Some(joined) = pool.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "sweep worker terminated abnormally");
        }
    }

    let mut outcomes = BTreeMap::new();
    while let Some((addr, up)) = rx.recv().await {
        outcomes.insert(addr, up);
    }

    let mut missing = 0usize;
    for addr in hosts {
        if let Entry::Vacant(slot) = outcomes.entry(addr) {
            slot.insert(false);
            missing += 1;
        }
    }
    if missing > 0 {
        warn!(missing, "addresses without a probe verdict recorded as unreachable");
    }

    if let Some(pb) = progress {
        pb.finish_with_message("Sweep complete");
    }

    let outcomes = SweepOutcomes { outcomes };
    info!(
        swept = outcomes.len(),
        reachable = outcomes.reachable_count(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "ping sweep complete"
    );
    outcomes
}

fn next_address(queue: &Mutex<VecDeque<Ipv4Addr>>) -> Option<Ipv4Addr> {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front()
}

fn new_progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}
