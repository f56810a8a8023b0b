//! ICMP echo prober backed by the system `ping` binary.
//!
//! Sends a single echo request per host. The system binary is used so no
//! raw-socket privileges are required; its exit status is the outcome.

use crate::scanner::traits::Prober;
use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Slack on top of the ping wait time before the child is killed.
const PROBE_GRACE: Duration = Duration::from_secs(1);

/// Ping prober.
///
/// One echo request per call, no retries.
///
/// # Platform Notes
///
/// - **Linux and other Unix**: `ping -c 1 -W <seconds>`; sub-second timeouts round up to 1s
/// - **macOS/FreeBSD/DragonFly**: `ping -c 1 -W <milliseconds>`
/// - **Windows**: `ping -n 1 -w <milliseconds>`
pub struct PingProber {
    timeout: Duration,
}

impl PingProber {
    /// Create a new ping prober.
    ///
    /// # Arguments
    /// * `timeout` - Reply wait time per host
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Arguments passed to `ping` for `addr`.
    pub fn command_args(&self, addr: Ipv4Addr) -> Vec<String> {
        let target = addr.to_string();
        if cfg!(target_os = "windows") {
            vec![
                "-n".into(),
                "1".into(),
                "-w".into(),
                wait_millis(self.timeout).to_string(),
                target,
            ]
        } else if waits_in_millis() {
            vec![
                "-c".into(),
                "1".into(),
                "-W".into(),
                wait_millis(self.timeout).to_string(),
                target,
            ]
        } else {
            vec![
                "-c".into(),
                "1".into(),
                "-W".into(),
                wait_seconds(self.timeout).to_string(),
                target,
            ]
        }
    }

    /// Upper bound on how long a single probe may take before it is killed.
    fn deadline(&self) -> Duration {
        let wait = if waits_in_millis() {
            Duration::from_millis(wait_millis(self.timeout))
        } else {
            Duration::from_secs(wait_seconds(self.timeout))
        };
        wait + PROBE_GRACE
    }
}

#[async_trait]
impl Prober for PingProber {
    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn probe(&self, addr: Ipv4Addr) -> bool {
        let mut cmd = Command::new("ping");
        cmd.args(self.command_args(addr))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        match timeout(self.deadline(), cmd.status()).await {
            Ok(Ok(status)) => {
                debug!(%addr, success = status.success(), "ping finished");
                status.success()
            }
            Ok(Err(e)) => {
                // Tool failure and "host down" are both a negative outcome.
                debug!(%addr, error = %e, "ping could not be started");
                false
            }
            Err(_) => {
                debug!(%addr, "ping exceeded its deadline");
                false
            }
        }
    }
}

/// Whether the local `ping` takes its wait time in milliseconds.
fn waits_in_millis() -> bool {
    cfg!(any(
        target_os = "windows",
        target_os = "macos",
        target_os = "freebsd",
        target_os = "dragonfly"
    ))
}

/// Whole seconds to wait, rounded up and never zero.
pub(crate) fn wait_seconds(timeout: Duration) -> u64 {
    let millis = timeout.as_millis() as u64;
    millis.div_ceil(1000).max(1)
}

/// Milliseconds to wait, never zero.
pub(crate) fn wait_millis(timeout: Duration) -> u64 {
    (timeout.as_millis() as u64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_seconds_rounds_up() {
        assert_eq!(wait_seconds(Duration::from_millis(0)), 1);
        assert_eq!(wait_seconds(Duration::from_millis(1)), 1);
        assert_eq!(wait_seconds(Duration::from_millis(750)), 1);
        assert_eq!(wait_seconds(Duration::from_millis(1000)), 1);
        assert_eq!(wait_seconds(Duration::from_millis(1001)), 2);
        assert_eq!(wait_seconds(Duration::from_millis(2500)), 3);
    }

    #[test]
    fn test_wait_millis_never_zero() {
        assert_eq!(wait_millis(Duration::ZERO), 1);
        assert_eq!(wait_millis(Duration::from_millis(750)), 750);
    }

    #[test]
    fn test_command_args_single_attempt() {
        let prober = PingProber::new(Duration::from_millis(750));
        let args = prober.command_args(Ipv4Addr::new(192, 168, 1, 10));

        assert_eq!(args.last().map(String::as_str), Some("192.168.1.10"));
        assert!(args.iter().any(|a| a == "1"));
        assert_eq!(args.len(), 5);
        assert_eq!(prober.timeout(), Duration::from_millis(750));
    }

    #[test]
    fn test_command_args_wait_units() {
        let prober = PingProber::new(Duration::from_millis(750));
        let args = prober.command_args(Ipv4Addr::new(10, 0, 0, 1));

        let expected = if waits_in_millis() { "750" } else { "1" };
        assert_eq!(args[3], expected);
    }

    #[tokio::test]
    #[ignore = "runs the system ping"]
    async fn test_unresponsive_address_is_false() {
        // TEST-NET-1 is reserved for documentation and never answers.
        let prober = PingProber::new(Duration::from_millis(100));
        assert!(!prober.probe(Ipv4Addr::new(192, 0, 2, 1)).await);
    }
}
