//! Latency probing via the system `ping` tool
//!
//! Only the proxy's host is pinged. The port is parsed so malformed
//! entries are rejected, but it plays no part in the measurement.

use crate::error::{Error, Result};
use crate::proxy::models::{Latency, ProxyEntry};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Default upper bound on a single ping run in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default number of echo requests per probe
const DEFAULT_COUNT: u32 = 1;

/// Default probe executable, resolved through `PATH`
const DEFAULT_PROGRAM: &str = "ping";

/// Matches the round-trip token, e.g. `time=12.3` in
/// `64 bytes from 1.2.3.4: icmp_seq=1 ttl=57 time=12.3 ms`
static RTT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"time=(\S*)").expect("Invalid RTT regex"));

/// Something that can measure the latency of a proxy entry.
///
/// Implementations never fail: anything that prevents a measurement
/// is reported as [`Latency::Unreachable`].
#[async_trait]
pub trait LatencyProbe {
    async fn probe(&self, entry: &ProxyEntry) -> Latency;
}

/// Configuration for the ping prober
#[derive(Debug, Clone)]
pub struct ProberConfig {
    /// Kill the ping process after this long
    pub timeout: Duration,
    /// Value passed to `-c`
    pub count: u32,
    /// Executable to run
    pub program: PathBuf,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            count: DEFAULT_COUNT,
            program: PathBuf::from(DEFAULT_PROGRAM),
        }
    }
}

impl ProberConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

/// Measures host latency by running `ping -c <count> <host>`
#[derive(Debug, Clone, Default)]
pub struct PingProber {
    config: ProberConfig,
}

impl PingProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProberConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProberConfig {
        &self.config
    }

    /// Run the probe tool once against the entry's host
    async fn measure(&self, entry: &ProxyEntry) -> Result<f64> {
        let (host, _port) = entry.host_port()?;

        let child = Command::new(&self.config.program)
            .arg("-c")
            .arg(self.config.count.to_string())
            .arg(host)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.config.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(Error::probe(
                    host,
                    format!("could not run {}: {}", self.config.program.display(), e),
                ))
            }
            Err(_) => {
                return Err(Error::probe(
                    host,
                    format!("timed out after {:?}", self.config.timeout),
                ))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_round_trip(&stdout)
            .ok_or_else(|| Error::probe(host, "no round-trip time in ping output"))
    }
}

#[async_trait]
impl LatencyProbe for PingProber {
    async fn probe(&self, entry: &ProxyEntry) -> Latency {
        match self.measure(entry).await {
            Ok(ms) => {
                tracing::debug!(proxy = %entry, latency_ms = ms, "probe succeeded");
                Latency::Measured(ms)
            }
            Err(e) => {
                tracing::debug!(proxy = %entry, error = %e, "probe failed");
                Latency::Unreachable
            }
        }
    }
}

/// Extract the round-trip time from ping output.
///
/// Uses the last `time=` marker and the token up to the next whitespace.
/// Returns `None` if there is no marker or the token is not a finite,
/// non-negative number.
pub fn parse_round_trip(output: &str) -> Option<f64> {
    let token = RTT_REGEX.captures_iter(output).last()?.get(1)?.as_str();
    let ms: f64 = token.parse().ok()?;
    (ms.is_finite() && ms >= 0.0).then_some(ms)
}
