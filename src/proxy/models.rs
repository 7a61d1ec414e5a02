//! Proxy data models

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

/// A single `host:port` line from a proxy list.
///
/// The string is kept exactly as it was read; structure is only checked
/// when [`ProxyEntry::host_port`] is called.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxyEntry(String);

impl ProxyEntry {
    pub fn new(entry: impl Into<String>) -> Self {
        Self(entry.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the entry on its first colon into host and port.
    ///
    /// Fails when the colon is missing, the host is empty or the
    /// remainder is not a valid port number.
    pub fn host_port(&self) -> Result<(&str, u16)> {
        let (host, port) = self
            .0
            .split_once(':')
            .ok_or_else(|| Error::MalformedEntry(self.0.clone()))?;

        if host.is_empty() {
            return Err(Error::MalformedEntry(self.0.clone()));
        }

        let port: u16 = port
            .parse()
            .map_err(|_| Error::MalformedEntry(self.0.clone()))?;

        Ok((host, port))
    }
}

impl fmt::Display for ProxyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProxyEntry {
    fn from(entry: &str) -> Self {
        Self::new(entry)
    }
}

impl From<String> for ProxyEntry {
    fn from(entry: String) -> Self {
        Self(entry)
    }
}

/// Round-trip time to a proxy host
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Latency {
    /// Milliseconds as reported by the probe tool
    Measured(f64),
    Unreachable,
}

impl Latency {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Latency::Measured(_))
    }

    pub fn as_millis(&self) -> Option<f64> {
        match self {
            Latency::Measured(ms) => Some(*ms),
            Latency::Unreachable => None,
        }
    }
}

// Unreachable sorts after every measured value.
impl Ord for Latency {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Latency::Measured(a), Latency::Measured(b)) => a.total_cmp(b),
            (Latency::Measured(_), Latency::Unreachable) => Ordering::Less,
            (Latency::Unreachable, Latency::Measured(_)) => Ordering::Greater,
            (Latency::Unreachable, Latency::Unreachable) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Latency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Latency {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Latency {}

impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Latency::Measured(ms) => write!(f, "{} ms", ms),
            Latency::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// A proxy entry together with the latency it was ranked by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedProxy {
    pub entry: ProxyEntry,
    pub latency: Latency,
}

impl RankedProxy {
    pub fn new(entry: ProxyEntry, latency: Latency) -> Self {
        Self { entry, latency }
    }
}

/// Result of a single fetch from the proxy source
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// HTTP 200; the list was written to `path`
    Saved {
        proxies: Vec<ProxyEntry>,
        path: PathBuf,
    },
    /// Any other status; nothing was written
    Rejected { status: u16 },
}

impl FetchOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, FetchOutcome::Saved { .. })
    }

    pub fn proxies(&self) -> &[ProxyEntry] {
        match self {
            FetchOutcome::Saved { proxies, .. } => proxies,
            FetchOutcome::Rejected { .. } => &[],
        }
    }

    pub fn into_proxies(self) -> Vec<ProxyEntry> {
        match self {
            FetchOutcome::Saved { proxies, .. } => proxies,
            FetchOutcome::Rejected { .. } => Vec::new(),
        }
    }
}
