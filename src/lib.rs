//! Proxy Latency - fetch a public proxy list and keep the fastest hosts
//!
//! A run downloads a `host:port` list, pings every host once and saves the
//! lowest-latency entries. Every step runs to completion before the next
//! one starts.

pub mod error;
pub mod pipeline;
pub mod proxy;

pub use error::{Error, Result};
pub use pipeline::{run, RunOutcome};
pub use proxy::*;

use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL serving the proxy list
    pub source_url: String,
    /// Number of proxies kept after ranking
    pub filtered_count: usize,
    /// Where the full fetched list is written
    pub proxies_path: PathBuf,
    /// Where the selected proxies are written
    pub filtered_path: PathBuf,
    /// Upper bound on a single ping
    pub probe_timeout: Duration,
    /// Probe executable
    pub ping_program: PathBuf,
    /// HTTP timeout for the list download, unset by default
    pub fetch_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        let prober = ProberConfig::default();
        Self {
            source_url: proxy::fetcher::DEFAULT_SOURCE_URL.to_string(),
            filtered_count: proxy::selector::DEFAULT_FILTERED_COUNT,
            proxies_path: PathBuf::from(proxy::fetcher::DEFAULT_PROXIES_PATH),
            filtered_path: PathBuf::from(proxy::selector::DEFAULT_FILTERED_PATH),
            probe_timeout: prober.timeout,
            ping_program: prober.program,
            fetch_timeout: None,
        }
    }
}

impl Config {
    pub fn fetcher_config(&self) -> FetcherConfig {
        let config = FetcherConfig::new()
            .with_source_url(self.source_url.clone())
            .with_output_path(self.proxies_path.clone());
        match self.fetch_timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }

    pub fn prober_config(&self) -> ProberConfig {
        ProberConfig::new()
            .with_timeout(self.probe_timeout)
            .with_program(self.ping_program.clone())
    }

    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig::new()
            .with_count(self.filtered_count)
            .with_output_path(self.filtered_path.clone())
    }
}
