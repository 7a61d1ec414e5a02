//! Proxy list fetcher
//!
//! Downloads a plain-text proxy list (one `host:port` per line) from a
//! single source URL and saves it to disk.

use crate::error::Result;
use crate::proxy::models::FetchOutcome;
use crate::proxy::store::ProxyStore;
use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use std::time::Duration;

/// Public HTTP proxy list served by ProxyScrape
pub const DEFAULT_SOURCE_URL: &str = "https://api.proxyscrape.com/?request=getproxies&proxytype=http&timeout=1000&country=all&ssl=all&anonymity=all";

/// Default file the fetched list is written to
pub const DEFAULT_PROXIES_PATH: &str = "proxies.txt";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Configuration for the proxy fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// URL returning the newline-separated list
    pub source_url: String,
    /// File the list is written to on success
    pub output_path: PathBuf,
    /// Request timeout; `None` leaves the transport default in place
    pub timeout: Option<Duration>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_PROXIES_PATH),
            timeout: None,
        }
    }
}

impl FetcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Fetches the proxy list from the configured source
pub struct ProxyFetcher {
    config: FetcherConfig,
    client: Client,
}

impl ProxyFetcher {
    /// Create a fetcher with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(FetcherConfig::default())
    }

    /// Create a fetcher with custom configuration
    pub fn with_config(config: FetcherConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Issue one GET against the source.
    ///
    /// Only status 200 counts as success: the body is split into entries
    /// and written to the output file. Any other status is reported as
    /// [`FetchOutcome::Rejected`] and leaves the output file untouched.
    /// Transport failures are returned as errors.
    pub async fn fetch(&self) -> Result<FetchOutcome> {
        tracing::debug!(url = %self.config.source_url, "fetching proxy list");
        let response = self.client.get(&self.config.source_url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(url = %self.config.source_url, %status, "proxy source rejected request");
            return Ok(FetchOutcome::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let proxies = ProxyStore::parse_list(&body);
        ProxyStore::save(&proxies, &self.config.output_path)?;

        tracing::info!(
            count = proxies.len(),
            path = %self.config.output_path.display(),
            "saved fetched proxies"
        );

        Ok(FetchOutcome::Saved {
            proxies,
            path: self.config.output_path.clone(),
        })
    }
}
