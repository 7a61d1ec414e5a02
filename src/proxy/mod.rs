//! Proxy module for fetching and ranking proxies
//!
//! This module provides functionality for:
//! - Fetching a plain-text proxy list from a remote source
//! - Measuring host latency with the system `ping` tool
//! - Selecting the lowest-latency proxies and saving them to disk

pub mod fetcher;
pub mod models;
pub mod prober;
pub mod selector;
pub mod store;

pub use fetcher::{FetcherConfig, ProxyFetcher};
pub use models::{FetchOutcome, Latency, ProxyEntry, RankedProxy};
pub use prober::{LatencyProbe, PingProber, ProberConfig};
pub use selector::{ProxySelector, SelectorConfig};
pub use store::ProxyStore;
