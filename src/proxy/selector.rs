//! Lowest-latency proxy selection

use crate::error::Result;
use crate::proxy::models::{Latency, ProxyEntry, RankedProxy};
use crate::proxy::prober::LatencyProbe;
use crate::proxy::store::ProxyStore;
use std::path::PathBuf;

/// Default number of proxies kept
pub const DEFAULT_FILTERED_COUNT: usize = 10;

/// Default file the selected proxies are written to
pub const DEFAULT_FILTERED_PATH: &str = "filtered_proxies.txt";

/// Configuration for the proxy selector
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// How many proxies to keep
    pub count: usize,
    /// File the kept proxies are written to
    pub output_path: PathBuf,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_FILTERED_COUNT,
            output_path: PathBuf::from(DEFAULT_FILTERED_PATH),
        }
    }
}

impl SelectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }
}

/// Ranks proxies by probed latency and keeps the fastest
pub struct ProxySelector<P> {
    config: SelectorConfig,
    prober: P,
}

impl<P: LatencyProbe> ProxySelector<P> {
    pub fn new(prober: P) -> Self {
        Self::with_config(SelectorConfig::default(), prober)
    }

    pub fn with_config(config: SelectorConfig, prober: P) -> Self {
        Self { config, prober }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Probe every entry once, in order, and sort by latency.
    ///
    /// The sort is stable: entries with equal latency (including all
    /// unreachable ones) keep their input order.
    pub async fn rank(&self, proxies: &[ProxyEntry]) -> Vec<RankedProxy> {
        let mut ranked = Vec::with_capacity(proxies.len());
        for entry in proxies {
            let latency = self.prober.probe(entry).await;
            ranked.push(RankedProxy::new(entry.clone(), latency));
        }

        ranked.sort_by(|a, b| a.latency.cmp(&b.latency));
        ranked
    }

    /// Rank `proxies`, keep the first `count` and write them to the
    /// output file, replacing its previous content.
    pub async fn select(&self, proxies: &[ProxyEntry]) -> Result<Vec<RankedProxy>> {
        let mut ranked = self.rank(proxies).await;
        ranked.truncate(self.config.count);

        let entries: Vec<ProxyEntry> = ranked.iter().map(|r| r.entry.clone()).collect();
        ProxyStore::save(&entries, &self.config.output_path)?;

        let reachable = ranked.iter().filter(|r| r.latency.is_reachable()).count();
        tracing::info!(
            count = ranked.len(),
            reachable,
            path = %self.config.output_path.display(),
            "saved filtered proxies"
        );

        Ok(ranked)
    }
}

/// Fastest measured latency among selected proxies, if any responded
pub fn best_latency(selected: &[RankedProxy]) -> Option<Latency> {
    selected
        .iter()
        .map(|r| r.latency)
        .filter(Latency::is_reachable)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Mutex;

    /// Returns fixed latencies and records the order entries were probed in
    struct FixedProbe {
        latencies: HashMap<String, Latency>,
        calls: Mutex<Vec<String>>,
    }

    impl FixedProbe {
        fn new(pairs: &[(&str, Latency)]) -> Self {
            Self {
                latencies: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LatencyProbe for FixedProbe {
        async fn probe(&self, entry: &ProxyEntry) -> Latency {
            self.calls.lock().unwrap().push(entry.to_string());
            self.latencies
                .get(entry.as_str())
                .copied()
                .unwrap_or(Latency::Unreachable)
        }
    }

    fn entries(raw: &[&str]) -> Vec<ProxyEntry> {
        raw.iter().map(|s| ProxyEntry::new(*s)).collect()
    }

    fn selector(probe: FixedProbe, count: usize, dir: &tempfile::TempDir) -> ProxySelector<FixedProbe> {
        let config = SelectorConfig::new()
            .with_count(count)
            .with_output_path(dir.path().join("filtered_proxies.txt"));
        ProxySelector::with_config(config, probe)
    }

    #[test]
    fn test_selector_config_default() {
        let config = SelectorConfig::default();
        assert_eq!(config.count, DEFAULT_FILTERED_COUNT);
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_FILTERED_PATH));
    }

    #[tokio::test]
    async fn test_select_sorts_ascending() {
        let dir = tempfile::tempdir().unwrap();
        let probe = FixedProbe::new(&[
            ("a:1", Latency::Measured(12.3)),
            ("b:2", Latency::Unreachable),
            ("c:3", Latency::Measured(5.0)),
        ]);
        let selector = selector(probe, 10, &dir);

        let selected = selector.select(&entries(&["a:1", "b:2", "c:3"])).await.unwrap();
        let order: Vec<_> = selected.iter().map(|r| r.entry.as_str()).collect();
        assert_eq!(order, vec!["c:3", "a:1", "b:2"]);
        assert!(selected.windows(2).all(|w| w[0].latency <= w[1].latency));

        let written = fs::read_to_string(&selector.config().output_path).unwrap();
        assert_eq!(written, "c:3\na:1\nb:2");
    }

    #[tokio::test]
    async fn test_select_truncates_to_count() {
        let dir = tempfile::tempdir().unwrap();
        let probe = FixedProbe::new(&[
            ("a:1", Latency::Measured(3.0)),
            ("b:2", Latency::Measured(1.0)),
            ("c:3", Latency::Measured(2.0)),
        ]);
        let selector = selector(probe, 2, &dir);

        let selected = selector.select(&entries(&["a:1", "b:2", "c:3"])).await.unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].entry.as_str(), "b:2");
        assert_eq!(selected[1].entry.as_str(), "c:3");
    }

    #[tokio::test]
    async fn test_select_length_is_min_of_count_and_input() {
        for (count, len) in [(0, 3), (1, 3), (3, 3), (10, 3), (5, 0)] {
            let dir = tempfile::tempdir().unwrap();
            let raw: Vec<String> = (0..len).map(|i| format!("10.0.0.{}:80", i)).collect();
            let list: Vec<ProxyEntry> = raw.iter().map(|s| ProxyEntry::new(s.as_str())).collect();
            let selector = selector(FixedProbe::new(&[]), count, &dir);

            let selected = selector.select(&list).await.unwrap();
            assert_eq!(selected.len(), count.min(len), "count={} len={}", count, len);
        }
    }

    #[tokio::test]
    async fn test_ties_keep_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let probe = FixedProbe::new(&[
            ("a:1", Latency::Measured(7.0)),
            ("b:2", Latency::Measured(7.0)),
            ("c:3", Latency::Measured(1.0)),
        ]);
        let selector = selector(probe, 10, &dir);

        let selected = selector
            .select(&entries(&["x:9", "a:1", "y:8", "b:2", "c:3"]))
            .await
            .unwrap();
        let order: Vec<_> = selected.iter().map(|r| r.entry.as_str()).collect();
        assert_eq!(order, vec!["c:3", "a:1", "b:2", "x:9", "y:8"]);
    }

    #[tokio::test]
    async fn test_every_entry_probed_once_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let selector = selector(FixedProbe::new(&[]), 1, &dir);

        selector.select(&entries(&["a:1", "b:2", "c:3"])).await.unwrap();
        assert_eq!(selector.prober().calls(), vec!["a:1", "b:2", "c:3"]);
    }

    #[tokio::test]
    async fn test_select_overwrites_output() {
        let dir = tempfile::tempdir().unwrap();
        let probe = FixedProbe::new(&[("a:1", Latency::Measured(1.0))]);
        let selector = selector(probe, 10, &dir);
        fs::write(&selector.config().output_path, "stale:1\nstale:2\nstale:3").unwrap();

        selector.select(&entries(&["a:1"])).await.unwrap();
        selector.select(&entries(&["a:1"])).await.unwrap();
        let written = fs::read_to_string(&selector.config().output_path).unwrap();
        assert_eq!(written, "a:1");
    }

    #[test]
    fn test_best_latency() {
        let selected = vec![
            RankedProxy::new(ProxyEntry::new("a:1"), Latency::Measured(4.0)),
            RankedProxy::new(ProxyEntry::new("b:2"), Latency::Unreachable),
            RankedProxy::new(ProxyEntry::new("c:3"), Latency::Measured(2.5)),
        ];
        assert_eq!(best_latency(&selected), Some(Latency::Measured(2.5)));

        let none = vec![RankedProxy::new(ProxyEntry::new("b:2"), Latency::Unreachable)];
        assert_eq!(best_latency(&none), None);
        assert_eq!(best_latency(&[]), None);
    }
}
