//! Flat-file persistence for proxy lists

use crate::error::{Error, Result};
use crate::proxy::models::ProxyEntry;
use std::fs;
use std::path::Path;

/// Reads and writes newline-separated proxy lists
pub struct ProxyStore;

impl ProxyStore {
    /// Split text into entries: one per line, trimmed, blank lines dropped
    pub fn parse_list(content: &str) -> Vec<ProxyEntry> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ProxyEntry::from)
            .collect()
    }

    /// Load a list previously written by [`ProxyStore::save`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<ProxyEntry>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::parse_list(&content))
    }

    /// Overwrite `path` with the entries joined by `\n`, no trailing newline
    pub fn save<P: AsRef<Path>>(entries: &[ProxyEntry], path: P) -> Result<()> {
        let path = path.as_ref();
        let content = entries
            .iter()
            .map(ProxyEntry::as_str)
            .collect::<Vec<_>>()
            .join("\n");

        fs::write(path, content).map_err(|e| Error::io(path, e))?;
        tracing::debug!(path = %path.display(), count = entries.len(), "wrote proxy list");
        Ok(())
    }
}
