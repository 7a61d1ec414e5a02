//! Error types shared by the fetch, probe and select steps

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write progress output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Malformed proxy entry '{0}': expected host:port")]
    MalformedEntry(String),

    #[error("Probe of {host} failed: {reason}")]
    Probe { host: String, reason: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn probe(host: &str, reason: impl Into<String>) -> Self {
        Error::Probe {
            host: host.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
