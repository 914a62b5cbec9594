//! Error types for minidfs

use crate::common::Node;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    // === Input Errors ===
    #[error("Invalid file name: {0:?}")]
    InvalidName(String),

    #[error("Cannot determine file size of {name}: {reason}")]
    SizeUnavailable { name: String, reason: String },

    // === Network Errors ===
    #[error("Transport error reaching {node}: {source}")]
    Transport {
        node: Node,
        #[source]
        source: reqwest::Error,
    },

    #[error("Upload rejected by {node}: status {status}")]
    UploadRejected { node: Node, status: u16 },

    #[error("Download failed from {node}: status {status}")]
    DownloadRejected { node: Node, status: u16 },

    // === Lookup Errors ===
    #[error("File not found: {0}")]
    NotFound(String),

    // === Staging Errors ===
    #[error("Staging failed: {0}")]
    Staging(#[source] std::io::Error),

    #[error("Size mismatch for {name}: expected {expected} bytes, staged {actual}")]
    SizeMismatch {
        name: String,
        expected: u64,
        actual: u64,
    },

    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Did a node answer with a non-success status?
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            Error::UploadRejected { .. } | Error::DownloadRejected { .. }
        )
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}
