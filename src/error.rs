//! Error types for keepalive
//!
//! Uses `thiserror` for the library error enum. The binary wraps these in
//! `anyhow` at the CLI boundary.

use thiserror::Error;

/// The primary error type for keepalive operations.
#[derive(Error, Debug)]
pub enum KeepaliveError {
    /// Configuration errors (missing identifiers, bad interval, invalid URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP failures (DNS, connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status code
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Supervised child process failures
    #[error("Process error: {0}")]
    Process(String),
}

impl KeepaliveError {
    /// Whether this error came from the heartbeat request itself rather
    /// than from local setup.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, KeepaliveError::Http(_) | KeepaliveError::Status(_))
    }
}

/// A specialized `Result` type for keepalive operations.
pub type Result<T> = std::result::Result<T, KeepaliveError>;
