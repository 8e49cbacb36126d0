//! Error types for sparql-batch.
//!
//! Defines the main error enum used throughout the application.

use std::path::Path;
use thiserror::Error;

/// Main error type for sparql-batch operations.
#[derive(Error, Debug)]
pub enum SparqlBatchError {
    /// Bad command line (no query files given, etc.)
    #[error("{0}")]
    Usage(String),

    /// Endpoint unreachable, DNS failure, timeout or non-success HTTP status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body is not UTF-8, not JSON, or not a result document.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Query file unreadable or output file unwritable.
    #[error("File error: {0}")]
    FileIo(String),

    /// Invalid endpoint URL or config file.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SparqlBatchError {
    /// Creates a usage error with the given message.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a decode error with the given message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a file error for `path`.
    pub fn file_io(path: &Path, err: std::io::Error) -> Self {
        Self::FileIo(format!("{}: {}", path.display(), err))
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Usage(_) => "Usage Error",
            Self::Transport(_) => "Transport Error",
            Self::Decode(_) => "Decode Error",
            Self::FileIo(_) => "File Error",
            Self::Config(_) => "Configuration Error",
        }
    }
}

impl From<reqwest::Error> for SparqlBatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport(format!("Request timed out: {err}"))
        } else if err.is_connect() {
            Self::transport(format!("Failed to connect to endpoint: {err}"))
        } else {
            Self::transport(format!("Request failed: {err}"))
        }
    }
}

impl From<serde_json::Error> for SparqlBatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(format!("Invalid JSON: {err}"))
    }
}

impl From<std::str::Utf8Error> for SparqlBatchError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::decode(format!("Response is not valid UTF-8: {err}"))
    }
}

/// Result type alias using SparqlBatchError.
pub type Result<T> = std::result::Result<T, SparqlBatchError>;
