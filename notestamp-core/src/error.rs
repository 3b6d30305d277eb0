//! Error types for notestamp-core

use thiserror::Error;

/// Main error type for the notestamp-core library
///
/// Refresh passes never fail: malformed timestamps are neutralized in place.
/// These errors come from the surrounding plumbing (files, JSON, config).
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error for documents
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Logging setup error
    #[error("logging error: {0}")]
    Logging(String),
}

/// Result type alias for notestamp-core
pub type Result<T> = std::result::Result<T, Error>;
