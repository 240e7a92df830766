use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the collection engine.
///
/// Catalog-build failures (`DuplicateName`, `InvalidTemplate`,
/// `UnsupportedBinding`, `Config`) are fatal at startup: a half-built catalog
/// would silently drop metrics, so the scheduler must never start on top of
/// one. Attribute failures at poll time are handled per definition inside the
/// collection loop and never surface through this type.
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Duplicate metric name '{name}' in {scope} scope")]
    DuplicateName { name: String, scope: String },

    #[error("Invalid template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },

    #[error("Metric '{name}' of kind {kind} cannot be backed by an attribute")]
    UnsupportedBinding { name: String, kind: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Attribute error: {0}")]
    Attribute(#[from] AttributeError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Configuration-specific errors, all fatal before any periodic activity
/// starts.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Invalid rotation interval: {seconds}s (must be between {min} and {max} seconds)")]
    InvalidRotationInterval { seconds: u64, min: u64, max: u64 },

    #[error("Invalid attribute poll interval: {seconds}s (must be > 0)")]
    InvalidPollInterval { seconds: u64 },

    #[error("Malformed tag '{tag}' (expected key=value)")]
    MalformedTag { tag: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid configuration format: {message}")]
    InvalidFormat { message: String },

    #[error("Environment variable error: {variable} - {message}")]
    EnvironmentVariable { variable: String, message: String },
}

/// Failures talking to the managed process's attribute tree.
#[derive(Error, Debug, Clone)]
pub enum AttributeError {
    /// The path (or a requested attribute under it) does not exist. This is a
    /// permanent mapping error: the bound metric is dropped from polling.
    #[error("Attribute path not found: {path}")]
    Unavailable { path: String },

    /// The underlying channel failed. Transient: the bound metric keeps its
    /// last value and the query is retried on the next tick.
    #[error("Attribute transport error: {message}")]
    Transport { message: String },

    /// The query did not complete within the per-call budget. Treated like a
    /// transport fault.
    #[error("Attribute query timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

impl AttributeError {
    /// Whether retrying on the next poll tick can succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, AttributeError::Unavailable { .. })
    }
}

/// Result type alias for the collection engine.
pub type Result<T> = std::result::Result<T, CollectorError>;
