//! Linkwatch: link inventory monitoring for external sites
//!
//! This crate renders a configured list of web pages, extracts their
//! hyperlinks, and reconciles them against a previously recorded snapshot so
//! that new links and changed link text can be reported run over run.

pub mod config;
pub mod crawler;
pub mod links;
pub mod output;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Linkwatch operations
#[derive(Debug, Error)]
pub enum LinkwatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Reconciliation error: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("Browser session error: {0}")]
    Browser(#[from] crawler::FetchError),

    #[error("Report error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while loading the tabular inputs of a run
#[derive(Debug, Error)]
pub enum InputError {
    #[error("File not passed, but required")]
    MissingRequired,

    #[error("File {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Expected fields url, label, and include_nav_links, got {0:?}")]
    InvalidColumns(Vec<String>),

    #[error("Failed to read {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

/// Errors raised by the reconciler
///
/// These are never recoverable: they mean identity assignment produced a
/// table in which one identity names several rows.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Multiple matches ({count}) found for link identity {identity}")]
    MultipleMatches { identity: String, count: usize },
}

/// Result type alias for Linkwatch operations
pub type Result<T> = std::result::Result<T, LinkwatchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for input loading
pub type InputResult<T> = std::result::Result<T, InputError>;

// Re-export commonly used types
pub use config::Config;
pub use links::{
    assign_identities, reconcile, ChangeRecord, DefinedChange, FailureReason, FailureRecord,
    LinkIdentity, LinkRecord, Reconciliation,
};
pub use crate::url::site_domain;
