//! Report writer trait and error types
//!
//! This module defines the interface through which a run persists its three
//! output tables.

use crate::links::{ChangeRecord, FailureRecord, LinkRecord};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing reports
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for the tables produced by a run
///
/// Every method writes a complete table, header included, even when there
/// are no rows, and returns the location it wrote to.
pub trait ReportWriter {
    /// Writes the URLs that could not be processed
    fn write_failures(&self, failures: &[FailureRecord]) -> StorageResult<PathBuf>;

    /// Writes the new links and text changes
    fn write_changes(&self, changes: &[ChangeRecord]) -> StorageResult<PathBuf>;

    /// Writes the full updated snapshot
    fn write_snapshot(&self, snapshot: &[LinkRecord]) -> StorageResult<PathBuf>;
}
