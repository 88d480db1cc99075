//! Storage module for the tabular inputs and outputs of a run
//!
//! This module handles all file operations for a run, including:
//! - Loading and validating the URL list
//! - Loading a previously written snapshot
//! - Writing the failures, changes and snapshot tables under timestamped names

mod csv_store;
mod traits;

pub use csv_store::{is_truthy, load_snapshot, load_url_list, CsvReportWriter};
pub use traits::{ReportWriter, StorageError, StorageResult};

use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};

/// One row of the URL list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRow {
    pub url: String,
    pub label: String,
    pub include_nav_links: bool,
}

/// Values fixed once at process start and shared by every persistence call
#[derive(Debug, Clone)]
pub struct RunContext {
    timestamp: String,
    output_dir: PathBuf,
}

impl RunContext {
    /// Creates a context stamped with the current local time
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::at(Local::now().naive_local(), output_dir)
    }

    /// Creates a context stamped with the given time
    ///
    /// The stamp is the ISO-8601 form of the time with `:` removed so that it
    /// can be used in file names.
    pub fn at(time: NaiveDateTime, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            timestamp: time.format("%Y-%m-%dT%H%M%S%.6f").to_string(),
            output_dir: output_dir.into(),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the report table with the given prefix
    pub fn output_path(&self, prefix: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.csv", prefix, self.timestamp))
    }
}
