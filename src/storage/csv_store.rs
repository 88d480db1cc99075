//! CSV implementation of the run inputs and outputs

use crate::links::{
    ChangeRecord, FailureRecord, LinkRecord, CHANGES_HEADER, FAILURES_HEADER, SNAPSHOT_HEADER,
};
use crate::storage::traits::{ReportWriter, StorageResult};
use crate::storage::{RunContext, UrlRow};
use crate::{InputError, InputResult};
use csv::{Reader, ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Columns the URL list must carry, sorted
const URL_LIST_COLUMNS: [&str; 3] = ["include_nav_links", "label", "url"];

/// Tokens accepted as true for `include_nav_links`
const TRUTHY_TOKENS: [&str; 4] = ["1", "true", "yes", "y"];

/// Positions of named columns in a header row
struct Columns<const N: usize>([Option<usize>; N]);

impl<const N: usize> Columns<N> {
    fn locate(headers: &StringRecord, names: [&str; N]) -> Self {
        Self(names.map(|name| headers.iter().position(|header| header == name)))
    }

    /// Reads the named cells of a row, blank for absent columns or short rows
    fn cells(&self, record: &StringRecord) -> [String; N] {
        self.0.map(|index| {
            index
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        })
    }
}

/// Interprets a boolean-like cell
///
/// `1`, `true`, `yes` and `y` are true in any letter case; every other value
/// is false.
///
/// # Examples
///
/// ```
/// use linkwatch::storage::is_truthy;
///
/// assert!(is_truthy("Yes"));
/// assert!(!is_truthy("0"));
/// ```
pub fn is_truthy(value: &str) -> bool {
    let value = value.to_lowercase();
    TRUTHY_TOKENS.contains(&value.as_str())
}

/// Checks an input path before it is read
///
/// A path that was given must exist. A missing path is only acceptable when
/// `missing_ok` is set.
fn resolve_input(path: Option<&Path>, missing_ok: bool) -> InputResult<Option<&Path>> {
    match path {
        Some(path) if !path.is_file() => Err(InputError::NotFound(path.to_path_buf())),
        Some(path) => Ok(Some(path)),
        None if missing_ok => Ok(None),
        None => Err(InputError::MissingRequired),
    }
}

fn open_reader(path: &Path) -> InputResult<Reader<File>> {
    ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| InputError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads and validates the list of pages to crawl
///
/// The file must have exactly the columns `url`, `label` and
/// `include_nav_links`, in any order.
///
/// # Returns
///
/// * `Ok(Vec<UrlRow>)` - The rows in file order
/// * `Err(InputError)` - The file is missing, unreadable, or has other columns
pub fn load_url_list(path: Option<&Path>) -> InputResult<Vec<UrlRow>> {
    let path = resolve_input(path, false)?.ok_or(InputError::MissingRequired)?;
    let mut reader = open_reader(path)?;
    let csv_error = |source: csv::Error| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    let mut sorted: Vec<&str> = columns.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    if sorted != URL_LIST_COLUMNS {
        return Err(InputError::InvalidColumns(columns));
    }

    let columns = Columns::locate(
        reader.headers().map_err(csv_error)?,
        ["url", "label", "include_nav_links"],
    );
    let mut rows = Vec::new();
    for record in reader.records() {
        let [url, label, include_nav_links] = columns.cells(&record.map_err(csv_error)?);
        rows.push(UrlRow {
            url,
            label,
            include_nav_links: is_truthy(&include_nav_links),
        });
    }

    tracing::debug!("Loaded {} URLs from {}", rows.len(), path.display());
    Ok(rows)
}

/// Loads a previously written snapshot
///
/// Absent columns and short rows are filled with empty strings so that
/// partial or legacy files can still be reconciled.
///
/// # Returns
///
/// * `Ok(None)` - No snapshot path was given
/// * `Ok(Some(rows))` - The snapshot rows in file order
/// * `Err(InputError)` - The file was given but is missing or unreadable
pub fn load_snapshot(path: Option<&Path>) -> InputResult<Option<Vec<LinkRecord>>> {
    let Some(path) = resolve_input(path, true)? else {
        return Ok(None);
    };

    let csv_error = |source: csv::Error| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = open_reader(path)?;
    let columns = Columns::locate(reader.headers().map_err(csv_error)?, SNAPSHOT_HEADER);

    let mut rows = Vec::new();
    for record in reader.records() {
        let [source_url, label, domain, href, full_link, link_text, link_class_name] =
            columns.cells(&record.map_err(csv_error)?);
        rows.push(LinkRecord {
            source_url,
            label,
            domain,
            href,
            full_link,
            link_text,
            link_class_name,
        });
    }

    tracing::debug!("Loaded {} snapshot links from {}", rows.len(), path.display());
    Ok(Some(rows))
}

/// Writes report tables as CSV files named after the run timestamp
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    context: RunContext,
}

impl CsvReportWriter {
    pub fn new(context: RunContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    fn write_table<'a, const N: usize>(
        &self,
        prefix: &str,
        header: [&str; N],
        rows: impl IntoIterator<Item = [&'a str; N]>,
    ) -> StorageResult<PathBuf> {
        std::fs::create_dir_all(self.context.output_dir())?;
        let path = self.context.output_path(prefix);

        let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;
        writer.write_record(header)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        tracing::info!("Wrote {}", path.display());
        Ok(path)
    }
}

impl ReportWriter for CsvReportWriter {
    fn write_failures(&self, failures: &[FailureRecord]) -> StorageResult<PathBuf> {
        self.write_table("failed", FAILURES_HEADER, failures.iter().map(FailureRecord::csv_row))
    }

    fn write_changes(&self, changes: &[ChangeRecord]) -> StorageResult<PathBuf> {
        self.write_table("new_links", CHANGES_HEADER, changes.iter().map(ChangeRecord::csv_row))
    }

    fn write_snapshot(&self, snapshot: &[LinkRecord]) -> StorageResult<PathBuf> {
        self.write_table("all_links", SNAPSHOT_HEADER, snapshot.iter().map(LinkRecord::csv_row))
    }
}
