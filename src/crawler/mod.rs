//! Crawler module for page rendering, link extraction and run orchestration
//!
//! This module contains the crawling side of a run, including:
//! - HTTP preflight and WebDriver-based page rendering
//! - HTML parsing and anchor extraction
//! - Per-run coordination of the configured URLs
//! - The end-to-end monitoring pass that feeds the reconciler

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{links_from_source, Coordinator, CrawlOutcome, PageOutcome, PageTarget};
pub use fetcher::{
    browser_capabilities, build_http_client, preflight, BrowserSession, FetchError, PageRenderer,
};
pub use parser::{extract_links, extract_page_links, parse_document, ExtractError, ExtractedLink};

use crate::config::Config;
use crate::links::{reconcile, LinkRecord};
use crate::output::RunSummary;
use crate::storage::{ReportWriter, UrlRow};
use crate::LinkwatchError;

/// Runs one monitoring pass with the given renderer and report writer
///
/// Crawls every row, writes the failures table, reconciles the collected
/// links against `snapshot`, and writes the changes and snapshot tables.
///
/// # Returns
///
/// * `Ok(RunSummary)` - Every table was written
/// * `Err(LinkwatchError)` - Reconciliation or writing failed
pub async fn monitor_with<R, W>(
    renderer: &mut R,
    writer: &W,
    urls: &[UrlRow],
    snapshot: Option<&[LinkRecord]>,
) -> Result<RunSummary, LinkwatchError>
where
    R: PageRenderer,
    W: ReportWriter,
{
    let crawl = Coordinator::new(renderer).run(urls).await;

    writer.write_failures(&crawl.failures)?;

    let reconciliation = reconcile(&crawl.links, snapshot)?;
    writer.write_changes(&reconciliation.changes)?;
    writer.write_snapshot(&reconciliation.snapshot)?;

    Ok(RunSummary::new(&crawl, &reconciliation))
}

/// Runs a complete monitoring pass in a real browser
///
/// This is the main entry point for a run. It will:
/// 1. Open a WebDriver browser session
/// 2. Render and extract every configured page
/// 3. Reconcile the links against the snapshot
/// 4. Write the report tables
/// 5. Close the browser session, on success and on failure
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `headless` - Render without a visible browser window
/// * `writer` - Destination of the report tables
/// * `urls` - The validated URL list
/// * `snapshot` - The previous snapshot, if any
pub async fn monitor<W: ReportWriter>(
    config: &Config,
    headless: bool,
    writer: &W,
    urls: &[UrlRow],
    snapshot: Option<&[LinkRecord]>,
) -> Result<RunSummary, LinkwatchError> {
    let mut session = BrowserSession::start(config, headless).await?;

    let outcome = monitor_with(&mut session, writer, urls, snapshot).await;

    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close browser session: {}", e);
    }

    outcome
}
