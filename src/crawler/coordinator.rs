//! Page coordinator - per-run orchestration of the configured URLs
//!
//! This module walks the URL list one page at a time:
//! - Deriving each page's domain once, up front
//! - Rendering the page and extracting its anchors
//! - Turning every per-page problem into a failure record
//! - De-duplicating the collected links before reconciliation

use crate::crawler::fetcher::PageRenderer;
use crate::crawler::parser::extract_page_links;
use crate::links::{FailureReason, FailureRecord, LinkRecord};
use crate::storage::UrlRow;
use crate::url::site_domain;
use std::collections::HashSet;

/// A configured page, ready to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTarget {
    pub url: String,
    pub label: String,
    pub domain: String,
    pub include_nav_links: bool,
}

impl PageTarget {
    pub fn from_row(row: &UrlRow) -> Self {
        Self {
            domain: site_domain(&row.url),
            url: row.url.clone(),
            label: row.label.clone(),
            include_nav_links: row.include_nav_links,
        }
    }
}

/// Result of processing one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was rendered and its anchors extracted
    Links(Vec<LinkRecord>),
    /// The page produced no links
    Failed(FailureRecord),
}

/// Everything collected from one pass over the URL list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Number of configured pages attempted
    pub pages_attempted: usize,

    /// De-duplicated links from every successful page, in crawl order
    pub links: Vec<LinkRecord>,

    /// One record per failed page, in crawl order
    pub failures: Vec<FailureRecord>,
}

/// Turns rendered page source into link records for `target`
///
/// Extraction errors become failure records; this never fails.
pub fn links_from_source(target: &PageTarget, source: &str) -> PageOutcome {
    match extract_page_links(source, &target.url, target.include_nav_links) {
        Ok(extracted) => PageOutcome::Links(
            extracted
                .into_iter()
                .map(|link| LinkRecord {
                    source_url: target.url.clone(),
                    label: target.label.clone(),
                    domain: target.domain.clone(),
                    href: link.href,
                    full_link: link.full_link,
                    link_text: link.link_text,
                    link_class_name: link.link_class_name,
                })
                .collect(),
        ),
        Err(e) => {
            let reason = e.failure_reason();
            match reason {
                FailureReason::HtmlParseFailure => {
                    tracing::warn!("Error parsing HTML content of {}: {}", target.url, e)
                }
                _ => tracing::warn!("Unexpected error processing {}: {}", target.url, e),
            }
            PageOutcome::Failed(FailureRecord::new(&target.url, reason))
        }
    }
}

/// Main page coordinator structure
pub struct Coordinator<'a, R: PageRenderer> {
    renderer: &'a mut R,
}

impl<'a, R: PageRenderer> Coordinator<'a, R> {
    /// Creates a coordinator that renders pages with `renderer`
    pub fn new(renderer: &'a mut R) -> Self {
        Self { renderer }
    }

    /// Renders and extracts a single page
    pub async fn process_page(&mut self, target: &PageTarget) -> PageOutcome {
        tracing::info!("Parsing links from {}", target.url);

        match self.renderer.render(&target.url).await {
            Ok(source) => links_from_source(target, &source),
            Err(e) => {
                tracing::warn!("Error navigating to url {}: {}", target.url, e);
                PageOutcome::Failed(FailureRecord::new(
                    &target.url,
                    FailureReason::UrlNavigation,
                ))
            }
        }
    }

    /// Processes every configured page in order
    ///
    /// A failing page is recorded and the pass continues with the next one.
    pub async fn run(&mut self, rows: &[UrlRow]) -> CrawlOutcome {
        tracing::info!("Scraping {} URLs.", rows.len());

        let targets: Vec<PageTarget> = rows.iter().map(PageTarget::from_row).collect();

        let mut links = Vec::new();
        let mut failures = Vec::new();
        for target in &targets {
            match self.process_page(target).await {
                PageOutcome::Links(found) => {
                    tracing::debug!("Found {} links on {}", found.len(), target.url);
                    links.extend(found);
                }
                PageOutcome::Failed(failure) => failures.push(failure),
            }
        }

        let mut seen = HashSet::new();
        links.retain(|link: &LinkRecord| seen.insert(link.clone()));

        tracing::info!(
            "Collected {} links, {} pages failed",
            links.len(),
            failures.len()
        );

        CrawlOutcome {
            pages_attempted: targets.len(),
            links,
            failures,
        }
    }
}
