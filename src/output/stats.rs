//! Run statistics
//!
//! This module summarizes one monitoring pass for display at the end of a
//! run.

use crate::crawler::CrawlOutcome;
use crate::links::{FailureReason, Reconciliation};

/// Summary of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of pages in the URL list
    pub pages_attempted: usize,

    /// Failed pages by reason, in a fixed reason order
    pub failures_by_reason: Vec<(FailureReason, usize)>,

    /// Unique links extracted across all pages
    pub links_extracted: usize,

    /// Links absent from the previous snapshot
    pub new_links: usize,

    /// Links whose text differs from the previous snapshot
    pub text_changes: usize,

    /// Rows in the updated snapshot
    pub snapshot_size: usize,
}

impl RunSummary {
    pub fn new(crawl: &CrawlOutcome, reconciliation: &Reconciliation) -> Self {
        let failures_by_reason = [
            FailureReason::UrlNavigation,
            FailureReason::HtmlParseFailure,
            FailureReason::Unknown,
        ]
        .into_iter()
        .map(|reason| {
            let count = crawl
                .failures
                .iter()
                .filter(|f| f.failure_reason == reason)
                .count();
            (reason, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();

        Self {
            pages_attempted: crawl.pages_attempted,
            failures_by_reason,
            links_extracted: crawl.links.len(),
            new_links: reconciliation.new_link_count(),
            text_changes: reconciliation.text_change_count(),
            snapshot_size: reconciliation.snapshot.len(),
        }
    }

    /// Total number of failed pages
    pub fn pages_failed(&self) -> usize {
        self.failures_by_reason.iter().map(|(_, count)| count).sum()
    }

    /// Share of pages that produced links, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.pages_attempted == 0 {
            return 0.0;
        }
        let succeeded = self.pages_attempted - self.pages_failed();
        (succeeded as f64 / self.pages_attempted as f64) * 100.0
    }
}

/// Prints a run summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Link Monitoring Summary ===\n");

    println!("Pages:");
    println!("  Configured: {}", summary.pages_attempted);
    println!("  Failed: {}", summary.pages_failed());
    for (reason, count) in &summary.failures_by_reason {
        println!("    {}: {}", reason, count);
    }
    println!();

    println!("Links:");
    println!("  Extracted: {}", summary.links_extracted);
    println!("  New links: {}", summary.new_links);
    println!("  Text changes: {}", summary.text_changes);
    println!("  Snapshot size: {}", summary.snapshot_size);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages processed)",
        summary.success_rate(),
        summary.pages_attempted - summary.pages_failed(),
        summary.pages_attempted
    );
}
