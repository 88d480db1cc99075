//! Record types for the link tables
//!
//! Every table a run reads or writes has an explicit record type here. All
//! fields are always present; a value that is missing in a persisted file is
//! carried as an empty string.

use std::fmt;

/// Column order of the persisted snapshot table
pub const SNAPSHOT_HEADER: [&str; 7] = [
    "url",
    "label",
    "domain",
    "link",
    "full_link",
    "link_text",
    "link_class_name",
];

/// Column order of the changes report
pub const CHANGES_HEADER: [&str; 8] = [
    "url",
    "label",
    "domain",
    "link",
    "full_link",
    "link_text",
    "link_class_name",
    "defined_change",
];

/// Column order of the failures report
pub const FAILURES_HEADER: [&str; 2] = ["failure_reason", "url"];

/// One observed anchor on one page at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LinkRecord {
    /// The page that was crawled
    pub source_url: String,

    /// User-supplied tag for the source page
    pub label: String,

    /// Network location of the source page (host[:port])
    pub domain: String,

    /// The href exactly as found in the markup
    pub href: String,

    /// The href resolved against the source page
    pub full_link: String,

    /// Normalized visible text
    pub link_text: String,

    /// Class attribute of the anchor, empty if absent
    pub link_class_name: String,
}

impl LinkRecord {
    /// Returns the record as a row in [`SNAPSHOT_HEADER`] order
    pub fn csv_row(&self) -> [&str; 7] {
        [
            &self.source_url,
            &self.label,
            &self.domain,
            &self.href,
            &self.full_link,
            &self.link_text,
            &self.link_class_name,
        ]
    }
}

/// Classification attached to a reported difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinedChange {
    /// No snapshot row carries the link's identity
    NewLink,
    /// The snapshot row with the same identity has different text
    TextChange,
}

impl DefinedChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewLink => "new link",
            Self::TextChange => "text change",
        }
    }
}

impl fmt::Display for DefinedChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line item of the changes report
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeRecord {
    pub link: LinkRecord,
    pub defined_change: DefinedChange,
}

impl ChangeRecord {
    pub fn new(link: LinkRecord, defined_change: DefinedChange) -> Self {
        Self {
            link,
            defined_change,
        }
    }

    /// Returns the record as a row in [`CHANGES_HEADER`] order
    pub fn csv_row(&self) -> [&str; 8] {
        let [url, label, domain, href, full_link, text, class] = self.link.csv_row();
        [
            url,
            label,
            domain,
            href,
            full_link,
            text,
            class,
            self.defined_change.as_str(),
        ]
    }
}

/// Why a configured URL produced no links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The page could not be fetched or rendered
    UrlNavigation,
    /// The rendered source could not be parsed as HTML
    HtmlParseFailure,
    /// Any other error while extracting links
    Unknown,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UrlNavigation => "URL navigation",
            Self::HtmlParseFailure => "HTML parse failure",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured URL that could not be processed in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub url: String,
    pub failure_reason: FailureReason,
}

impl FailureRecord {
    pub fn new(url: impl Into<String>, failure_reason: FailureReason) -> Self {
        Self {
            url: url.into(),
            failure_reason,
        }
    }

    /// Returns the record as a row in [`FAILURES_HEADER`] order
    pub fn csv_row(&self) -> [&str; 2] {
        [self.failure_reason.as_str(), &self.url]
    }
}

/// Normalizes the visible text of an anchor
///
/// Lower-cases the text and collapses every run of whitespace (spaces, tabs,
/// newlines) to a single space, dropping leading and trailing whitespace.
///
/// # Examples
///
/// ```
/// use linkwatch::links::normalize_link_text;
///
/// assert_eq!(normalize_link_text(" Hello\t  World "), "hello world");
/// ```
pub fn normalize_link_text(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
