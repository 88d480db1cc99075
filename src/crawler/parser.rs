//! HTML parser for extracting anchor records
//!
//! This module turns rendered page source into the ordered list of anchors
//! on the page:
//! - The raw `href` exactly as written in the markup
//! - The `href` resolved against the page URL
//! - The normalized visible text
//! - The `class` attribute

use crate::links::{normalize_link_text, FailureReason};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// Selector for every anchor carrying an href attribute
const ANCHOR_SELECTOR: &str = "a[href]";

/// Errors raised while extracting links from one page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Document is empty")]
    EmptyDocument,

    #[error("Page URL {url} is not absolute: {source}")]
    InvalidPageUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Cannot resolve href {href:?}: {source}")]
    UnresolvableHref {
        href: String,
        source: url::ParseError,
    },

    #[error("Invalid selector: {0}")]
    Selector(String),
}

impl ExtractError {
    /// Maps the error to the reason recorded in the failures report
    pub fn failure_reason(&self) -> FailureReason {
        match self {
            Self::EmptyDocument => FailureReason::HtmlParseFailure,
            _ => FailureReason::Unknown,
        }
    }
}

/// One anchor found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// The href as found in the markup
    pub href: String,

    /// The href resolved to an absolute URL
    pub full_link: String,

    /// Normalized visible text
    pub link_text: String,

    /// Class attribute, empty if absent
    pub link_class_name: String,
}

/// Parses page source into a document
///
/// The HTML parser recovers from any malformed markup, so the only source
/// that cannot produce a document is an empty one.
///
/// # Returns
///
/// * `Ok(Html)` - The parsed document
/// * `Err(ExtractError::EmptyDocument)` - The source is empty or whitespace
pub fn parse_document(source: &str) -> Result<Html, ExtractError> {
    if source.trim().is_empty() {
        return Err(ExtractError::EmptyDocument);
    }
    Ok(Html::parse_document(source))
}

/// Extracts all anchors with a non-empty href from a document
///
/// When `include_nav_links` is false, anchors with a `<nav>` ancestor are
/// skipped. Anchors are returned in document order. The raw href is read
/// from the unmodified markup before it is resolved, so the raw and resolved
/// values always belong to the same anchor.
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `page_url` - The URL the page was loaded from, used as the base
/// * `include_nav_links` - Whether to keep anchors inside `<nav>` elements
///
/// # Example
///
/// ```
/// use linkwatch::crawler::{extract_links, parse_document};
/// use url::Url;
///
/// let html = r#"<html><body><nav><a href="/home">Home</a></nav><a href="/a">A</a></body></html>"#;
/// let document = parse_document(html).unwrap();
/// let base = Url::parse("https://example.com/").unwrap();
///
/// assert_eq!(extract_links(&document, &base, false).unwrap().len(), 1);
/// assert_eq!(extract_links(&document, &base, true).unwrap().len(), 2);
/// ```
pub fn extract_links(
    document: &Html,
    page_url: &Url,
    include_nav_links: bool,
) -> Result<Vec<ExtractedLink>, ExtractError> {
    let selector =
        Selector::parse(ANCHOR_SELECTOR).map_err(|e| ExtractError::Selector(format!("{:?}", e)))?;

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.trim().is_empty() {
            continue;
        }
        if !include_nav_links && has_nav_ancestor(&element) {
            continue;
        }

        let full_link = page_url
            .join(href)
            .map_err(|source| ExtractError::UnresolvableHref {
                href: href.to_string(),
                source,
            })?;

        links.push(ExtractedLink {
            href: href.to_string(),
            full_link: full_link.to_string(),
            link_text: normalize_link_text(&element.text().collect::<String>()),
            link_class_name: element.value().attr("class").unwrap_or_default().to_string(),
        });
    }

    Ok(links)
}

/// Parses page source and extracts its anchors in one step
pub fn extract_page_links(
    source: &str,
    page_url: &str,
    include_nav_links: bool,
) -> Result<Vec<ExtractedLink>, ExtractError> {
    let base = Url::parse(page_url).map_err(|source| ExtractError::InvalidPageUrl {
        url: page_url.to_string(),
        source,
    })?;
    let document = parse_document(source)?;
    extract_links(&document, &base, include_nav_links)
}

/// Returns true if any ancestor of the element is a `<nav>`
fn has_nav_ancestor(element: &ElementRef) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|ancestor| ancestor.name() == "nav")
    })
}
