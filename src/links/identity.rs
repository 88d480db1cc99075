//! Stable identities for link records
//!
//! A link is identified by the page domain and its absolute URL, plus the
//! zero-based index of its occurrence among the rows of the same table that
//! share that pair. Ties between identical anchors are broken purely by row
//! order, so re-assigning an unchanged table yields unchanged identities.

use crate::links::LinkRecord;
use std::collections::HashMap;
use std::fmt;

/// Identity of a link within one table
///
/// Two records from different tables refer to the same link iff their
/// identities are equal. The parts are kept separate rather than
/// concatenated so that distinct pre-keys can never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkIdentity {
    domain: String,
    full_link: String,
    occurrence: usize,
}

impl LinkIdentity {
    pub fn new(domain: impl Into<String>, full_link: impl Into<String>, occurrence: usize) -> Self {
        Self {
            domain: domain.into(),
            full_link: full_link.into(),
            occurrence,
        }
    }

    /// The `domain_fulllink` grouping key shared by every occurrence
    pub fn pre_key(&self) -> String {
        format!("{}_{}", self.domain, self.full_link)
    }

    /// Index of this occurrence among rows sharing the pre-key
    pub fn occurrence(&self) -> usize {
        self.occurrence
    }
}

impl fmt::Display for LinkIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}{}", self.domain, self.full_link, self.occurrence)
    }
}

/// Assigns an identity to every row of a table
///
/// The output is positionally aligned with `table`. The function is pure:
/// calling it twice on the same rows in the same order returns equal results.
///
/// # Examples
///
/// ```
/// use linkwatch::links::{assign_identities, LinkRecord};
///
/// let row = LinkRecord {
///     domain: "example.com".to_string(),
///     full_link: "https://example.com/a".to_string(),
///     ..Default::default()
/// };
/// let table = vec![row.clone(), row];
/// let ids = assign_identities(&table);
/// assert_eq!(ids[0].1.to_string(), "example.com_https://example.com/a0");
/// assert_eq!(ids[1].1.to_string(), "example.com_https://example.com/a1");
/// ```
pub fn assign_identities(table: &[LinkRecord]) -> Vec<(&LinkRecord, LinkIdentity)> {
    let mut seen: HashMap<(&str, &str), usize> = HashMap::new();

    table
        .iter()
        .map(|record| {
            let counter = seen
                .entry((record.domain.as_str(), record.full_link.as_str()))
                .or_insert(0);
            let identity = LinkIdentity::new(&record.domain, &record.full_link, *counter);
            *counter += 1;
            (record, identity)
        })
        .collect()
}
