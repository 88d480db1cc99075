//! Reconciliation of freshly extracted links against the stored snapshot
//!
//! # Policy
//!
//! | current | snapshot | changes | updated snapshot |
//! |---------|----------|---------|------------------|
//! | empty | empty | empty | empty |
//! | rows | empty | every row as `new link` | current rows, de-duplicated |
//! | empty | rows | empty | snapshot unchanged |
//! | rows | rows | merge | merge |
//!
//! The merge walks the current rows in order. A row whose identity is absent
//! from the snapshot is a new link and is appended; a row whose identity
//! matches one snapshot row with different text is a text change and the
//! snapshot row's text is overwritten in place. Snapshot rows are never
//! removed.

use crate::links::{
    assign_identities, ChangeRecord, DefinedChange, LinkIdentity, LinkRecord,
};
use crate::ReconcileError;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Output of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Text changes in detection order, followed by new links in detection order
    pub changes: Vec<ChangeRecord>,

    /// The full link inventory after the merge
    pub snapshot: Vec<LinkRecord>,
}

impl Reconciliation {
    /// Number of reported new links
    pub fn new_link_count(&self) -> usize {
        self.count(DefinedChange::NewLink)
    }

    /// Number of reported text changes
    pub fn text_change_count(&self) -> usize {
        self.count(DefinedChange::TextChange)
    }

    fn count(&self, kind: DefinedChange) -> usize {
        self.changes
            .iter()
            .filter(|c| c.defined_change == kind)
            .count()
    }
}

/// Reconciles the current links against a previously persisted snapshot
///
/// Neither input needs to be sorted or de-duplicated. The output is fully
/// determined by the order of the two inputs.
///
/// # Errors
///
/// Returns [`ReconcileError::MultipleMatches`] if one identity names more than
/// one snapshot row. This cannot happen for identities produced by
/// [`assign_identities`] and must abort the run.
///
/// # Example
///
/// ```
/// use linkwatch::links::{reconcile, DefinedChange, LinkRecord};
///
/// let current = vec![LinkRecord {
///     domain: "example.com".to_string(),
///     full_link: "https://example.com/a".to_string(),
///     link_text: "a".to_string(),
///     ..Default::default()
/// }];
/// let result = reconcile(&current, None).unwrap();
/// assert_eq!(result.changes[0].defined_change, DefinedChange::NewLink);
/// assert_eq!(result.snapshot, current);
/// ```
pub fn reconcile(
    current: &[LinkRecord],
    snapshot: Option<&[LinkRecord]>,
) -> Result<Reconciliation, ReconcileError> {
    let snapshot = snapshot.unwrap_or_default();

    match (current.is_empty(), snapshot.is_empty()) {
        (true, true) => {
            tracing::info!("No current or previous links.");
            Ok(Reconciliation::default())
        }
        (false, true) => {
            tracing::info!("No previous links to merge with.");
            let snapshot = dedup(current.iter().cloned());
            let changes = dedup(
                current
                    .iter()
                    .cloned()
                    .map(|link| ChangeRecord::new(link, DefinedChange::NewLink)),
            );
            Ok(Reconciliation { changes, snapshot })
        }
        (true, false) => {
            tracing::info!("No new links to consider.");
            Ok(Reconciliation {
                changes: Vec::new(),
                snapshot: snapshot.to_vec(),
            })
        }
        (false, false) => merge(current, snapshot),
    }
}

fn merge(current: &[LinkRecord], snapshot: &[LinkRecord]) -> Result<Reconciliation, ReconcileError> {
    let mut updated: Vec<LinkRecord> = snapshot.to_vec();
    let snapshot_ids: Vec<LinkIdentity> = assign_identities(snapshot)
        .into_iter()
        .map(|(_, id)| id)
        .collect();

    let mut rows_by_identity: HashMap<&LinkIdentity, Vec<usize>> = HashMap::new();
    for (index, id) in snapshot_ids.iter().enumerate() {
        rows_by_identity.entry(id).or_default().push(index);
    }

    let mut text_changes: Vec<(ChangeRecord, LinkIdentity)> = Vec::new();
    let mut new_links: Vec<(LinkRecord, LinkIdentity)> = Vec::new();

    for (record, identity) in assign_identities(current) {
        match rows_by_identity.get(&identity).map(Vec::as_slice) {
            None => new_links.push((record.clone(), identity)),
            Some([index]) => {
                let existing = &mut updated[*index];
                if existing.link_text != record.link_text {
                    tracing::info!(
                        "Link {} changed text from {:?} to {:?}.",
                        identity,
                        existing.link_text,
                        record.link_text
                    );
                    existing.link_text = record.link_text.clone();
                    text_changes.push((
                        ChangeRecord::new(record.clone(), DefinedChange::TextChange),
                        identity,
                    ));
                }
            }
            Some(matches) => {
                return Err(ReconcileError::MultipleMatches {
                    identity: identity.to_string(),
                    count: matches.len(),
                });
            }
        }
    }

    tracing::info!(
        "{} changes detected.",
        text_changes.len() + new_links.len()
    );

    // Duplicates are judged on content plus identity, so repeated identical
    // anchors survive as distinct occurrences.
    let changes = dedup(text_changes.into_iter().chain(
        new_links
            .iter()
            .cloned()
            .map(|(link, id)| (ChangeRecord::new(link, DefinedChange::NewLink), id)),
    ))
    .into_iter()
    .map(|(change, _)| change)
    .collect();

    let snapshot = dedup(updated.into_iter().zip(snapshot_ids).chain(new_links))
        .into_iter()
        .map(|(link, _)| link)
        .collect();

    Ok(Reconciliation { changes, snapshot })
}

/// Drops exact duplicates, keeping the first occurrence of each item
fn dedup<T: Clone + Eq + Hash>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
