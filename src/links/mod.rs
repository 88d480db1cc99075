//! Link records, identities and reconciliation
//!
//! This module is the core of a run:
//! - Explicit record types for every table a run reads or writes
//! - Identity assignment that stays stable across independent runs
//! - Reconciliation of current links against the stored snapshot

mod identity;
mod reconcile;
mod record;

pub use identity::{assign_identities, LinkIdentity};
pub use reconcile::{reconcile, Reconciliation};
pub use record::{
    normalize_link_text, ChangeRecord, DefinedChange, FailureReason, FailureRecord, LinkRecord,
    CHANGES_HEADER, FAILURES_HEADER, SNAPSHOT_HEADER,
};
