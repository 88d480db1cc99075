//! Output module for reporting run results to the user

pub mod stats;

pub use stats::{print_summary, RunSummary};
