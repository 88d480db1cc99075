//! URL handling module for Linkwatch
//!
//! This module derives the domain of a configured page from its URL.

mod domain;

pub use domain::site_domain;
