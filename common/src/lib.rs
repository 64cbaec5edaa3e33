//! Shared types and pure logic for the bank guarantee tracker.
//!
//! Everything in this crate is free of I/O so that it can be used by the
//! backend service and exercised directly in tests:
//!
//! - `model`: the guarantee record, its closed enumerations, statistics and
//!   realtime change events.
//! - `requests`: payloads exchanged with the HTTP API.
//! - `csv`: the import/export codec and the downloadable template.
//! - `validate`: the boundary that turns a parsed CSV row into a record that
//!   can be created, or a list of defects.
//! - `reconcile`: the newest-first list kept in sync with change events.

pub mod csv;
pub mod model;
pub mod reconcile;
pub mod requests;
pub mod validate;

/// Currency used whenever a record does not carry one.
pub const HOME_CURRENCY: &str = "SAR";
