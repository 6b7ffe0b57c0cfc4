#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Access to the JSON report store behind the VAILL reports site.
//!
//! - [`store`] loads and rewrites `reports.json` wholesale.
//! - [`filename`] works out which month or quarter a source file covers.
//! - [`catalog`] assembles a fresh store from typed reports.

pub mod catalog;
pub mod filename;
pub mod store;

pub use vaill_reports_models::{Report, ReportKind, ReportPatch, ReportRecord, ReportsDocument};

/// Errors reading or writing the report store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store is not valid JSON of the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
