#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Batch maintenance of the VAILL report store.
//!
//! - [`fix`] re-extracts a fixed list of PDFs and patches the `html` and
//!   `excerpt` of their existing records.
//! - [`build`] generates a whole store from every PDF in a directory.
//! - [`preview`] normalizes a single file without touching the store.
//!
//! Everything runs sequentially. The store is written once, after every
//! file has been processed, so a failed run leaves it unchanged.

pub mod build;
pub mod fix;
pub mod preview;
pub mod registry;

use vaill_normalize::NormalizeError;
use vaill_pdf::PdfError;
use vaill_reports::StoreError;

pub use vaill_updater_models::*;

/// Errors that abort a batch run.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// Text extraction failed.
    #[error("Extraction error: {0}")]
    Pdf(#[from] PdfError),

    /// The report store could not be read or written.
    #[error("Report store error: {0}")]
    Store(#[from] StoreError),

    /// The normalizer configuration is invalid.
    #[error("Normalizer error: {0}")]
    Normalize(#[from] NormalizeError),

    /// A manifest file did not parse.
    #[error("Invalid manifest: {0}")]
    Manifest(#[from] toml::de::Error),

    /// A filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
