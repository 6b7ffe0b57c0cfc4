#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Text extraction for VAILL report source files.
//!
//! The [`TextExtractor`] trait is the seam between the batch updater and
//! whatever turns a file into raw text. [`PdfExtractor`] uses pure-Rust
//! [`pdf_extract`] and joins pages with a blank line so page boundaries
//! survive as paragraph breaks. [`PlainTextExtractor`] reads `.txt` files
//! verbatim, which is handy for previews and fixtures.

pub mod pages;

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Errors specific to text extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// No extractor handles this file type.
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces page-ordered raw text for a file.
pub trait TextExtractor {
    /// Extracts the text of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the file cannot be read or decoded.
    fn extract(&self, path: &Path) -> Result<String, PdfError>;
}

/// Extracts PDF text with [`pdf_extract`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, PdfError> {
        let bytes = std::fs::read(path)?;

        log::debug!("Read {} bytes from {}", bytes.len(), path.display());

        // pdf_extract panics on some malformed documents instead of
        // returning an error.
        let pages = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        }))
        .map_err(|_| {
            PdfError::Extraction(format!(
                "extraction panicked on malformed document {}",
                path.display()
            ))
        })?
        .map_err(|e| {
            PdfError::Extraction(format!("failed to extract text from {}: {e}", path.display()))
        })?;

        let text = pages::join_pages(&pages);

        log::debug!(
            "Extracted {} pages, {} characters of text from {}",
            pages.len(),
            text.chars().count(),
            path.display()
        );

        Ok(text)
    }
}

/// Reads UTF-8 text files as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, PdfError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Picks an extractor from the file extension (`.pdf` or `.txt`,
/// case-insensitive).
///
/// # Errors
///
/// Returns [`PdfError::Unsupported`] for any other extension.
pub fn extractor_for(path: &Path) -> Result<Box<dyn TextExtractor>, PdfError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("pdf") => Ok(Box::new(PdfExtractor)),
        Some("txt") => Ok(Box::new(PlainTextExtractor)),
        _ => Err(PdfError::Unsupported(path.display().to_string())),
    }
}

/// Returns `true` if `path` has a `.pdf` extension.
#[must_use]
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
