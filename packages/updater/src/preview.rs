//! Single-file normalization without touching the store.

use std::path::Path;

use vaill_normalize::{Normalized, Normalizer};

use crate::UpdateError;

/// Extracts and normalizes one `.pdf` or `.txt` file.
///
/// # Errors
///
/// Returns [`UpdateError::Pdf`] if the file type is unsupported or
/// extraction fails.
pub fn preview(path: &Path, normalizer: &Normalizer) -> Result<Normalized, UpdateError> {
    let extractor = vaill_pdf::extractor_for(path)?;
    let text = extractor.extract(path)?;
    log::info!(
        "Extracted {} characters from {}",
        text.chars().count(),
        path.display()
    );
    Ok(normalizer.normalize(&text))
}
