//! Reading and writing the `reports.json` store.

use std::path::Path;

use vaill_reports_models::ReportsDocument;

use crate::StoreError;

/// Loads the whole report store.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read, or
/// [`StoreError::Json`] if it is not a `{ "reports": [...] }` document.
pub fn load(path: &Path) -> Result<ReportsDocument, StoreError> {
    let contents = std::fs::read_to_string(path)?;
    let doc: ReportsDocument = serde_json::from_str(&contents)?;
    log::debug!("Loaded {} reports from {}", doc.len(), path.display());
    Ok(doc)
}

/// Serializes the store with two-space indentation, preserving field
/// order.
///
/// # Errors
///
/// Returns [`StoreError::Json`] if serialization fails.
pub fn to_string(doc: &ReportsDocument) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Overwrites `path` with the whole store.
///
/// The document is serialized before the file is touched, so a
/// serialization failure leaves the existing file intact.
///
/// # Errors
///
/// Returns [`StoreError`] if serialization or the write fails.
pub fn save(path: &Path, doc: &ReportsDocument) -> Result<(), StoreError> {
    let json = to_string(doc)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    log::debug!("Wrote {} reports to {}", doc.len(), path.display());
    Ok(())
}
