//! Compile-time manifests for the batch updater.
//!
//! The fix manifest and build settings are TOML files under `manifests/`
//! embedded via `include_str!`. A fix manifest can also be loaded from disk
//! to re-extract a different set of files.

use std::path::Path;

use vaill_updater_models::{BuildSettings, FixManifest};

use crate::UpdateError;

/// Number of entries in the embedded fix manifest. Enforced by a test.
#[cfg(test)]
const EXPECTED_FIX_ENTRIES: usize = 3;

const FIX_MANIFEST_TOML: &str = include_str!("../manifests/fix_pdfs.toml");
const BUILD_SETTINGS_TOML: &str = include_str!("../manifests/build.toml");

/// Returns the embedded fix manifest.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. Since it is a compile-time
/// constant, a parse failure is a development error caught by the tests.
#[must_use]
pub fn default_manifest() -> FixManifest {
    toml::de::from_str(FIX_MANIFEST_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded fix manifest: {e}"))
}

/// Returns the embedded build settings.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse.
#[must_use]
pub fn default_build_settings() -> BuildSettings {
    toml::de::from_str(BUILD_SETTINGS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded build settings: {e}"))
}

/// Loads a fix manifest from disk.
///
/// # Errors
///
/// Returns [`UpdateError::Io`] if the file cannot be read, or
/// [`UpdateError::Manifest`] if it does not parse.
pub fn load_manifest(path: &Path) -> Result<FixManifest, UpdateError> {
    let contents = std::fs::read_to_string(path)?;
    let manifest: FixManifest = toml::de::from_str(&contents)?;
    log::info!(
        "Loaded fix manifest with {} entries from {}",
        manifest.len(),
        path.display()
    );
    Ok(manifest)
}
