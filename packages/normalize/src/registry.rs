//! Compile-time default normalizer vocabulary, plus loading of
//! user-supplied overrides.
//!
//! The default lives in `config/default.toml` and is embedded via
//! `include_str!`.

use std::path::Path;

use vaill_normalize_models::NormalizerConfig;

use crate::NormalizeError;

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Returns the embedded default configuration.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. It is a compile-time
/// constant, so a failure is a development error caught by the tests
/// below.
#[must_use]
pub fn default_config() -> NormalizerConfig {
    parse_config(DEFAULT_CONFIG_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded normalizer config: {e}"))
}

/// Parses a configuration from TOML text.
///
/// # Errors
///
/// Returns [`NormalizeError::Config`] if the TOML is malformed or missing
/// required keys.
pub fn parse_config(toml_str: &str) -> Result<NormalizerConfig, NormalizeError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Loads a configuration file from disk.
///
/// # Errors
///
/// Returns [`NormalizeError::Io`] if the file cannot be read, or
/// [`NormalizeError::Config`] if it does not parse.
pub fn load_config(path: &Path) -> Result<NormalizerConfig, NormalizeError> {
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    log::info!("Loaded normalizer config from {}", path.display());
    Ok(config)
}
