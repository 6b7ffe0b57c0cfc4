#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Heuristic conversion of extracted report text into simple HTML.
//!
//! Monthly VAILL updates arrive as forwarded emails printed to PDF. Once
//! the text is extracted, [`Normalizer`] cleans it with an ordered
//! [`filters::FilterPipeline`] (forwarding preamble, email headers, image
//! tokens), classifies each line with a [`segment::Segmenter`], groups
//! bullet runs into lists and renders `<h2>`/`<p>`/`<ul>` markup.
//!
//! Normalization is a pure function of the input text and the
//! [`NormalizerConfig`] the normalizer was built with. It never fails;
//! only building a normalizer from a bad config can.

pub mod filters;
pub mod registry;
pub mod render;
pub mod segment;

pub use vaill_normalize_models::{Block, Element, HtmlFragment, Normalized, NormalizerConfig};

use filters::FilterPipeline;
use segment::Segmenter;

/// Errors building a [`Normalizer`] or loading its configuration.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// A configured pattern failed to compile.
    #[error("Invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A configuration file did not parse.
    #[error("Invalid normalizer config: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text → HTML normalizer for a fixed configuration.
#[derive(Debug)]
pub struct Normalizer {
    pipeline: FilterPipeline,
    segmenter: Segmenter,
    excerpt_chars: usize,
    ellipsis: String,
}

impl Normalizer {
    /// Builds a normalizer with the standard filter pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Regex`] if a configured pattern is invalid.
    pub fn new(config: &NormalizerConfig) -> Result<Self, NormalizeError> {
        Ok(Self::with_pipeline(config, FilterPipeline::from_config(config)?))
    }

    /// Builds a normalizer around a caller-supplied filter pipeline.
    #[must_use]
    pub fn with_pipeline(config: &NormalizerConfig, pipeline: FilterPipeline) -> Self {
        Self {
            pipeline,
            segmenter: Segmenter::new(config),
            excerpt_chars: config.excerpt_chars,
            ellipsis: config.ellipsis.clone(),
        }
    }

    /// Builds a normalizer from the embedded default vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Regex`] if the embedded image pattern is
    /// invalid.
    pub fn with_defaults() -> Result<Self, NormalizeError> {
        Self::new(&registry::default_config())
    }

    /// Cleans, segments, groups and renders `raw`.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> Normalized {
        let cleaned_text = self.clean(raw);
        let fragment = HtmlFragment::from_blocks(self.segmenter.segment(&cleaned_text));
        let html = render::render(&fragment);
        let excerpt = self.excerpt(&cleaned_text);

        log::debug!(
            "Normalized {} chars into {} elements ({} chars of HTML)",
            raw.chars().count(),
            fragment.len(),
            html.chars().count()
        );

        Normalized {
            cleaned_text,
            fragment,
            html,
            excerpt,
        }
    }

    /// Runs only the filter pipeline.
    #[must_use]
    pub fn clean(&self, raw: &str) -> String {
        self.pipeline.run(raw)
    }

    /// First `excerpt_chars` chars of `cleaned` followed by the ellipsis.
    #[must_use]
    pub fn excerpt(&self, cleaned: &str) -> String {
        let mut excerpt: String = cleaned.chars().take(self.excerpt_chars).collect();
        excerpt.push_str(&self.ellipsis);
        excerpt
    }
}
