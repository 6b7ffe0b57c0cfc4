//! Ordered text filters applied before segmentation.
//!
//! Each [`TextFilter`] is a total, side-effect-free transformation from
//! text to text. A [`FilterPipeline`] runs them in sequence; the default
//! pipeline built by [`FilterPipeline::from_config`] is
//! preamble → header lines → trim.

use std::borrow::Cow;

use regex::Regex;
use vaill_normalize_models::NormalizerConfig;

use crate::NormalizeError;

/// A single cleaning step.
pub trait TextFilter: std::fmt::Debug + Send + Sync {
    /// Short identifier used in log messages.
    fn name(&self) -> &'static str;

    /// Applies the filter. Must never fail.
    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Discards everything before the first preamble marker found.
///
/// Markers are tried in configured order and the text is cut at the first
/// one that occurs anywhere, even if a later marker occurs earlier. Text
/// without any marker is returned unchanged.
#[derive(Debug)]
pub struct PreambleFilter {
    markers: Vec<Regex>,
}

impl PreambleFilter {
    /// Builds one case-insensitive literal matcher per marker.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Regex`] if a marker pattern exceeds the
    /// regex size limit.
    pub fn new(markers: &[String]) -> Result<Self, NormalizeError> {
        let markers = markers
            .iter()
            .filter(|m| !m.is_empty())
            .map(|m| Regex::new(&format!("(?i){}", regex::escape(m))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { markers })
    }
}

impl TextFilter for PreambleFilter {
    fn name(&self) -> &'static str {
        "preamble"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.markers.iter().find_map(|re| re.find(text)) {
            Some(m) => {
                log::trace!("Preamble marker {:?} found at byte {}", m.as_str(), m.start());
                Cow::Borrowed(&text[m.start()..])
            }
            None => Cow::Borrowed(text),
        }
    }
}

/// Removes email header lines, bare `FYI` lines and inline image tokens.
#[derive(Debug)]
pub struct HeaderLineFilter {
    header_lines: Option<Regex>,
    fyi_lines: Option<Regex>,
    image_refs: Option<Regex>,
}

impl HeaderLineFilter {
    /// Builds the filter from the configured header names and patterns.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Regex`] if `image_reference_pattern` is not
    /// a valid regex.
    pub fn new(
        header_fields: &[String],
        strip_fyi: bool,
        image_reference_pattern: Option<&str>,
    ) -> Result<Self, NormalizeError> {
        let fields: Vec<String> = header_fields
            .iter()
            .filter(|f| !f.is_empty())
            .map(|f| regex::escape(f))
            .collect();

        let header_lines = if fields.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(
                r"(?m)^[ \t]*(?:{}):[^\n]*(?:\n|\z)",
                fields.join("|")
            ))?)
        };

        let fyi_lines = if strip_fyi {
            Some(Regex::new(r"(?m)^[ \t]*FYI[ \t\r]*(?:\n|\z)")?)
        } else {
            None
        };

        let image_refs = image_reference_pattern
            .filter(|p| !p.is_empty())
            .map(Regex::new)
            .transpose()?;

        Ok(Self {
            header_lines,
            fyi_lines,
            image_refs,
        })
    }
}

impl TextFilter for HeaderLineFilter {
    fn name(&self) -> &'static str {
        "header_lines"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(text);

        for re in [&self.header_lines, &self.fyi_lines, &self.image_refs]
            .into_iter()
            .flatten()
        {
            if let Cow::Owned(replaced) = re.replace_all(&out, "") {
                out = Cow::Owned(replaced);
            }
        }

        out
    }
}

/// Strips leading and trailing whitespace.
#[derive(Debug, Default)]
pub struct TrimFilter;

impl TextFilter for TrimFilter {
    fn name(&self) -> &'static str {
        "trim"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text.trim())
    }
}

/// An ordered list of filters.
#[derive(Debug, Default)]
pub struct FilterPipeline {
    filters: Vec<Box<dyn TextFilter>>,
}

impl FilterPipeline {
    /// Creates an empty pipeline. Running it returns the input unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard preamble → header lines → trim pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Regex`] if a configured pattern is invalid.
    pub fn from_config(config: &NormalizerConfig) -> Result<Self, NormalizeError> {
        Ok(Self::new()
            .with(PreambleFilter::new(&config.preamble_markers)?)
            .with(HeaderLineFilter::new(
                &config.header_fields,
                config.strip_fyi,
                config.image_reference_pattern.as_deref(),
            )?)
            .with(TrimFilter))
    }

    /// Appends a filter to the end of the pipeline.
    #[must_use]
    pub fn with(mut self, filter: impl TextFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Filter names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Runs every filter in order.
    #[must_use]
    pub fn run(&self, text: &str) -> String {
        let mut current = text.to_owned();
        for filter in &self.filters {
            let next = match filter.apply(&current) {
                Cow::Borrowed(unchanged) if unchanged.len() == current.len() => continue,
                next => next.into_owned(),
            };
            log::trace!("Filter {} rewrote text", filter.name());
            current = next;
        }
        current
    }
}
