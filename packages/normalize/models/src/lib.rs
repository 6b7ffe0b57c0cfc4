#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Normalizer configuration and the block types it produces.
//!
//! A [`NormalizerConfig`] is deserialized from TOML and holds every
//! vocabulary list and threshold the normalizer consults, so that heading
//! terms and bullet glyphs can be swapped per call. The output side is a
//! flat [`Block`] sequence, grouped into an [`HtmlFragment`] of
//! [`Element`]s before rendering.

use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;

/// Vocabulary and thresholds used to clean and segment extracted report
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Phrases marking where the real report starts after an email
    /// forwarding preamble. Matched case-insensitively.
    pub preamble_markers: Vec<String>,
    /// Email header names (without the trailing colon) whose lines are
    /// removed, e.g. `"From"` or `"Subject"`.
    pub header_fields: Vec<String>,
    /// Whether bare `FYI` lines are removed.
    #[serde(default = "default_true")]
    pub strip_fyi: bool,
    /// Regex matching inline image references left behind by the mail
    /// client (e.g. `image001.png`).
    pub image_reference_pattern: Option<String>,
    /// Known section titles. A line starting with one of these
    /// (case-insensitive) is a heading.
    pub section_headings: Vec<String>,
    /// Case-sensitive prefix that marks an ad-hoc heading such as
    /// `"VAILL Activities in December 2023"`.
    pub heading_keyword: Option<String>,
    /// Vocabulary headings must be strictly shorter than this many chars.
    #[serde(default = "default_vocabulary_heading_max_chars")]
    pub vocabulary_heading_max_chars: usize,
    /// Keyword headings must be strictly shorter than this many chars.
    #[serde(default = "default_keyword_heading_max_chars")]
    pub keyword_heading_max_chars: usize,
    /// Characters that open a bullet line.
    pub bullet_glyphs: Vec<char>,
    /// Number of chars of cleaned text kept in the excerpt.
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
    /// Marker appended to every excerpt.
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,
}

const fn default_true() -> bool {
    true
}

const fn default_vocabulary_heading_max_chars() -> usize {
    100
}

const fn default_keyword_heading_max_chars() -> usize {
    80
}

const fn default_excerpt_chars() -> usize {
    300
}

fn default_ellipsis() -> String {
    "...".to_owned()
}

/// One classified line (or run of lines) of report text.
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Block {
    /// A section title.
    Heading(String),
    /// Body text: one or more source lines joined with single spaces.
    Paragraph(String),
    /// A single bullet, glyph already stripped.
    ListItem(String),
}

/// A renderable element. Consecutive [`Block::ListItem`]s collapse into a
/// single [`Element::List`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Rendered as `<h2>`.
    Heading(String),
    /// Rendered as `<p>`.
    Paragraph(String),
    /// Rendered as `<ul>` with one `<li>` per item.
    List(Vec<String>),
}

/// Ordered sequence of elements making up a report body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlFragment {
    /// Elements in source order.
    pub elements: Vec<Element>,
}

impl HtmlFragment {
    /// Groups a flat block sequence, wrapping every maximal run of list
    /// items in one [`Element::List`]. All other blocks pass through in
    /// order.
    #[must_use]
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        let mut elements = Vec::new();

        for block in blocks {
            match block {
                Block::Heading(text) => elements.push(Element::Heading(text)),
                Block::Paragraph(text) => elements.push(Element::Paragraph(text)),
                Block::ListItem(text) => {
                    if let Some(Element::List(items)) = elements.last_mut() {
                        items.push(text);
                    } else {
                        elements.push(Element::List(vec![text]));
                    }
                }
            }
        }

        Self { elements }
    }

    /// Returns `true` if the fragment has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of top-level elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }
}

/// Result of normalizing one document's raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Text after the filter pipeline ran, before classification.
    pub cleaned_text: String,
    /// Grouped body elements.
    pub fragment: HtmlFragment,
    /// Rendered HTML for [`Self::fragment`].
    pub html: String,
    /// Plain-text preview taken from [`Self::cleaned_text`].
    pub excerpt: String,
}
