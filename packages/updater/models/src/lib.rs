#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Batch updater configuration, progress, and result types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One source file to re-extract, and the record it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Slug of the record to patch (e.g. `"2023-11"`).
    pub slug: String,
    /// File name inside the source directory.
    pub filename: String,
}

/// Hand-maintained list of files whose records need re-extracting,
/// deserialized from TOML. Entries are processed in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixManifest {
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,
}

impl FixManifest {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Settings for generating a store from every file in the source
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// File name substrings that are never reports (drafts, budget mail).
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Year assumed for monthly file names that carry no year.
    pub default_year: u32,
    /// HTML body used when a PDF cannot be extracted.
    pub placeholder_html: String,
    /// Excerpt used when a PDF cannot be extracted.
    pub placeholder_excerpt: String,
}

/// What happened to one manifest entry during a fix run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The source file does not exist; its record was left untouched.
    Missing { slug: String, filename: String },
    /// The record was patched.
    Updated {
        slug: String,
        filename: String,
        /// Characters of extracted text.
        chars: usize,
        title: Option<String>,
    },
    /// Text was extracted but no record has this slug.
    Unmatched {
        slug: String,
        filename: String,
        chars: usize,
    },
}

/// Result of a fix run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixSummary {
    /// Records in the loaded store.
    pub total_reports: usize,
    /// Per-entry outcomes, in manifest order.
    pub outcomes: Vec<FileOutcome>,
    /// Where the store was written, or `None` for a dry run.
    pub written_to: Option<PathBuf>,
}

impl FixSummary {
    /// Number of records that were patched.
    #[must_use]
    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Updated { .. }))
            .count()
    }

    /// Number of manifest entries whose file was missing.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Missing { .. }))
            .count()
    }
}

/// Something that happened during a fix run, reported as it happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixEvent<'a> {
    /// The store was loaded with `total` records.
    Loaded { total: usize },
    /// A manifest file does not exist.
    Missing { filename: &'a str },
    /// Extraction of a file is about to start.
    Processing { filename: &'a str },
    /// A file was extracted.
    Extracted { filename: &'a str, chars: usize },
    /// A record was patched.
    Updated { slug: &'a str, title: Option<&'a str> },
    /// The store was written.
    Saved { path: &'a Path },
}

/// Receives [`FixEvent`]s while a fix run is in progress, so output can
/// be shown before the run finishes or fails.
pub trait FixReporter {
    fn report(&self, event: FixEvent<'_>);
}

/// A [`FixReporter`] that ignores every event.
pub struct SilentReporter;

impl FixReporter for SilentReporter {
    fn report(&self, _event: FixEvent<'_>) {}
}

/// Why a directory entry was not turned into a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Hidden,
    Excluded,
    NotPdf,
    UnknownPeriod,
}

/// What happened to one directory entry during a build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// A report was produced.
    Added {
        filename: String,
        slug: String,
        title: String,
    },
    /// A report was produced with placeholder content because extraction
    /// failed.
    Placeholder {
        filename: String,
        slug: String,
        error: String,
    },
    /// The file was ignored.
    Skipped { filename: String, reason: SkipReason },
}

/// Result of a build run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Per-file outcomes, in directory order.
    pub outcomes: Vec<BuildOutcome>,
    /// Reports produced before deduplication, placeholders included.
    pub candidate_reports: usize,
    /// Reports written after deduplication.
    pub total_reports: usize,
    /// Written reports per year.
    pub reports_by_year: BTreeMap<u32, usize>,
    /// Where the store was written, or `None` for a dry run.
    pub written_to: Option<PathBuf>,
}

/// Trait for reporting progress from batch operations.
///
/// Implementations must be `Send + Sync` so a single bar can be shared
/// through an [`Arc`].
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected units of work.
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// A [`ProgressCallback`] that ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
