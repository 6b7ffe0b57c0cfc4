#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report store document types.
//!
//! The website reads a single `reports.json` document shaped like
//! `{ "generatedAt": ..., "totalReports": ..., "reports": [ ... ] }`.
//! [`ReportsDocument`] and [`ReportRecord`] keep every field they do not
//! model explicitly, in its original position, so that patching a record
//! only touches the fields being patched. [`Report`] is the fully typed
//! record written when a store is generated from scratch.

use serde::de::Error as _;
use serde::ser::SerializeMap as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use strum_macros::Display;

/// Key of the record identifier field.
pub const SLUG_FIELD: &str = "slug";
/// Key of the rendered HTML body field.
pub const HTML_FIELD: &str = "html";
/// Key of the plain-text preview field.
pub const EXCERPT_FIELD: &str = "excerpt";
/// Key of the human-readable title field.
pub const TITLE_FIELD: &str = "title";
/// Top-level key holding the record array.
pub const REPORTS_FIELD: &str = "reports";

/// One entry in the report store, identified by its `slug` field.
///
/// The record is kept as a single ordered map, so every field, `slug`
/// included, is written back where it was read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportRecord {
    /// All fields, in document order.
    pub fields: Map<String, Value>,
}

impl ReportRecord {
    /// Returns a string field, if present and a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Returns the record identifier (e.g. `"2023-11"` or `"2024-q2"`).
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.get_str(SLUG_FIELD)
    }

    /// Returns the record title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get_str(TITLE_FIELD)
    }

    /// Returns the rendered HTML body.
    #[must_use]
    pub fn html(&self) -> Option<&str> {
        self.get_str(HTML_FIELD)
    }

    /// Returns the plain-text preview.
    #[must_use]
    pub fn excerpt(&self) -> Option<&str> {
        self.get_str(EXCERPT_FIELD)
    }

    /// Replaces `html` and `excerpt`. Existing keys keep their position;
    /// missing keys are appended.
    pub fn apply(&mut self, patch: &ReportPatch) {
        self.fields
            .insert(HTML_FIELD.to_owned(), Value::String(patch.html.clone()));
        self.fields
            .insert(EXCERPT_FIELD.to_owned(), Value::String(patch.excerpt.clone()));
    }
}

/// New body content for an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPatch {
    /// Rendered HTML body.
    pub html: String,
    /// Plain-text preview.
    pub excerpt: String,
}

/// The whole report store.
///
/// Serializes as one JSON object. `reports` is written back at the
/// position it was read from; documents built in memory put it last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportsDocument {
    /// Top-level fields other than `reports` (e.g. `generatedAt`).
    pub metadata: Map<String, Value>,
    /// Report records in document order.
    pub reports: Vec<ReportRecord>,
    /// Index among the metadata keys at which `reports` appears. `None`
    /// means after the last one.
    reports_position: Option<usize>,
}

impl ReportsDocument {
    /// Creates a document with `reports` following all `metadata` keys.
    #[must_use]
    pub const fn new(metadata: Map<String, Value>, reports: Vec<ReportRecord>) -> Self {
        Self {
            metadata,
            reports,
            reports_position: None,
        }
    }

    /// Finds the record with `slug`.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&ReportRecord> {
        self.reports.iter().find(|r| r.slug() == Some(slug))
    }

    /// Finds the record with `slug` for mutation.
    pub fn find_mut(&mut self, slug: &str) -> Option<&mut ReportRecord> {
        self.reports.iter_mut().find(|r| r.slug() == Some(slug))
    }

    /// Patches the first record with `slug`, returning it. Returns `None`
    /// and changes nothing if no record matches.
    pub fn apply(&mut self, slug: &str, patch: &ReportPatch) -> Option<&ReportRecord> {
        let record = self.find_mut(slug)?;
        record.apply(patch);
        Some(record)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl Serialize for ReportsDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let position = self
            .reports_position
            .map_or(self.metadata.len(), |p| p.min(self.metadata.len()));

        let mut map = serializer.serialize_map(Some(self.metadata.len() + 1))?;
        for (i, (key, value)) in self.metadata.iter().enumerate() {
            if i == position {
                map.serialize_entry(REPORTS_FIELD, &self.reports)?;
            }
            map.serialize_entry(key, value)?;
        }
        if position == self.metadata.len() {
            map.serialize_entry(REPORTS_FIELD, &self.reports)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ReportsDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut metadata = Map::<String, Value>::deserialize(deserializer)?;

        let position = metadata
            .keys()
            .position(|k| k == REPORTS_FIELD)
            .ok_or_else(|| D::Error::missing_field(REPORTS_FIELD))?;
        let reports = metadata
            .shift_remove(REPORTS_FIELD)
            .map(Vec::<ReportRecord>::deserialize)
            .transpose()
            .map_err(D::Error::custom)?
            .unwrap_or_default();

        Ok(Self {
            reports_position: (position < metadata.len()).then_some(position),
            metadata,
            reports,
        })
    }
}

/// Cadence of a report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportKind {
    /// A monthly update.
    Monthly,
    /// A quarterly report.
    Quarterly,
}

/// A fully typed report, as written when the store is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub slug: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub year: u32,
    pub month: u32,
    /// `null` for monthly reports.
    pub quarter: Option<u32>,
    /// `year * 100 + month`; newest sorts highest.
    pub sort_key: u32,
    /// File name the report was generated from.
    pub source_file: String,
    pub html: String,
    pub excerpt: String,
}

impl TryFrom<Report> for ReportRecord {
    type Error = serde_json::Error;

    fn try_from(report: Report) -> Result<Self, Self::Error> {
        serde_json::from_value(serde_json::to_value(report)?)
    }
}
