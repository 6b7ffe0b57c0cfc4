//! Assembly of a fresh report store from typed reports.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use vaill_reports_models::{Report, ReportRecord, ReportsDocument};

use crate::StoreError;

/// Keeps the first report seen for each slug, preserving input order.
#[must_use]
pub fn dedupe_by_slug(reports: Vec<Report>) -> Vec<Report> {
    let mut seen = BTreeSet::new();
    reports
        .into_iter()
        .filter(|r| {
            let fresh = seen.insert(r.slug.clone());
            if !fresh {
                log::info!("Skipping duplicate report {} from {}", r.slug, r.source_file);
            }
            fresh
        })
        .collect()
}

/// Builds a `{ generatedAt, totalReports, reports }` document with reports
/// sorted newest first. Slugs are expected to be unique already; see
/// [`dedupe_by_slug`].
///
/// # Errors
///
/// Returns [`StoreError::Json`] if a report fails to convert to a record.
pub fn build_document(
    mut reports: Vec<Report>,
    generated_at: DateTime<Utc>,
) -> Result<ReportsDocument, StoreError> {
    reports.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));

    let mut metadata = Map::new();
    metadata.insert(
        "generatedAt".to_owned(),
        Value::String(generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    metadata.insert("totalReports".to_owned(), Value::from(reports.len()));

    let reports = reports
        .into_iter()
        .map(ReportRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReportsDocument::new(metadata, reports))
}

/// Number of reports per year, in ascending year order.
#[must_use]
pub fn count_by_year(reports: &[Report]) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for report in reports {
        *counts.entry(report.year).or_insert(0) += 1;
    }
    counts
}
