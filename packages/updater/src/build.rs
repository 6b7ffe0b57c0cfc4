//! Generation of a complete report store from a directory of PDFs.
//!
//! Unlike [`crate::fix`], a build creates every record from scratch: file
//! names give the reporting period, extraction failures fall back to a
//! placeholder body, and the result replaces the store wholesale.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use vaill_normalize::Normalizer;
use vaill_pdf::TextExtractor;
use vaill_reports::filename::parse_filename;
use vaill_reports::{Report, catalog, store};
use vaill_updater_models::{BuildOutcome, BuildSettings, BuildSummary, ProgressCallback, SkipReason};

use crate::UpdateError;

/// Where a build run reads from and writes to.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory holding the source documents.
    pub source_dir: PathBuf,
    /// The `reports.json` store to overwrite.
    pub reports_file: PathBuf,
    /// Process everything but skip writing the store.
    pub dry_run: bool,
}

/// Builds a store from every report PDF in the source directory.
///
/// Files are visited in name order. The first report for a slug wins.
///
/// # Errors
///
/// Returns [`UpdateError::Io`] if the directory cannot be listed, or
/// [`UpdateError::Store`] if the store cannot be written.
pub fn run(
    options: &BuildOptions,
    settings: &BuildSettings,
    normalizer: &Normalizer,
    extractor: &dyn TextExtractor,
    progress: &Arc<dyn ProgressCallback>,
    generated_at: DateTime<Utc>,
) -> Result<BuildSummary, UpdateError> {
    let mut filenames = std::fs::read_dir(&options.source_dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>, _>>()?;
    filenames.sort();

    log::info!(
        "Found {} files in {}",
        filenames.len(),
        options.source_dir.display()
    );
    progress.set_total(filenames.len() as u64);

    let mut outcomes = Vec::with_capacity(filenames.len());
    let mut reports = Vec::new();

    for filename in filenames {
        progress.set_message(filename.clone());
        match build_report(options, settings, normalizer, extractor, &filename) {
            Ok((report, outcome)) => {
                reports.push(report);
                outcomes.push(outcome);
            }
            Err(reason) => {
                log::debug!("Skipping {filename}: {reason:?}");
                outcomes.push(BuildOutcome::Skipped { filename, reason });
            }
        }
        progress.inc(1);
    }

    let candidate_reports = reports.len();
    let reports = catalog::dedupe_by_slug(reports);
    let reports_by_year = catalog::count_by_year(&reports);
    let doc = catalog::build_document(reports, generated_at)?;

    progress.finish(format!(
        "{} unique reports from {candidate_reports} files",
        doc.len()
    ));

    let written_to = if options.dry_run {
        log::info!("Dry run; not writing {}", options.reports_file.display());
        None
    } else {
        store::save(&options.reports_file, &doc)?;
        log::info!("Saved {} reports to {}", doc.len(), options.reports_file.display());
        Some(options.reports_file.clone())
    };

    Ok(BuildSummary {
        outcomes,
        candidate_reports,
        total_reports: doc.len(),
        reports_by_year,
        written_to,
    })
}

fn build_report(
    options: &BuildOptions,
    settings: &BuildSettings,
    normalizer: &Normalizer,
    extractor: &dyn TextExtractor,
    filename: &str,
) -> Result<(Report, BuildOutcome), SkipReason> {
    if filename.starts_with('.') {
        return Err(SkipReason::Hidden);
    }
    if settings.exclude.iter().any(|ex| filename.contains(ex.as_str())) {
        return Err(SkipReason::Excluded);
    }

    let path = options.source_dir.join(filename);
    if !vaill_pdf::is_pdf(&path) || !path.is_file() {
        return Err(SkipReason::NotPdf);
    }

    let date = parse_filename(filename, settings.default_year).ok_or_else(|| {
        log::warn!("Could not parse date from: {filename}");
        SkipReason::UnknownPeriod
    })?;

    let slug = date.slug();
    log::debug!("{filename} is the {} report {slug}", date.kind);
    let (html, excerpt, outcome) = match extractor.extract(&path) {
        Ok(text) => {
            let normalized = normalizer.normalize(&text);
            let outcome = BuildOutcome::Added {
                filename: filename.to_owned(),
                slug: slug.clone(),
                title: date.title(),
            };
            (normalized.html, normalized.excerpt, outcome)
        }
        Err(e) => {
            log::warn!("PDF extraction failed for {filename}: {e}");
            let outcome = BuildOutcome::Placeholder {
                filename: filename.to_owned(),
                slug: slug.clone(),
                error: e.to_string(),
            };
            (
                settings.placeholder_html.clone(),
                settings.placeholder_excerpt.clone(),
                outcome,
            )
        }
    };

    let report = Report {
        slug,
        title: date.title(),
        kind: date.kind,
        year: date.year,
        month: date.month,
        quarter: date.quarter,
        sort_key: date.sort_key(),
        source_file: filename.to_owned(),
        html,
        excerpt,
    };

    Ok((report, outcome))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::TimeZone;
    use vaill_pdf::PdfError;
    use vaill_updater_models::null_progress;

    use super::*;
    use crate::registry::default_build_settings;

    /// Extracts the file contents as text, failing on files containing
    /// `BROKEN`.
    struct FileContentsExtractor;

    impl TextExtractor for FileContentsExtractor {
        fn extract(&self, path: &Path) -> Result<String, PdfError> {
            let text = std::fs::read_to_string(path)?;
            if text.contains("BROKEN") {
                return Err(PdfError::Extraction("corrupt stream".to_owned()));
            }
            Ok(text)
        }
    }

    fn setup(name: &str, files: &[(&str, &str)]) -> (PathBuf, BuildOptions) {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        let source_dir = dir.join("sources");
        std::fs::create_dir_all(&source_dir).unwrap();
        for (file, contents) in files {
            std::fs::write(source_dir.join(file), contents).unwrap();
        }

        (
            dir.clone(),
            BuildOptions {
                source_dir,
                reports_file: dir.join("data").join("reports.json"),
                dry_run: false,
            },
        )
    }

    #[test]
    fn builds_store_from_directory() {
        let (dir, options) = setup(
            "vaill_build_from_directory",
            &[
                (".DS_Store", ""),
                ("DRAFT - VAILL Annual Report.pdf", "draft"),
                ("FW_ VAILL Report January 2024.pdf", "VAILL Report January 2024\n\nEvents\n- Panel"),
                ("VAILL Quarterly Report Q2 2024.pdf", "Curriculum\nNew course"),
                ("VAILL April update.docx", "docx"),
                ("notes.pdf", "no date here"),
                ("VAILL Report for December 2023 .pdf", "BROKEN"),
            ],
        );
        let generated_at = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();

        let summary = run(
            &options,
            &default_build_settings(),
            &Normalizer::with_defaults().unwrap(),
            &FileContentsExtractor,
            &null_progress(),
            generated_at,
        )
        .unwrap();

        assert_eq!(summary.candidate_reports, 3);
        assert_eq!(summary.total_reports, 3);
        assert_eq!(
            summary.reports_by_year.into_iter().collect::<Vec<_>>(),
            vec![(2023, 1), (2024, 2)]
        );

        let skipped: Vec<SkipReason> = summary
            .outcomes
            .iter()
            .filter_map(|o| match o {
                BuildOutcome::Skipped { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect();
        assert_eq!(
            skipped,
            vec![
                SkipReason::Hidden,
                SkipReason::Excluded,
                SkipReason::NotPdf,
                SkipReason::UnknownPeriod,
            ]
        );

        let doc = store::load(&options.reports_file).unwrap();
        let slugs: Vec<&str> = doc.reports.iter().filter_map(|r| r.slug()).collect();
        assert_eq!(slugs, vec!["2024-q2", "2024-01", "2023-12"]);
        assert_eq!(doc.metadata["totalReports"], 3);
        assert_eq!(doc.metadata["generatedAt"], "2024-07-01T00:00:00.000Z");

        let quarterly = doc.find("2024-q2").unwrap();
        assert_eq!(quarterly.title(), Some("Q2 2024 Quarterly Report"));
        assert_eq!(quarterly.html(), Some("<h2>Curriculum</h2>\n<p>New course</p>"));

        let broken = doc.find("2023-12").unwrap();
        assert_eq!(broken.html(), Some(default_build_settings().placeholder_html.as_str()));
        assert_eq!(broken.excerpt(), Some("PDF content not available..."));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn first_file_wins_for_duplicate_slugs() {
        let (dir, mut options) = setup(
            "vaill_build_duplicates",
            &[
                ("A VAILL January 2024.pdf", "first"),
                ("B VAILL Jan 2024 copy.pdf", "second"),
            ],
        );
        options.dry_run = true;

        let summary = run(
            &options,
            &default_build_settings(),
            &Normalizer::with_defaults().unwrap(),
            &FileContentsExtractor,
            &null_progress(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(summary.candidate_reports, 2);
        assert_eq!(summary.total_reports, 1);
        assert!(summary.written_to.is_none());
        assert!(!options.reports_file.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_source_dir_is_io_error() {
        let options = BuildOptions {
            source_dir: std::env::temp_dir().join("vaill_build_no_such_dir"),
            reports_file: std::env::temp_dir().join("vaill_build_unused.json"),
            dry_run: true,
        };
        let _ = std::fs::remove_dir_all(&options.source_dir);

        let result = run(
            &options,
            &default_build_settings(),
            &Normalizer::with_defaults().unwrap(),
            &FileContentsExtractor,
            &null_progress(),
            Utc::now(),
        );
        assert!(matches!(result, Err(UpdateError::Io(_))));
    }
}
