//! Re-extraction of a fixed set of PDFs into existing store records.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use vaill_normalize::Normalizer;
use vaill_pdf::TextExtractor;
use vaill_reports::{ReportPatch, ReportsDocument, store};
use vaill_updater_models::{
    FileOutcome, FixEvent, FixManifest, FixReporter, FixSummary, ProgressCallback,
};

use crate::UpdateError;

/// Where a fix run reads from and writes to.
#[derive(Debug, Clone)]
pub struct FixOptions {
    /// Directory holding the source PDFs.
    pub source_dir: PathBuf,
    /// The `reports.json` store to patch.
    pub reports_file: PathBuf,
    /// Process everything but skip writing the store.
    pub dry_run: bool,
}

/// Loads the store, patches every manifest entry, and writes the store
/// back once.
///
/// Each step is sent to `reporter` as it happens.
///
/// # Errors
///
/// Returns [`UpdateError`] if the store cannot be loaded or saved, or if
/// extracting any present file fails. In that case the store on disk is
/// not modified.
pub fn run(
    options: &FixOptions,
    manifest: &FixManifest,
    normalizer: &Normalizer,
    extractor: &dyn TextExtractor,
    progress: &Arc<dyn ProgressCallback>,
    reporter: &dyn FixReporter,
) -> Result<FixSummary, UpdateError> {
    let mut doc = store::load(&options.reports_file)?;
    log::info!(
        "Loaded {} reports from {}",
        doc.len(),
        options.reports_file.display()
    );
    reporter.report(FixEvent::Loaded { total: doc.len() });

    let outcomes = apply_manifest(
        &mut doc,
        &options.source_dir,
        manifest,
        normalizer,
        extractor,
        progress,
        reporter,
    )?;

    let written_to = if options.dry_run {
        log::info!("Dry run; not writing {}", options.reports_file.display());
        None
    } else {
        store::save(&options.reports_file, &doc)?;
        log::info!("Saved updated reports to {}", options.reports_file.display());
        reporter.report(FixEvent::Saved {
            path: &options.reports_file,
        });
        Some(options.reports_file.clone())
    };

    Ok(FixSummary {
        total_reports: doc.len(),
        outcomes,
        written_to,
    })
}

/// Patches `doc` in memory for each manifest entry, in order.
///
/// Missing files are reported and skipped; slugs without a record are
/// skipped silently.
///
/// # Errors
///
/// Returns [`UpdateError::Pdf`] on the first extraction failure.
pub fn apply_manifest(
    doc: &mut ReportsDocument,
    source_dir: &Path,
    manifest: &FixManifest,
    normalizer: &Normalizer,
    extractor: &dyn TextExtractor,
    progress: &Arc<dyn ProgressCallback>,
    reporter: &dyn FixReporter,
) -> Result<Vec<FileOutcome>, UpdateError> {
    progress.set_total(manifest.len() as u64);

    let mut outcomes = Vec::with_capacity(manifest.len());

    for entry in &manifest.entries {
        progress.set_message(entry.filename.clone());
        let path = source_dir.join(&entry.filename);

        if !path.exists() {
            log::warn!("{} not found", path.display());
            reporter.report(FixEvent::Missing {
                filename: &entry.filename,
            });
            outcomes.push(FileOutcome::Missing {
                slug: entry.slug.clone(),
                filename: entry.filename.clone(),
            });
            progress.inc(1);
            continue;
        }

        log::info!("Processing {}...", entry.filename);
        reporter.report(FixEvent::Processing {
            filename: &entry.filename,
        });
        let text = extractor.extract(&path)?;
        let chars = text.chars().count();
        log::info!("Extracted {chars} characters from {}", entry.filename);
        reporter.report(FixEvent::Extracted {
            filename: &entry.filename,
            chars,
        });

        let normalized = normalizer.normalize(&text);
        let patch = ReportPatch {
            html: normalized.html,
            excerpt: normalized.excerpt,
        };

        let outcome = match doc.apply(&entry.slug, &patch) {
            Some(record) => {
                log::info!("Updated {}", record.title().unwrap_or(&entry.slug));
                reporter.report(FixEvent::Updated {
                    slug: &entry.slug,
                    title: record.title(),
                });
                FileOutcome::Updated {
                    slug: entry.slug.clone(),
                    filename: entry.filename.clone(),
                    chars,
                    title: record.title().map(str::to_owned),
                }
            }
            None => {
                log::debug!("No report with slug {}; skipping", entry.slug);
                FileOutcome::Unmatched {
                    slug: entry.slug.clone(),
                    filename: entry.filename.clone(),
                    chars,
                }
            }
        };

        outcomes.push(outcome);
        progress.inc(1);
    }

    progress.finish(format!("{} files processed", manifest.len()));

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    use vaill_pdf::PdfError;
    use vaill_updater_models::{ManifestEntry, SilentReporter, null_progress};

    use super::*;

    /// Returns canned text keyed by file name.
    struct FakeExtractor(BTreeMap<String, Result<String, String>>);

    impl TextExtractor for FakeExtractor {
        fn extract(&self, path: &Path) -> Result<String, PdfError> {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            match self.0.get(&name) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(msg)) => Err(PdfError::Extraction(msg.clone())),
                None => panic!("unexpected extraction of {name}"),
            }
        }
    }

    /// Records every event as a display line.
    #[derive(Default)]
    struct RecordingReporter(RefCell<Vec<String>>);

    impl FixReporter for RecordingReporter {
        fn report(&self, event: FixEvent<'_>) {
            let line = match event {
                FixEvent::Loaded { total } => format!("loaded {total}"),
                FixEvent::Missing { filename } => format!("missing {filename}"),
                FixEvent::Processing { filename } => format!("processing {filename}"),
                FixEvent::Extracted { filename, chars } => format!("extracted {filename} {chars}"),
                FixEvent::Updated { slug, title } => {
                    format!("updated {slug} {}", title.unwrap_or("-"))
                }
                FixEvent::Saved { path } => format!("saved {}", path.display()),
            };
            self.0.borrow_mut().push(line);
        }
    }

    fn manifest(entries: &[(&str, &str)]) -> FixManifest {
        FixManifest {
            entries: entries
                .iter()
                .map(|&(slug, filename)| ManifestEntry {
                    slug: slug.to_owned(),
                    filename: filename.to_owned(),
                })
                .collect(),
        }
    }

    fn setup(name: &str, files: &[&str], reports_json: &str) -> (PathBuf, FixOptions) {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        let source_dir = dir.join("sources");
        std::fs::create_dir_all(&source_dir).unwrap();
        for file in files {
            std::fs::write(source_dir.join(file), b"%PDF-stub").unwrap();
        }
        let reports_file = dir.join("reports.json");
        std::fs::write(&reports_file, reports_json).unwrap();

        (
            dir,
            FixOptions {
                source_dir,
                reports_file,
                dry_run: false,
            },
        )
    }

    const RAW: &str =
        "VAILL Activities\n\nCurriculum\nWe taught 3 classes.\n\n- Item one\n- Item two\n";

    #[test]
    fn patches_matching_record_and_leaves_others() {
        let (dir, options) = setup(
            "vaill_fix_patches_matching",
            &["nov.pdf"],
            r#"{"reports":[{"slug":"2023-11","html":"old"},{"slug":"2023-10","title":"October 2023 Update","html":"keep","excerpt":"keep..."}]}"#,
        );
        let extractor =
            FakeExtractor(BTreeMap::from([("nov.pdf".to_owned(), Ok(RAW.to_owned()))]));

        let summary = run(
            &options,
            &manifest(&[("2023-11", "nov.pdf")]),
            &Normalizer::with_defaults().unwrap(),
            &extractor,
            &null_progress(),
            &SilentReporter,
        )
        .unwrap();

        assert_eq!(summary.updated(), 1);
        assert_eq!(summary.total_reports, 2);
        assert_eq!(summary.written_to.as_deref(), Some(options.reports_file.as_path()));

        let doc = store::load(&options.reports_file).unwrap();
        let patched = doc.find("2023-11").unwrap();
        assert!(patched.html().unwrap().starts_with("<h2>VAILL Activities</h2>"));
        assert!(patched.excerpt().unwrap().ends_with("..."));
        assert_eq!(patched.fields.keys().collect::<Vec<_>>(), vec!["html", "excerpt"]);

        let untouched = doc.find("2023-10").unwrap();
        assert_eq!(untouched.html(), Some("keep"));
        assert_eq!(untouched.excerpt(), Some("keep..."));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_reported_and_skipped() {
        let (dir, options) = setup(
            "vaill_fix_missing_file",
            &["dec.pdf"],
            r#"{"reports":[{"slug":"2023-11","html":"old"},{"slug":"2023-12","title":"December 2023 Update","html":"old"}]}"#,
        );
        let extractor =
            FakeExtractor(BTreeMap::from([("dec.pdf".to_owned(), Ok(RAW.to_owned()))]));

        let summary = run(
            &options,
            &manifest(&[("2023-11", "nov.pdf"), ("2023-12", "dec.pdf")]),
            &Normalizer::with_defaults().unwrap(),
            &extractor,
            &null_progress(),
            &SilentReporter,
        )
        .unwrap();

        assert_eq!(
            summary.outcomes[0],
            FileOutcome::Missing {
                slug: "2023-11".to_owned(),
                filename: "nov.pdf".to_owned(),
            }
        );
        assert!(matches!(
            &summary.outcomes[1],
            FileOutcome::Updated { title: Some(t), .. } if t == "December 2023 Update"
        ));

        let doc = store::load(&options.reports_file).unwrap();
        assert_eq!(doc.find("2023-11").unwrap().html(), Some("old"));
        assert_ne!(doc.find("2023-12").unwrap().html(), Some("old"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unmatched_slug_changes_nothing() {
        let original = r#"{"reports":[{"slug":"2023-11","html":"old"}]}"#;
        let (dir, options) = setup("vaill_fix_unmatched", &["jan.pdf"], original);
        let extractor =
            FakeExtractor(BTreeMap::from([("jan.pdf".to_owned(), Ok(RAW.to_owned()))]));

        let mut doc = store::load(&options.reports_file).unwrap();
        let before = doc.clone();
        let outcomes = apply_manifest(
            &mut doc,
            &options.source_dir,
            &manifest(&[("2024-01", "jan.pdf")]),
            &Normalizer::with_defaults().unwrap(),
            &extractor,
            &null_progress(),
            &SilentReporter,
        )
        .unwrap();

        assert!(matches!(outcomes[0], FileOutcome::Unmatched { chars, .. } if chars == RAW.len()));
        assert_eq!(doc, before);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn extraction_failure_aborts_without_writing() {
        let original = r#"{"reports":[{"slug":"2023-11","html":"old"},{"slug":"2023-12","html":"old"}]}"#;
        let (dir, options) = setup(
            "vaill_fix_extraction_failure",
            &["nov.pdf", "dec.pdf"],
            original,
        );
        let extractor = FakeExtractor(BTreeMap::from([
            ("nov.pdf".to_owned(), Ok(RAW.to_owned())),
            ("dec.pdf".to_owned(), Err("corrupt xref".to_owned())),
        ]));

        let result = run(
            &options,
            &manifest(&[("2023-11", "nov.pdf"), ("2023-12", "dec.pdf")]),
            &Normalizer::with_defaults().unwrap(),
            &extractor,
            &null_progress(),
            &SilentReporter,
        );

        assert!(matches!(result, Err(UpdateError::Pdf(PdfError::Extraction(_)))));
        assert_eq!(std::fs::read_to_string(&options.reports_file).unwrap(), original);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn dry_run_does_not_write() {
        let original = r#"{"reports":[{"slug":"2023-11","html":"old"}]}"#;
        let (dir, mut options) = setup("vaill_fix_dry_run", &["nov.pdf"], original);
        options.dry_run = true;
        let extractor =
            FakeExtractor(BTreeMap::from([("nov.pdf".to_owned(), Ok(RAW.to_owned()))]));

        let summary = run(
            &options,
            &manifest(&[("2023-11", "nov.pdf")]),
            &Normalizer::with_defaults().unwrap(),
            &extractor,
            &null_progress(),
            &SilentReporter,
        )
        .unwrap();

        assert_eq!(summary.updated(), 1);
        assert!(summary.written_to.is_none());
        assert_eq!(std::fs::read_to_string(&options.reports_file).unwrap(), original);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_store_is_an_error() {
        let options = FixOptions {
            source_dir: std::env::temp_dir(),
            reports_file: std::env::temp_dir().join("vaill_fix_no_such_store.json"),
            dry_run: true,
        };
        let _ = std::fs::remove_file(&options.reports_file);

        let result = run(
            &options,
            &FixManifest::default(),
            &Normalizer::with_defaults().unwrap(),
            &FakeExtractor(BTreeMap::new()),
            &null_progress(),
            &SilentReporter,
        );
        assert!(matches!(result, Err(UpdateError::Store(_))));
    }

    #[test]
    fn events_are_reported_before_a_failing_entry() {
        let original = r#"{"reports":[{"slug":"2023-11","title":"November 2023 Update","html":"old"},{"slug":"2023-12","html":"old"}]}"#;
        let (dir, options) = setup(
            "vaill_fix_events_before_failure",
            &["nov.pdf", "dec.pdf"],
            original,
        );
        let extractor = FakeExtractor(BTreeMap::from([
            ("nov.pdf".to_owned(), Ok(RAW.to_owned())),
            ("dec.pdf".to_owned(), Err("corrupt xref".to_owned())),
        ]));
        let reporter = RecordingReporter::default();

        let result = run(
            &options,
            &manifest(&[
                ("2023-10", "oct.pdf"),
                ("2023-11", "nov.pdf"),
                ("2023-12", "dec.pdf"),
            ]),
            &Normalizer::with_defaults().unwrap(),
            &extractor,
            &null_progress(),
            &reporter,
        );

        assert!(result.is_err());
        assert_eq!(
            reporter.0.into_inner(),
            vec![
                "loaded 2".to_owned(),
                "missing oct.pdf".to_owned(),
                "processing nov.pdf".to_owned(),
                format!("extracted nov.pdf {}", RAW.chars().count()),
                "updated 2023-11 November 2023 Update".to_owned(),
                "processing dec.pdf".to_owned(),
            ]
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_is_reported_last() {
        let (dir, options) = setup(
            "vaill_fix_save_reported",
            &["nov.pdf"],
            r#"{"reports":[{"slug":"2023-11","html":"old"}]}"#,
        );
        let extractor =
            FakeExtractor(BTreeMap::from([("nov.pdf".to_owned(), Ok(RAW.to_owned()))]));
        let reporter = RecordingReporter::default();

        run(
            &options,
            &manifest(&[("2023-11", "nov.pdf")]),
            &Normalizer::with_defaults().unwrap(),
            &extractor,
            &null_progress(),
            &reporter,
        )
        .unwrap();

        let events = reporter.0.into_inner();
        assert_eq!(events[3], "updated 2023-11 -");
        let saved = format!("saved {}", options.reports_file.display());
        assert_eq!(events.last(), Some(&saved));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
