#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the VAILL report updater.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use vaill_cli_utils::{IndicatifProgress, MultiProgress};
use vaill_normalize::{Normalizer, registry as normalize_registry};
use vaill_pdf::PdfExtractor;
use vaill_updater::build::{self, BuildOptions};
use vaill_updater::fix::{self, FixOptions};
use vaill_updater::{BuildOutcome, FixEvent, FixManifest, FixReporter, preview, registry};

#[derive(Parser)]
#[command(name = "vaill_updater", about = "VAILL report PDF to HTML updater")]
struct Cli {
    /// Directory containing the source PDFs
    #[arg(long, global = true, default_value = "../VAILL Updates to Chris")]
    source_dir: PathBuf,
    /// Path to the `reports.json` store
    #[arg(long, global = true, default_value = "src/data/reports.json")]
    reports: PathBuf,
    /// Normalizer vocabulary TOML (defaults to the embedded one)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-extract the manifest PDFs and patch their existing records
    Fix {
        /// Manifest TOML listing `slug`/`filename` entries
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Process everything without writing the store
        #[arg(long)]
        dry_run: bool,
    },
    /// Rebuild the whole store from every report PDF in the source directory
    Build {
        /// Process everything without writing the store
        #[arg(long)]
        dry_run: bool,
    },
    /// Normalize a single `.pdf` or `.txt` file and print the result
    Preview {
        /// File to normalize
        file: PathBuf,
    },
    /// List the fix manifest entries
    Manifest {
        /// Manifest TOML to list instead of the embedded one
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = vaill_cli_utils::init_logger();
    let cli = Cli::parse();

    let normalizer = load_normalizer(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Fix {
        manifest: None,
        dry_run: false,
    });

    match command {
        Commands::Fix { manifest, dry_run } => {
            let manifest = load_manifest(manifest.as_deref())?;
            let options = FixOptions {
                source_dir: cli.source_dir,
                reports_file: cli.reports,
                dry_run,
            };
            let progress = IndicatifProgress::files_bar(&multi, "Extracting");
            let reporter = ConsoleReporter { multi: &multi };

            let summary = fix::run(
                &options,
                &manifest,
                &normalizer,
                &PdfExtractor,
                &progress,
                &reporter,
            )?;

            if summary.written_to.is_none() {
                println!("\nDry run: {} updated, nothing written", summary.updated());
            }
        }
        Commands::Build { dry_run } => {
            let options = BuildOptions {
                source_dir: cli.source_dir,
                reports_file: cli.reports,
                dry_run,
            };
            let progress = IndicatifProgress::files_bar(&multi, "Building");

            let summary = build::run(
                &options,
                &registry::default_build_settings(),
                &normalizer,
                &PdfExtractor,
                &progress,
                chrono::Utc::now(),
            )?;

            for outcome in &summary.outcomes {
                match outcome {
                    BuildOutcome::Added {
                        filename, title, ..
                    } => println!("Added: {title} ({filename})"),
                    BuildOutcome::Placeholder {
                        filename, error, ..
                    } => println!("Placeholder: {filename} ({error})"),
                    BuildOutcome::Skipped { .. } => {}
                }
            }

            println!(
                "\n{} unique reports from {} candidate files",
                summary.total_reports, summary.candidate_reports
            );
            println!("\nReports by year:");
            for (year, count) in summary.reports_by_year.iter().rev() {
                println!("  {year}: {count} reports");
            }
            if let Some(path) = &summary.written_to {
                println!("\nSaved reports to {}", path.display());
            }
        }
        Commands::Preview { file } => {
            let normalized = preview::preview(&file, &normalizer)?;
            println!("{}", normalized.html);
            println!("\nExcerpt: {}", normalized.excerpt);
        }
        Commands::Manifest { manifest } => {
            let manifest = load_manifest(manifest.as_deref())?;
            println!("{:<10} FILENAME", "SLUG");
            println!("{}", "-".repeat(50));
            for entry in &manifest.entries {
                println!("{:<10} {}", entry.slug, entry.filename);
            }
        }
    }

    Ok(())
}

/// Prints fix progress lines as they happen, above any progress bars.
struct ConsoleReporter<'a> {
    multi: &'a MultiProgress,
}

impl FixReporter for ConsoleReporter<'_> {
    fn report(&self, event: FixEvent<'_>) {
        self.multi.suspend(|| match event {
            FixEvent::Loaded { total } => println!("Loaded {total} reports"),
            FixEvent::Missing { filename } => println!("WARNING: {filename} not found"),
            FixEvent::Processing { filename } => println!("\nProcessing {filename}..."),
            FixEvent::Extracted { chars, .. } => println!("  Extracted {chars} characters"),
            FixEvent::Updated { slug, title } => println!("  Updated {}", title.unwrap_or(slug)),
            FixEvent::Saved { path } => {
                println!("\nSaved updated reports to {}", path.display());
            }
        });
    }
}

fn load_normalizer(config: Option<&Path>) -> Result<Normalizer, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => normalize_registry::load_config(path)?,
        None => normalize_registry::default_config(),
    };
    Ok(Normalizer::new(&config)?)
}

fn load_manifest(path: Option<&Path>) -> Result<FixManifest, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => registry::load_manifest(path)?,
        None => registry::default_manifest(),
    })
}
