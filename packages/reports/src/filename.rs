//! Report date detection from source file names.
//!
//! Source files are named by hand, e.g. `"FW_ VAILL Report January 2024.pdf"`,
//! `"VAILL Quarterly Report Q2 2024.pdf"` or `"May VAILL Update to Chris.docx"`.
//! [`parse_filename`] recovers the reporting period from such names.

use std::sync::LazyLock;

use regex::Regex;
use vaill_reports_models::ReportKind;

/// `q3 2024`, `q3 24`, `q3-24`.
static QUARTER_SHORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"q(\d)\s*(?:20)?(\d{2})").expect("valid regex"));

/// `quarterly report for q3 of 2024`.
static QUARTER_LONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"quarterly.*?q(\d).*?(\d{4})").expect("valid regex"));

static QUARTER_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"q(\d)").expect("valid regex"));

/// Four-digit year in the 2000s; captures the last two digits.
static CENTURY_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20(\d{2})").expect("valid regex"));

/// Two-digit year right before an extension dot, separator, or the end.
static SHORT_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})(?:\.|$|-|_)").expect("valid regex"));

/// Month names and abbreviations, checked in order with substring matches.
const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The reporting period a source file covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDate {
    pub kind: ReportKind,
    pub year: u32,
    /// 1-12. For quarterly reports, the first month of the quarter.
    pub month: u32,
    /// 1-4 for quarterly reports.
    pub quarter: Option<u32>,
}

impl ReportDate {
    /// URL-friendly identifier: `2024-03` or `2024-q1`.
    #[must_use]
    pub fn slug(&self) -> String {
        match (self.kind, self.quarter) {
            (ReportKind::Quarterly, Some(q)) => format!("{}-q{q}", self.year),
            _ => format!("{}-{:02}", self.year, self.month),
        }
    }

    /// Human-readable title, e.g. `"March 2024 Update"`.
    #[must_use]
    pub fn title(&self) -> String {
        match (self.kind, self.quarter) {
            (ReportKind::Quarterly, Some(q)) => format!("Q{q} {} Quarterly Report", self.year),
            _ => format!("{} {} Update", month_name(self.month), self.year),
        }
    }

    /// `year * 100 + month`; later periods sort higher.
    #[must_use]
    pub const fn sort_key(&self) -> u32 {
        self.year * 100 + self.month
    }
}

/// English name of `month` (1-12), or an empty string out of range.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// Parses the reporting period out of a file name.
///
/// Quarterly patterns are tried first. Monthly names without a year are
/// assumed to fall in `default_year`. Returns `None` when no period can be
/// found.
#[must_use]
pub fn parse_filename(filename: &str, default_year: u32) -> Option<ReportDate> {
    let lower = filename.to_lowercase();

    if let Some(date) = parse_quarterly(&lower) {
        return Some(date);
    }

    let month = MONTHS
        .iter()
        .find(|(name, _)| lower.contains(name))
        .map(|&(_, num)| num)?;

    let year = parse_year(&lower).unwrap_or_else(|| {
        log::info!("Inferred year {default_year} for {filename:?} (month {month})");
        default_year
    });

    Some(ReportDate {
        kind: ReportKind::Monthly,
        year,
        month,
        quarter: None,
    })
}

fn parse_quarterly(lower: &str) -> Option<ReportDate> {
    let caps = QUARTER_SHORT_RE
        .captures(lower)
        .or_else(|| QUARTER_LONG_RE.captures(lower));

    if caps.is_none() && !lower.contains("quarterly") {
        return None;
    }

    let (quarter, year) = if let Some(caps) = caps {
        (caps[1].parse::<u32>().ok(), caps[2].parse::<u32>().ok())
    } else {
        (
            QUARTER_DIGIT_RE
                .captures(lower)
                .and_then(|c| c[1].parse::<u32>().ok()),
            CENTURY_YEAR_RE
                .captures(lower)
                .and_then(|c| c[1].parse::<u32>().ok()),
        )
    };

    let quarter = quarter.filter(|q| (1..=4).contains(q))?;
    let year = year.filter(|&y| y > 0).map(expand_year)?;

    Some(ReportDate {
        kind: ReportKind::Quarterly,
        year,
        month: (quarter - 1) * 3 + 1,
        quarter: Some(quarter),
    })
}

fn parse_year(lower: &str) -> Option<u32> {
    CENTURY_YEAR_RE
        .captures(lower)
        .or_else(|| SHORT_YEAR_RE.captures(lower))
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|&y| y > 0)
        .map(expand_year)
}

const fn expand_year(year: u32) -> u32 {
    if year < 100 { year + 2000 } else { year }
}
