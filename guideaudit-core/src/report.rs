// Missing-redirect report generation

use crate::aggregate::UrlUsageIndex;
use crate::error::Result;
use crate::resolve::{Resolution, ResolutionOutcome};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const REPORT_COLUMNS: [&str; 6] = [
    "website_url",
    "website_alias",
    "status_code",
    "libguide_url",
    "creator",
    "title",
];

pub const SUMMARY_COLUMNS: [&str; 2] = ["website_url", "libguide_count"];

/// One (missing URL, referring page) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingRedirectRow {
    pub website_url: String,
    pub website_alias: String,
    pub status_code: u16,
    pub libguide_url: String,
    pub creator: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub website_url: String,
    pub libguide_count: usize,
}

/// One row per referring page of every reportable URL.
///
/// Rows follow the order of `resolutions`, then each URL's referrer order.
/// A failed probe reports status 0 and the error text as its alias.
pub fn build_missing_rows(
    index: &UrlUsageIndex,
    resolutions: &[Resolution],
) -> Vec<MissingRedirectRow> {
    let mut rows = Vec::new();
    for resolution in resolutions {
        let (alias, status_code) = match &resolution.outcome {
            ResolutionOutcome::Missing { alias, status_code } => {
                (alias.clone().unwrap_or_default(), *status_code)
            }
            ResolutionOutcome::ProbeFailed { error } => (format!("probe failed: {}", error), 0),
            _ => continue,
        };

        for page in index.referrers(&resolution.url).unwrap_or_default() {
            rows.push(MissingRedirectRow {
                website_url: resolution.url.clone(),
                website_alias: alias.clone(),
                status_code,
                libguide_url: page.guide_url.clone().unwrap_or_default(),
                creator: page.creator.clone().unwrap_or_default(),
                title: page.title.clone().unwrap_or_default(),
            });
        }
    }
    rows
}

/// Count rows per URL, keeping the order in which URLs first appear
pub fn summarize(rows: &[MissingRedirectRow]) -> Vec<SummaryRow> {
    let mut summary: Vec<SummaryRow> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        match positions.get(row.website_url.as_str()) {
            Some(&pos) => summary[pos].libguide_count += 1,
            None => {
                positions.insert(&row.website_url, summary.len());
                summary.push(SummaryRow {
                    website_url: row.website_url.clone(),
                    libguide_count: 1,
                });
            }
        }
    }
    summary
}

/// Write a CSV with a fixed header, even when there are no rows
fn write_csv<W: Write, T: Serialize>(writer: W, columns: &[&str], rows: &[T]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(columns)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_missing_report<W: Write>(writer: W, rows: &[MissingRedirectRow]) -> Result<()> {
    write_csv(writer, &REPORT_COLUMNS, rows)
}

pub fn write_summary<W: Write>(writer: W, summary: &[SummaryRow]) -> Result<()> {
    write_csv(writer, &SUMMARY_COLUMNS, summary)
}

pub fn save_missing_report(path: &Path, rows: &[MissingRedirectRow]) -> Result<()> {
    write_missing_report(File::create(path)?, rows)
}

pub fn save_summary(path: &Path, summary: &[SummaryRow]) -> Result<()> {
    write_summary(File::create(path)?, summary)
}
