use crate::aggregate::UrlUsageIndex;
use crate::config::AuditOptions;
use crate::error::Result;
use crate::harvest::{HarvestedPage, harvest_corpus};
use crate::redirects::KnownRedirectSet;
use crate::report::{
    MissingRedirectRow, SummaryRow, build_missing_rows, save_missing_report, save_summary,
    summarize,
};
use crate::resolve::{Resolution, ResolutionOutcome, resolve_all};
use guideaudit_scanner::Prober;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::info;

/// Everything an audit run produced
#[derive(Debug, Clone)]
pub struct AuditReport {
    pub pages_scanned: usize,
    pub unusable_pages: Vec<Arc<HarvestedPage>>,
    pub index: UrlUsageIndex,
    pub resolutions: Vec<Resolution>,
    pub rows: Vec<MissingRedirectRow>,
    pub summary: Vec<SummaryRow>,
}

impl AuditReport {
    fn count(&self, pred: impl Fn(&ResolutionOutcome) -> bool) -> usize {
        self.resolutions.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn found_static(&self) -> usize {
        self.count(|o| matches!(o, ResolutionOutcome::FoundStatic))
    }

    pub fn found_live(&self) -> usize {
        self.count(|o| matches!(o, ResolutionOutcome::FoundViaLiveRedirect { .. }))
    }

    pub fn missing(&self) -> usize {
        self.count(|o| matches!(o, ResolutionOutcome::Missing { .. }))
    }

    pub fn probe_failures(&self) -> usize {
        self.count(|o| matches!(o, ResolutionOutcome::ProbeFailed { .. }))
    }

    pub fn probes_issued(&self) -> usize {
        self.count(ResolutionOutcome::was_probed)
    }
}

fn spinner(enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    Some(pb)
}

/// Harvest the corpus, aggregate links, and resolve every distinct URL.
///
/// Runs one file and one probe at a time, so output order depends only on
/// the corpus and the known-redirect list.
pub async fn execute_audit(
    options: &AuditOptions,
    known: &KnownRedirectSet,
    prober: &Prober,
) -> Result<AuditReport> {
    let progress_bar = spinner(options.show_progress_bars);

    let harvests = harvest_corpus(options, |current, total, path| {
        if let Some(ref pb) = progress_bar {
            pb.set_message(format!("Harvesting {}/{}: {}", current, total, path.display()));
            pb.tick();
        }
    })?;

    let index = UrlUsageIndex::from_harvests(&harvests);
    let unusable_pages: Vec<_> = harvests
        .iter()
        .filter(|h| !h.is_usable())
        .map(|h| Arc::clone(&h.page))
        .collect();
    info!(
        "Harvested {} page(s): {} website URL(s), {} without usable content",
        harvests.len(),
        index.len(),
        unusable_pages.len()
    );

    let resolutions = resolve_all(&index, known, prober, |current, total, url| {
        if let Some(ref pb) = progress_bar {
            pb.set_message(format!("Checking {}/{}: {}", current, total, url));
            pb.tick();
        }
    })
    .await;

    let rows = build_missing_rows(&index, &resolutions);
    let summary = summarize(&rows);

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    Ok(AuditReport {
        pages_scanned: harvests.len(),
        unusable_pages,
        index,
        resolutions,
        rows,
        summary,
    })
}

/// Write the missing-redirect report and its summary to the configured paths
pub fn write_reports(report: &AuditReport, options: &AuditOptions) -> Result<()> {
    save_missing_report(&options.report_path, &report.rows)?;
    save_summary(&options.summary_path, &report.summary)?;
    info!(
        "Wrote {} row(s) to {} and {} row(s) to {}",
        report.rows.len(),
        options.report_path.display(),
        report.summary.len(),
        options.summary_path.display()
    );
    Ok(())
}

/// Generate the console summary of an audit run
pub fn generate_audit_summary(report: &AuditReport) -> String {
    let mut out = String::new();
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    out.push_str("# Summary:\n");
    out.push_str(&format!("  Pages scanned: {}\n", report.pages_scanned));
    out.push_str(&format!(
        "  Pages without usable content: {}\n",
        report.unusable_pages.len()
    ));
    out.push_str(&format!("  Website URLs found: {}\n", report.index.len()));
    out.push_str(&format!(
        "  Website URL references: {}\n",
        report.index.total_references()
    ));
    out.push_str(&format!("  Live probes issued: {}\n", report.probes_issued()));
    out.push('\n');
    out.push_str(&format!("  Found in redirect list: {}\n", report.found_static()));
    out.push_str(&format!("  Found via live redirect: {}\n", report.found_live()));
    out.push_str(&format!("  Missing redirects: {}\n", report.missing()));
    out.push_str(&format!("  Failed probes: {}\n", report.probe_failures()));
    out.push_str(&format!("  Report rows: {}\n", report.rows.len()));

    if !report.summary.is_empty() {
        out.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
        out.push_str("## Missing redirects by usage\n");
        let mut by_count: Vec<&SummaryRow> = report.summary.iter().collect();
        by_count.sort_by(|a, b| b.libguide_count.cmp(&a.libguide_count));
        for row in by_count {
            out.push_str(&format!("  {:>4}  {}\n", row.libguide_count, row.website_url));
        }
    }

    out.push_str(&format!(
        "\nGenerated {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out
}
