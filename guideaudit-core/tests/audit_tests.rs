// End-to-end audit runs over a temporary snapshot corpus

use guideaudit_core::audit::{execute_audit, generate_audit_summary, write_reports};
use guideaudit_core::config::AuditOptions;
use guideaudit_core::redirects::KnownRedirectSet;
use guideaudit_core::resolve::ResolutionOutcome;
use guideaudit_scanner::{LinkTargets, Prober};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_guide(root: &Path, group: &str, page: &str, title: &str, links: &[&str]) {
    let dir = root.join(group);
    fs::create_dir_all(&dir).unwrap();
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    let html = format!(
        r#"<html><head>
        <meta name="DC.Title" content="{title}">
        <meta name="DC.Creator" content="Staff">
        <meta name="DC.Identifier" content="{group}-{page}">
        </head><body>{anchors}</body></html>"#
    );
    fs::write(dir.join(format!("page-{}.html", page)), html).unwrap();
}

fn options_for(root: &Path, out: &Path) -> AuditOptions {
    AuditOptions {
        html_root: root.to_path_buf(),
        report_path: out.join("missing_redirects.csv"),
        summary_path: out.join("missing_redirects_summary.csv"),
        ..AuditOptions::default()
    }
}

#[tokio::test]
async fn test_all_known_urls_need_no_probes() {
    let corpus = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_guide(
        corpus.path(),
        "1221796",
        "8937658",
        "Biology",
        &["//library.ucla.edu/biology "],
    );

    let known: KnownRedirectSet = ["https://www.library.ucla.edu/biology"].into_iter().collect();
    let options = options_for(corpus.path(), out.path());
    let prober = Prober::new().unwrap();

    let report = execute_audit(&options, &known, &prober).await.unwrap();

    assert_eq!(report.pages_scanned, 1);
    assert_eq!(report.found_static(), 1);
    assert_eq!(report.probes_issued(), 0);
    assert!(report.rows.is_empty());

    write_reports(&report, &options).unwrap();
    assert_eq!(
        fs::read_to_string(&options.report_path).unwrap(),
        "website_url,website_alias,status_code,libguide_url,creator,title\n"
    );
    assert_eq!(
        fs::read_to_string(&options.summary_path).unwrap(),
        "website_url,libguide_count\n"
    );
}

#[tokio::test]
async fn test_failed_probes_are_reported_not_dropped() {
    let corpus = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    // Nothing listens on the discard port, so every probe fails fast
    let target = "//127.0.0.1:9";
    write_guide(
        corpus.path(),
        "100",
        "1",
        "Biology",
        &["http://127.0.0.1:9/covered", "http://127.0.0.1:9/missing/"],
    );
    write_guide(corpus.path(), "100", "2", "Chemistry", &["//127.0.0.1:9/missing"]);
    fs::write(
        corpus.path().join("100").join("page-3.html"),
        "<html><body>no metadata</body></html>",
    )
    .unwrap();

    let known: KnownRedirectSet = ["https://127.0.0.1:9/covered"].into_iter().collect();
    let options = AuditOptions {
        link_targets: LinkTargets::new([target]),
        probe_timeout_secs: 2,
        ..options_for(corpus.path(), out.path())
    };
    let prober = options.prober().unwrap();

    let report = execute_audit(&options, &known, &prober).await.unwrap();

    assert_eq!(report.pages_scanned, 3);
    assert_eq!(report.unusable_pages.len(), 1);
    assert_eq!(report.index.len(), 2);
    assert_eq!(report.resolutions.len(), 2);
    assert_eq!(report.resolutions[0].outcome, ResolutionOutcome::FoundStatic);
    assert!(matches!(
        report.resolutions[1].outcome,
        ResolutionOutcome::ProbeFailed { .. }
    ));
    assert_eq!(report.probes_issued(), 1);

    assert_eq!(report.rows.len(), 2);
    assert!(report.rows.iter().all(|r| r.website_url == "https://127.0.0.1:9/missing"));
    assert!(report.rows.iter().all(|r| r.status_code == 0));
    assert_eq!(report.rows[0].title, "Biology");
    assert_eq!(report.rows[1].title, "Chemistry");
    assert_eq!(report.summary.len(), 1);
    assert_eq!(report.summary[0].libguide_count, 2);

    let summary = generate_audit_summary(&report);
    assert!(summary.contains("Pages scanned: 3"));
    assert!(summary.contains("Pages without usable content: 1"));
    assert!(summary.contains("Failed probes: 1"));
    assert!(summary.contains("Report rows: 2"));
    assert!(summary.contains("https://127.0.0.1:9/missing"));
}

#[tokio::test]
async fn test_missing_html_root_fails_the_run() {
    let out = TempDir::new().unwrap();
    let options = options_for(&out.path().join("does-not-exist"), out.path());
    let prober = Prober::new().unwrap();

    let result = execute_audit(&options, &KnownRedirectSet::new(), &prober).await;
    assert!(result.is_err());
}
