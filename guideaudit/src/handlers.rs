use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use guideaudit_core::audit::{execute_audit, generate_audit_summary, write_reports};
use guideaudit_core::config::AuditOptions;
use guideaudit_core::export::export_documents;
use guideaudit_core::harvest::{guide_url_from_path, harvest_corpus};
use guideaudit_core::{KnownRedirectSet, UrlUsageIndex};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expand `~` and environment variables in a user-supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::full(raw).map(|p| p.into_owned()).unwrap_or_else(|_| raw.to_string()))
}

fn string_arg<'a>(matches: &'a ArgMatches, id: &str) -> Option<&'a String> {
    matches.try_get_one::<String>(id).ok().flatten()
}

/// Build audit options from a subcommand's matches.
///
/// Arguments a subcommand does not define keep their defaults.
pub fn options_from_matches(matches: &ArgMatches, quiet: bool) -> AuditOptions {
    let mut options = AuditOptions {
        show_progress_bars: !quiet,
        ..AuditOptions::default()
    };

    if let Some(root) = string_arg(matches, "html-root") {
        options.html_root = expand_path(root);
    }
    if let Some(pattern) = string_arg(matches, "pattern") {
        options.page_pattern = pattern.clone();
    }
    if let Some(host) = string_arg(matches, "guide-host") {
        options.guide_host = host.clone();
    }
    if let Some(column) = string_arg(matches, "redirect-column") {
        options.redirect_column = column.clone();
    }
    if let Ok(Some(timeout)) = matches.try_get_one::<u64>("timeout") {
        options.probe_timeout_secs = *timeout;
    }
    if let Ok(Some(hops)) = matches.try_get_one::<usize>("max-redirects") {
        options.max_redirects = *hops;
    }
    if let Some(output) = string_arg(matches, "output") {
        options.report_path = expand_path(output);
    }
    if let Some(summary) = string_arg(matches, "summary") {
        options.summary_path = expand_path(summary);
    }
    options
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_setting(label: &str, value: impl std::fmt::Display) {
    println!("{} {}", format!("{}:", label).blue(), value.to_string().bright_white());
}

pub async fn handle_audit(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let options = options_from_matches(sub_matches, quiet);
    debug!("Audit options: {:?}", options);
    let redirects_path = sub_matches
        .get_one::<PathBuf>("REDIRECTS")
        .context("a redirects CSV path is required")?;
    let redirects_path = expand_path(&redirects_path.to_string_lossy());

    let known = KnownRedirectSet::load_csv(&redirects_path, &options.redirect_column)
        .with_context(|| format!("loading known redirects from {}", redirects_path.display()))?;
    let prober = options.prober().context("building the HTTP client")?;

    if !quiet {
        print_divider();
        println!("{}", "  GUIDEAUDIT REDIRECT CHECK".bright_white().bold());
        print_divider();
        print_setting("Snapshots", options.html_root.display());
        print_setting("Known redirects", format!("{} ({})", known.len(), redirects_path.display()));
        print_setting("Probe timeout", format!("{}s", prober.timeout_secs()));
        println!();
    }

    let report = execute_audit(&options, &known, &prober)
        .await
        .context("audit failed")?;
    write_reports(&report, &options).context("writing reports")?;

    if !quiet {
        print!("{}", generate_audit_summary(&report));
        println!();
    }

    let reportable = report.missing() + report.probe_failures();
    let marker = if reportable == 0 { "✓".green().bold() } else { "⚠".yellow().bold() };
    println!(
        "{} {} of {} website URL(s) need a redirect ({} report row(s))",
        marker,
        reportable.to_string().bright_white(),
        report.index.len(),
        report.rows.len()
    );
    println!(
        "{} {}",
        "→".blue(),
        options.report_path.display().to_string().bright_white()
    );
    println!(
        "{} {}",
        "→".blue(),
        options.summary_path.display().to_string().bright_white()
    );
    Ok(())
}

pub fn handle_scan(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let options = options_from_matches(sub_matches, quiet);

    let harvests = harvest_corpus(&options, |_, _, _| {})
        .with_context(|| format!("harvesting {}", options.html_root.display()))?;
    let index = UrlUsageIndex::from_harvests(&harvests);

    let unusable: Vec<_> = harvests.iter().filter(|h| !h.is_usable()).collect();
    for harvest in &unusable {
        println!(
            "{} No usable content in {}: see {}",
            "•".yellow(),
            harvest.page.source_path.display(),
            harvest
                .page
                .guide_url
                .as_deref()
                .unwrap_or("unknown guide URL")
                .bright_white()
        );
    }
    if !unusable.is_empty() {
        println!();
    }

    println!("{} Pages scanned: {}", "✓".green().bold(), harvests.len());
    println!("{} Pages without usable content: {}", "→".blue(), unusable.len());
    println!("{} Website URLs found: {}", "→".blue(), index.len());
    println!(
        "{} Website URL references: {}",
        "→".blue(),
        index.total_references()
    );
    Ok(())
}

pub fn handle_export(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let options = options_from_matches(sub_matches, quiet);
    let output = string_arg(sub_matches, "output").map(String::as_str).unwrap_or("-");

    let stats = if output == "-" {
        export_documents(&options, BufWriter::new(io::stdout().lock()))?
    } else {
        let path = expand_path(output);
        let file = File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        export_documents(&options, BufWriter::new(file))?
    };

    let mut stderr = io::stderr().lock();
    writeln!(
        stderr,
        "{} Exported {} document(s), skipped {}",
        "✓".green().bold(),
        stats.exported,
        stats.skipped.len()
    )?;
    if !quiet {
        for (path, guide_url) in &stats.skipped {
            writeln!(
                stderr,
                "  {} {}: see {}",
                "•".yellow(),
                path.display(),
                guide_url.as_deref().unwrap_or("unknown guide URL")
            )?;
        }
    }
    Ok(())
}

pub fn handle_guide_url(sub_matches: &ArgMatches) -> Result<()> {
    let path = sub_matches
        .get_one::<String>("PATH")
        .context("a snapshot path is required")?;
    let host = string_arg(sub_matches, "guide-host")
        .map(String::as_str)
        .unwrap_or(guideaudit_core::config::DEFAULT_GUIDE_HOST);

    let guide_url = guide_url_from_path(Path::new(path), host)
        .with_context(|| format!("{} does not look like <group>/page-<id>.html", path))?;
    println!("{}", guide_url);
    Ok(())
}
