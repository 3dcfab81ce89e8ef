use clap::{Arg, arg, command};
use guideaudit_core::config::{
    DEFAULT_GUIDE_HOST, DEFAULT_HTML_ROOT, DEFAULT_PAGE_PATTERN, DEFAULT_REDIRECT_COLUMN,
    DEFAULT_REPORT_PATH, DEFAULT_SUMMARY_PATH,
};
use std::path::PathBuf;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

/// Arguments shared by every command that walks the snapshot corpus
fn corpus_args() -> [Arg; 3] {
    [
        arg!(-r --"html-root" <PATH>)
            .required(false)
            .help("Directory holding the harvested LibGuide snapshots")
            .default_value(DEFAULT_HTML_ROOT),
        arg!(-p --"pattern" <REGEX>)
            .required(false)
            .help("Regex a snapshot's file name must match")
            .default_value(DEFAULT_PAGE_PATTERN),
        arg!(--"guide-host" <HOST>)
            .required(false)
            .help("Host used to rebuild guide URLs from snapshot paths")
            .default_value(DEFAULT_GUIDE_HOST),
    ]
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("guideaudit")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("guideaudit")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress progress spinners and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Log debug detail (overridden by RUST_LOG)").required(false))
        .subcommand_required(true)
        .subcommand(
            command!("audit")
                .about(
                    "Find website links in harvested LibGuides that are not covered by a \
                redirect. Writes a missing-redirects report and a per-URL summary.",
                )
                .arg(
                    arg!(<REDIRECTS> "CSV export of already-configured redirects")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .args(corpus_args())
                .arg(
                    arg!(-c --"redirect-column" <NAME>)
                        .required(false)
                        .help("Column of the redirects CSV holding the redirected URL")
                        .default_value(DEFAULT_REDIRECT_COLUMN),
                )
                .arg(
                    arg!(-t --"timeout" <SECONDS>)
                        .required(false)
                        .help("Timeout for each live redirect check")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"max-redirects" <NUM>)
                        .required(false)
                        .help("Redirect hops followed by a live check")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Missing-redirects report path")
                        .default_value(DEFAULT_REPORT_PATH),
                )
                .arg(
                    arg!(-s --"summary" <PATH>)
                        .required(false)
                        .help("Per-URL summary report path")
                        .default_value(DEFAULT_SUMMARY_PATH),
                ),
        )
        .subcommand(
            command!("scan")
                .about("Harvest snapshots without network access and list pages with no usable content")
                .args(corpus_args()),
        )
        .subcommand(
            command!("export")
                .about("Write one search-index JSON document per usable snapshot")
                .args(corpus_args())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("JSON Lines output path ('-' for stdout)")
                        .default_value("libguides.jsonl"),
                ),
        )
        .subcommand(
            command!("guide-url")
                .about("Print the guide URL derived from a snapshot path")
                .arg(arg!(<PATH> "Snapshot path, e.g. data/1221796/page-8937658.html"))
                .arg(
                    arg!(--"guide-host" <HOST>)
                        .required(false)
                        .help("Host used to rebuild the guide URL")
                        .default_value(DEFAULT_GUIDE_HOST),
                ),
        )
}
