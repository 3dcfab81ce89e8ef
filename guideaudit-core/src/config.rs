use crate::error::Result;
use guideaudit_scanner::prober::{DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS};
use guideaudit_scanner::{LinkTargets, Prober};
use regex::Regex;
use std::path::PathBuf;

pub const DEFAULT_HTML_ROOT: &str = "../libguider/data";
pub const DEFAULT_PAGE_PATTERN: &str = r"^page-[0-9]+\.html$";
pub const DEFAULT_GUIDE_HOST: &str = "guides.library.ucla.edu";
pub const DEFAULT_REDIRECT_COLUMN: &str = "Custom field (URL)";
pub const DEFAULT_REPORT_PATH: &str = "missing_redirects.csv";
pub const DEFAULT_SUMMARY_PATH: &str = "missing_redirects_summary.csv";

/// Options for configuring an audit run
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Root of the harvested LibGuide snapshots
    pub html_root: PathBuf,
    /// Regex matched against each file name under `html_root`
    pub page_pattern: String,
    pub link_targets: LinkTargets,
    /// Host used when turning a snapshot path back into a guide URL
    pub guide_host: String,
    /// Column of the known-redirect CSV holding the redirected source URL
    pub redirect_column: String,
    pub probe_timeout_secs: u64,
    pub max_redirects: usize,
    pub report_path: PathBuf,
    pub summary_path: PathBuf,
    pub show_progress_bars: bool,
}

impl AuditOptions {
    pub fn page_regex(&self) -> Result<Regex> {
        Ok(Regex::new(&self.page_pattern)?)
    }

    /// HTTP client for live redirect checks, bounded by the configured
    /// timeout and redirect limit
    pub fn prober(&self) -> Result<Prober> {
        Ok(Prober::with_timeout(self.probe_timeout_secs, self.max_redirects)?)
    }
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            html_root: PathBuf::from(DEFAULT_HTML_ROOT),
            page_pattern: DEFAULT_PAGE_PATTERN.to_string(),
            link_targets: LinkTargets::default(),
            guide_host: DEFAULT_GUIDE_HOST.to_string(),
            redirect_column: DEFAULT_REDIRECT_COLUMN.to_string(),
            probe_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            summary_path: PathBuf::from(DEFAULT_SUMMARY_PATH),
            show_progress_bars: false,
        }
    }
}
