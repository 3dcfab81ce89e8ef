// Snapshot discovery and per-file extraction

use crate::config::AuditOptions;
use crate::error::{AuditError, Result};
use guideaudit_scanner::extract::{PageExtract, extract_page_links};
use guideaudit_scanner::LinkTargets;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::{error, info};
use walkdir::WalkDir;

static GUIDE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)/page-([0-9]+)").expect("guide path pattern is a valid regex")
});

/// One harvested snapshot and the metadata it carried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestedPage {
    pub source_path: PathBuf,
    pub guide_url: Option<String>,
    pub title: Option<String>,
    pub creator: Option<String>,
    pub uri: Option<String>,
}

impl HarvestedPage {
    pub fn new(source_path: PathBuf, guide_url: Option<String>) -> Self {
        Self {
            source_path,
            guide_url,
            title: None,
            creator: None,
            uri: None,
        }
    }
}

/// A page together with the normalized canonical-site links it contains
#[derive(Debug, Clone)]
pub struct PageHarvest {
    pub page: Arc<HarvestedPage>,
    pub links: BTreeSet<String>,
    /// Set when a required metadata field was absent
    pub missing_field: Option<&'static str>,
}

impl PageHarvest {
    pub fn is_usable(&self) -> bool {
        self.missing_field.is_none()
    }
}

/// Derive the public guide URL from a snapshot path.
///
/// `../data/1221796/page-8937658.html` on `guides.library.ucla.edu` becomes
/// `https://guides.library.ucla.edu/c.php?g=1221796&p=8937658`.
pub fn guide_url_from_path(path: &Path, guide_host: &str) -> Option<String> {
    let path_str = path.to_string_lossy().replace('\\', "/");
    let captures = GUIDE_PATH.captures(&path_str)?;
    Some(format!(
        "https://{}/c.php?g={}&p={}",
        guide_host,
        captures.get(1)?.as_str(),
        captures.get(2)?.as_str()
    ))
}

/// All files under `root` whose name matches `pattern`, in sorted path order
pub fn discover_pages(root: &Path, pattern: &Regex) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if pattern.is_match(&entry.file_name().to_string_lossy()) {
            pages.push(entry.into_path());
        }
    }
    pages.sort();
    Ok(pages)
}

/// Read a snapshot as text; invalid UTF-8 is replaced rather than rejected
pub fn read_page(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| AuditError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Extract metadata and links from one snapshot.
///
/// A document missing DC metadata is returned with no links and
/// `missing_field` set. Any other extraction failure aborts.
pub fn harvest_page(path: &Path, targets: &LinkTargets, guide_host: &str) -> Result<PageHarvest> {
    let html = read_page(path)?;
    let mut page = HarvestedPage::new(path.to_path_buf(), guide_url_from_path(path, guide_host));

    let extract = extract_page_links(&html, targets).map_err(|source| {
        error!(
            "Unexpected document shape in {} (guide {}): {:?}",
            path.display(),
            page.guide_url.as_deref().unwrap_or("unknown"),
            source
        );
        AuditError::Extraction {
            path: path.to_path_buf(),
            source,
        }
    })?;

    match extract {
        PageExtract::Usable(found) => {
            page.title = Some(found.title);
            page.creator = Some(found.creator);
            page.uri = Some(found.uri);
            Ok(PageHarvest {
                page: Arc::new(page),
                links: found.links,
                missing_field: None,
            })
        }
        PageExtract::Unusable { missing_field } => {
            info!(
                "No usable content in {} (no {}): see {}",
                path.display(),
                missing_field,
                page.guide_url.as_deref().unwrap_or("unknown guide URL")
            );
            Ok(PageHarvest {
                page: Arc::new(page),
                links: BTreeSet::new(),
                missing_field: Some(missing_field),
            })
        }
    }
}

/// Discover and harvest every snapshot, one file at a time in path order
pub fn harvest_corpus<F>(options: &AuditOptions, mut on_file: F) -> Result<Vec<PageHarvest>>
where
    F: FnMut(usize, usize, &Path),
{
    let pattern = options.page_regex()?;
    let paths = discover_pages(&options.html_root, &pattern)?;
    info!(
        "Found {} snapshot(s) under {}",
        paths.len(),
        options.html_root.display()
    );

    let mut harvests = Vec::with_capacity(paths.len());
    for (idx, path) in paths.iter().enumerate() {
        info!("Checking {}...", path.display());
        on_file(idx + 1, paths.len(), path);
        harvests.push(harvest_page(path, &options.link_targets, &options.guide_host)?);
    }
    Ok(harvests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guide_url_from_path() {
        let path = Path::new("../libguider/data/1221796/page-8937658.html");
        assert_eq!(
            guide_url_from_path(path, "guides.library.ucla.edu").as_deref(),
            Some("https://guides.library.ucla.edu/c.php?g=1221796&p=8937658")
        );
    }

    #[test]
    fn test_guide_url_uses_configured_host() {
        let path = Path::new("data/42/page-7.html");
        assert_eq!(
            guide_url_from_path(path, "guides.example.edu").as_deref(),
            Some("https://guides.example.edu/c.php?g=42&p=7")
        );
    }

    #[test]
    fn test_guide_url_absent_for_other_paths() {
        assert_eq!(guide_url_from_path(Path::new("data/about.html"), "h"), None);
        assert_eq!(guide_url_from_path(Path::new("data/x/page-1.html"), "h"), None);
    }

    #[test]
    fn test_guide_url_accepts_windows_separators() {
        let path = Path::new(r"data\1221796\page-8937658.html");
        assert_eq!(
            guide_url_from_path(path, "guides.library.ucla.edu").as_deref(),
            Some("https://guides.library.ucla.edu/c.php?g=1221796&p=8937658")
        );
    }
}
