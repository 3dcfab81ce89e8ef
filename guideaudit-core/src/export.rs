// Search-document export of harvested LibGuides

use crate::config::AuditOptions;
use crate::error::{AuditError, Result};
use crate::harvest::{discover_pages, guide_url_from_path, read_page};
use guideaudit_scanner::SearchFields;
use guideaudit_scanner::extract::{PageExtract, extract_search_fields};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};

/// Section label every exported document is tagged with
pub const SECTION: &str = "Libguide";

/// A document ready to be submitted to the search index, keyed by `url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    #[serde(flatten)]
    pub fields: SearchFields,
    pub section: String,
}

impl From<SearchFields> for SearchDocument {
    fn from(fields: SearchFields) -> Self {
        Self {
            fields,
            section: SECTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportStats {
    pub exported: usize,
    /// Pages skipped for missing metadata, with their guide URL when derivable
    pub skipped: Vec<(PathBuf, Option<String>)>,
}

/// Write one JSON document per line for every usable page under `html_root`
pub fn export_documents<W: Write>(options: &AuditOptions, mut writer: W) -> Result<ExportStats> {
    let pattern = options.page_regex()?;
    let paths = discover_pages(&options.html_root, &pattern)?;

    let mut stats = ExportStats::default();
    for path in paths {
        let html = read_page(&path)?;
        let extract = extract_search_fields(&html).map_err(|source| {
            error!("Unexpected document shape in {}: {:?}", path.display(), source);
            AuditError::Extraction {
                path: path.clone(),
                source,
            }
        })?;

        match extract {
            PageExtract::Usable(fields) => {
                serde_json::to_writer(&mut writer, &SearchDocument::from(fields))?;
                writer.write_all(b"\n")?;
                stats.exported += 1;
            }
            PageExtract::Unusable { missing_field } => {
                let guide_url = guide_url_from_path(&path, &options.guide_host);
                info!(
                    "No usable content in {} (no {}): see {}",
                    path.display(),
                    missing_field,
                    guide_url.as_deref().unwrap_or("unknown guide URL")
                );
                stats.skipped.push((path, guide_url));
            }
        }
    }
    writer.flush()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_page(root: &std::path::Path, group: &str, page: &str, html: &str) {
        let dir = root.join(group);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("page-{}.html", page)), html).unwrap();
    }

    #[test]
    fn test_exports_usable_pages_as_json_lines() {
        let tmp = TempDir::new().unwrap();
        write_page(
            tmp.path(),
            "10",
            "1",
            r#"<html><head>
            <meta name="DC.Title" content="Film">
            <meta name="DC.Creator" content="B. Lee">
            <meta name="DC.Description" content="Film and TV">
            <meta name="DC.Identifier" content="https://guides.library.ucla.edu/film">
            </head><body><h1>Film</h1><p>Archive</p></body></html>"#,
        );
        write_page(
            tmp.path(),
            "10",
            "2",
            r#"<html><head><meta name="DC.Title" content="Draft"></head><body></body></html>"#,
        );

        let options = AuditOptions {
            html_root: tmp.path().to_path_buf(),
            ..AuditOptions::default()
        };
        let mut out = Vec::new();
        let stats = export_documents(&options, &mut out).unwrap();

        assert_eq!(stats.exported, 1);
        assert_eq!(stats.skipped.len(), 1);
        assert_eq!(
            stats.skipped[0].1.as_deref(),
            Some("https://guides.library.ucla.edu/c.php?g=10&p=2")
        );

        let text = String::from_utf8(out).unwrap();
        let docs: Vec<SearchDocument> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].section, SECTION);
        assert_eq!(docs[0].fields.title, "Film");
        assert_eq!(docs[0].fields.text, "Film Archive");
    }

    #[test]
    fn test_malformed_meta_aborts_export() {
        let tmp = TempDir::new().unwrap();
        write_page(
            tmp.path(),
            "10",
            "1",
            r#"<html><head><meta name="DC.Title"></head><body></body></html>"#,
        );

        let options = AuditOptions {
            html_root: tmp.path().to_path_buf(),
            ..AuditOptions::default()
        };
        let result = export_documents(&options, Vec::new());
        assert!(matches!(result, Err(AuditError::Extraction { .. })));
    }
}
