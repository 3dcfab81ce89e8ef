use crate::error::{AuditError, Result};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// URLs already covered by a configured redirect.
///
/// Lookups are exact string matches, so the list must hold normalized URLs.
#[derive(Debug, Clone, Default)]
pub struct KnownRedirectSet {
    urls: HashSet<String>,
}

impl KnownRedirectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Load the list from a CSV file with a header row
    pub fn load_csv(path: &Path, column: &str) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| AuditError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::from_csv_reader(file, column).map_err(|e| match e {
            AuditError::MissingColumn { column, .. } => AuditError::MissingColumn {
                path: path.to_path_buf(),
                column,
            },
            other => other,
        })?;
        info!(
            "Loaded {} known redirect(s) from {}",
            set.len(),
            path.display()
        );
        Ok(set)
    }

    pub fn from_csv_reader<R: Read>(reader: R, column: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let position = rdr
            .headers()?
            .iter()
            .position(|header| header == column)
            .ok_or_else(|| AuditError::MissingColumn {
                path: Default::default(),
                column: column.to_string(),
            })?;

        let mut set = Self::new();
        for record in rdr.records() {
            let record = record?;
            match record.get(position) {
                Some(url) if !url.is_empty() => {
                    set.urls.insert(url.to_string());
                }
                _ => debug!("Skipping row without a {:?} value", column),
            }
        }
        Ok(set)
    }
}

impl<S: Into<String>> FromIterator<S> for KnownRedirectSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().map(Into::into).collect(),
        }
    }
}
