use crate::harvest::{HarvestedPage, PageHarvest};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::sync::Arc;

/// A page that links to a given website URL
pub type Referrer = Arc<HarvestedPage>;

/// Every distinct normalized website URL and the pages that reference it.
///
/// Keys iterate in sorted order. Each list holds referrers in the order
/// pages were added and is never empty.
#[derive(Debug, Clone, Default)]
pub struct UrlUsageIndex {
    entries: BTreeMap<String, Vec<Referrer>>,
}

impl UrlUsageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from harvested pages, in the order given
    pub fn from_harvests<'a, I>(harvests: I) -> Self
    where
        I: IntoIterator<Item = &'a PageHarvest>,
    {
        let mut index = Self::new();
        for harvest in harvests {
            index.add_page(&harvest.page, harvest.links.iter().map(String::as_str));
        }
        index
    }

    /// Record `page` as a referrer of each of `links`.
    ///
    /// Callers pass a deduplicated link set, so a page appears at most once
    /// per URL.
    pub fn add_page<'a, I>(&mut self, page: &Referrer, links: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for url in links {
            self.entries
                .entry(url.to_string())
                .or_default()
                .push(Arc::clone(page));
        }
    }

    pub fn referrers(&self, url: &str) -> Option<&[Referrer]> {
        self.entries.get(url).map(Vec::as_slice)
    }

    /// Distinct URLs, sorted
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<Referrer>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of referrer counts over all URLs
    pub fn total_references(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn harvest(path: &str, title: &str, links: &[&str]) -> PageHarvest {
        let mut page = HarvestedPage::new(PathBuf::from(path), None);
        page.title = Some(title.to_string());
        PageHarvest {
            page: Arc::new(page),
            links: links.iter().map(|l| l.to_string()).collect::<BTreeSet<_>>(),
            missing_field: None,
        }
    }

    #[test]
    fn test_referrers_keep_insertion_order() {
        let harvests = vec![
            harvest("1/page-1.html", "First", &["https://www.library.ucla.edu/a"]),
            harvest(
                "1/page-2.html",
                "Second",
                &["https://www.library.ucla.edu/a", "https://www.library.ucla.edu/b"],
            ),
            harvest("2/page-3.html", "Third", &["https://www.library.ucla.edu/a"]),
        ];

        let index = UrlUsageIndex::from_harvests(&harvests);

        let titles: Vec<_> = index
            .referrers("https://www.library.ucla.edu/a")
            .unwrap()
            .iter()
            .map(|p| p.title.clone().unwrap())
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.total_references(), 4);
    }

    #[test]
    fn test_pages_without_links_contribute_nothing() {
        let harvests = vec![harvest("1/page-1.html", "Empty", &[])];
        let index = UrlUsageIndex::from_harvests(&harvests);

        assert!(index.is_empty());
        assert!(index.referrers("https://www.library.ucla.edu/a").is_none());
    }

    #[test]
    fn test_urls_are_sorted() {
        let harvests = vec![harvest(
            "1/page-1.html",
            "Only",
            &["https://www.library.ucla.edu/z", "https://www.library.ucla.edu/a"],
        )];
        let index = UrlUsageIndex::from_harvests(&harvests);

        let urls: Vec<_> = index.urls().collect();
        assert_eq!(
            urls,
            vec!["https://www.library.ucla.edu/a", "https://www.library.ucla.edu/z"]
        );
    }

    #[test]
    fn test_no_empty_lists() {
        let harvests = vec![
            harvest("1/page-1.html", "A", &["https://www.library.ucla.edu/a"]),
            harvest("1/page-2.html", "B", &[]),
        ];
        let index = UrlUsageIndex::from_harvests(&harvests);
        assert!(index.iter().all(|(_, referrers)| !referrers.is_empty()));
    }
}
