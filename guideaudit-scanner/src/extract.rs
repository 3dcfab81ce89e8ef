use crate::error::{Result, ScanError};
use crate::normalize::normalize_link;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

pub const DC_TITLE: &str = "DC.Title";
pub const DC_CREATOR: &str = "DC.Creator";
pub const DC_DESCRIPTION: &str = "DC.Description";
pub const DC_IDENTIFIER: &str = "DC.Identifier";

/// Substrings an `href` must contain to count as a link to the canonical site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTargets(Vec<String>);

impl LinkTargets {
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(targets.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, href: &str) -> bool {
        self.0.iter().any(|target| href.contains(target.as_str()))
    }
}

impl Default for LinkTargets {
    fn default() -> Self {
        Self::new(["//library.ucla.edu", "//www.library.ucla.edu"])
    }
}

/// Result of extracting from one document.
///
/// `Unusable` means a required metadata field is absent; callers skip the
/// document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageExtract<T> {
    Usable(T),
    Unusable { missing_field: &'static str },
}

impl<T> PageExtract<T> {
    pub fn usable(self) -> Option<T> {
        match self {
            PageExtract::Usable(value) => Some(value),
            PageExtract::Unusable { .. } => None,
        }
    }
}

/// Identifying metadata plus the normalized canonical-site links of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    pub title: String,
    pub creator: String,
    pub uri: String,
    pub links: BTreeSet<String>,
}

/// Fields projected from a page for the search index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFields {
    pub title: String,
    pub creator: String,
    pub description: String,
    pub url: String,
    pub text: String,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScanError::ParseError(format!("selector {}: {}", css, e)))
}

/// Read the `content` of `<meta name="...">`.
///
/// A missing tag is `Ok(None)`. A tag without `content` is a malformed
/// document and an error.
fn meta_content(document: &Html, name: &str) -> Result<Option<String>> {
    let meta_selector = selector(&format!(r#"meta[name="{}"]"#, name))?;
    match document.select(&meta_selector).next() {
        None => Ok(None),
        Some(meta) => meta
            .value()
            .attr("content")
            .map(|content| Some(content.to_string()))
            .ok_or_else(|| {
                ScanError::ParseError(format!("<meta name=\"{}\"> has no content attribute", name))
            }),
    }
}

/// Fetch all of `names`, or report the first one that is absent
fn required_meta<const N: usize>(
    document: &Html,
    names: [&'static str; N],
) -> Result<std::result::Result<[String; N], &'static str>> {
    let mut values: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, name) in values.iter_mut().zip(names) {
        match meta_content(document, name)? {
            Some(content) => *slot = content,
            None => return Ok(Err(name)),
        }
    }
    Ok(Ok(values))
}

/// Extract DC metadata and the normalized set of links to the canonical site
pub fn extract_page_links(html: &str, targets: &LinkTargets) -> Result<PageExtract<PageLinks>> {
    let document = Html::parse_document(html);

    let [title, creator, uri] = match required_meta(&document, [DC_TITLE, DC_CREATOR, DC_IDENTIFIER])? {
        Ok(values) => values,
        Err(missing_field) => return Ok(PageExtract::Unusable { missing_field }),
    };

    let link_selector = selector("a[href]")?;
    let mut links = BTreeSet::new();
    for element in document.select(&link_selector) {
        if let Some(href) = element.value().attr("href")
            && targets.matches(href)
        {
            let normalized = normalize_link(href);
            debug!("Found link: {} -> {}", href, normalized);
            links.insert(normalized);
        }
    }

    Ok(PageExtract::Usable(PageLinks {
        title,
        creator,
        uri,
        links,
    }))
}

/// Extract the fields submitted to the search index
pub fn extract_search_fields(html: &str) -> Result<PageExtract<SearchFields>> {
    let document = Html::parse_document(html);

    let [title, creator, description, url] = match required_meta(
        &document,
        [DC_TITLE, DC_CREATOR, DC_DESCRIPTION, DC_IDENTIFIER],
    )? {
        Ok(values) => values,
        Err(missing_field) => return Ok(PageExtract::Unusable { missing_field }),
    };

    let body_selector = selector("body")?;
    let body = document
        .select(&body_selector)
        .next()
        .ok_or_else(|| ScanError::ParseError("document has no <body>".to_string()))?;

    Ok(PageExtract::Usable(SearchFields {
        title,
        creator,
        description,
        url,
        text: stripped_strings(body).join(" "),
    }))
}

/// Non-empty trimmed text nodes under `root`, skipping anything inside
/// script, style or template elements
fn stripped_strings(root: ElementRef<'_>) -> Vec<String> {
    root.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let in_code = node
                .ancestors()
                .filter_map(|ancestor| ancestor.value().as_element())
                .any(|e| matches!(e.name(), "script" | "style" | "template"));
            if in_code {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}
