use regex::Regex;
use std::sync::LazyLock;

/// Scheme prefixes (`https:/`, `http://`, ...) and every leading or trailing `/`
static SCHEME_AND_SLASHES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?:/+|^/+|/+$").expect("scheme pattern is a valid regex")
});

/// Canonical scheme every normalized link is re-prefixed with
pub const CANONICAL_SCHEME: &str = "https://";

/// Canonicalize a raw `href` into the form used as the dedup and lookup key.
///
/// Spaces and embedded CR/LF are dropped as typos, then the scheme and any
/// slashes at either end are removed. A bare `library.` host gains `www.` and
/// the result is re-prefixed with `https://`. Case is left untouched.
///
/// The output never ends in `/` and normalizing it again returns it as is.
pub fn normalize_link(raw: &str) -> String {
    let cleaned = raw.replace([' ', '\r', '\n'], "");
    let mut link = SCHEME_AND_SLASHES.replace_all(&cleaned, "").into_owned();

    if link.starts_with("library") {
        link.insert_str(0, "www.");
    }

    format!("{}{}", CANONICAL_SCHEME, link)
}
