//! URL normalization and the URL index used for deduplication.
//!
//! Two bookmarks are duplicates iff their normalized URLs are string-equal.

use std::collections::HashMap;

use url::Url;

use crate::engine::tree_ops;
use crate::types::bookmark::BookmarkItem;

/// Normalized URL → id of the first bookmark (pre-order) carrying it.
pub type UrlIndex = HashMap<String, String>;

/// Canonical form of `raw`: host without `www.`, followed by the path, with
/// one trailing slash removed. Scheme, port, query and fragment are dropped,
/// and a missing scheme is read as `https`.
///
/// Never fails: input that does not parse as a URL is stripped textually.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    match Url::parse(&candidate) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or("").to_lowercase();
            let host = host.strip_prefix("www.").unwrap_or(&host);
            strip_trailing_slash(&format!("{}{}", host, parsed.path()))
        }
        Err(_) => textual_normalize(trimmed),
    }
}

fn textual_normalize(raw: &str) -> String {
    let without_scheme = match raw.find("://") {
        Some(pos) if raw[..pos].chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) => {
            &raw[pos + 3..]
        }
        _ => raw,
    };
    let without_www = without_scheme
        .strip_prefix("www.")
        .or_else(|| without_scheme.strip_prefix("WWW."))
        .unwrap_or(without_scheme);
    strip_trailing_slash(without_www)
}

fn strip_trailing_slash(s: &str) -> String {
    s.strip_suffix('/').unwrap_or(s).to_string()
}

/// Builds the URL index of a tree in a single pre-order pass.
///
/// When several bookmarks normalize to the same URL, the first one
/// encountered keeps the slot.
pub fn build_url_index(items: &[BookmarkItem]) -> UrlIndex {
    let mut index = UrlIndex::new();
    tree_ops::walk(items, &mut |item| {
        if let BookmarkItem::Bookmark(bookmark) = item {
            index
                .entry(normalize(&bookmark.url))
                .or_insert_with(|| bookmark.id.clone());
        }
    });
    index
}
