//! Optional tag enrichment from an external suggestion provider.
//!
//! The engine works the same with no provider; suggestions only ever fill
//! an empty `tags` list.

use crate::types::bookmark::Bookmark;
use crate::types::errors::TagSuggestError;

/// Most tags taken from a single suggestion.
pub const MAX_SUGGESTED_TAGS: usize = 3;

/// A source of tag suggestions for a URL and title.
pub trait TagSuggester {
    fn suggest(&self, url: &str, title: &str) -> Result<Vec<String>, TagSuggestError>;
}

/// Provider used when no suggestion service is configured. Always reports
/// [`TagSuggestError::Unavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTagSuggester;

impl TagSuggester for NoopTagSuggester {
    fn suggest(&self, _url: &str, _title: &str) -> Result<Vec<String>, TagSuggestError> {
        Err(TagSuggestError::Unavailable)
    }
}

/// Fills `bookmark.tags` from `suggester` when the bookmark has none.
///
/// Suggestions are trimmed and lowercased, empties dropped, and capped at
/// [`MAX_SUGGESTED_TAGS`]. A failing provider leaves the bookmark untouched.
/// Returns whether any tag was added.
pub fn enrich_tags(bookmark: &mut Bookmark, suggester: &dyn TagSuggester) -> bool {
    if !bookmark.tags.is_empty() {
        return false;
    }

    let suggested = match suggester.suggest(&bookmark.url, &bookmark.title) {
        Ok(tags) => tags,
        Err(TagSuggestError::Unavailable) => {
            tracing::debug!(url = %bookmark.url, "no tag suggestion provider");
            return false;
        }
        Err(e) => {
            tracing::warn!(url = %bookmark.url, error = %e, "tag suggestion failed");
            return false;
        }
    };

    bookmark.tags = suggested
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .take(MAX_SUGGESTED_TAGS)
        .collect();
    !bookmark.tags.is_empty()
}
