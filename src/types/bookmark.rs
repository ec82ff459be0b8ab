use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::BookmarkError;

/// The whole persisted bookmark collection: an ordered list of root items.
pub type Tree = Vec<BookmarkItem>;

/// A node of the bookmark tree, discriminated by `"type"` in the JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BookmarkItem {
    Bookmark(Bookmark),
    Folder(Folder),
}

/// Represents a saved link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Represents a folder; `children` order is user-significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub children: Vec<BookmarkItem>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Generates a fresh node identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Bookmark {
    /// Creates a bookmark with a fresh id, no tags, stamped now.
    pub fn new(title: &str, url: &str) -> Self {
        Self {
            id: new_id(),
            title: title.to_string(),
            url: url.to_string(),
            tags: Vec::new(),
            is_favorite: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Rejects empty titles and strings that are not absolute URLs.
    pub fn validate(&self) -> Result<(), BookmarkError> {
        if self.title.trim().is_empty() {
            return Err(BookmarkError::Validation("bookmark title cannot be empty".to_string()));
        }
        url::Url::parse(&self.url).map_err(|e| {
            BookmarkError::Validation(format!("invalid url '{}': {}", self.url, e))
        })?;
        Ok(())
    }
}

impl Folder {
    /// Creates an empty folder with a fresh id, stamped now.
    pub fn new(title: &str) -> Self {
        Self {
            id: new_id(),
            title: title.to_string(),
            children: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_children(mut self, children: Vec<BookmarkItem>) -> Self {
        self.children = children;
        self
    }
}

impl BookmarkItem {
    pub fn id(&self) -> &str {
        match self {
            BookmarkItem::Bookmark(b) => &b.id,
            BookmarkItem::Folder(f) => &f.id,
        }
    }

    pub fn set_id(&mut self, id: String) {
        match self {
            BookmarkItem::Bookmark(b) => b.id = id,
            BookmarkItem::Folder(f) => f.id = id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            BookmarkItem::Bookmark(b) => &b.title,
            BookmarkItem::Folder(f) => &f.title,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            BookmarkItem::Bookmark(b) => b.created_at,
            BookmarkItem::Folder(f) => f.created_at,
        }
    }

    pub fn set_created_at(&mut self, at: DateTime<Utc>) {
        match self {
            BookmarkItem::Bookmark(b) => b.created_at = at,
            BookmarkItem::Folder(f) => f.created_at = at,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, BookmarkItem::Folder(_))
    }

    /// Children of a folder; `None` for bookmarks.
    pub fn children(&self) -> Option<&Vec<BookmarkItem>> {
        match self {
            BookmarkItem::Folder(f) => Some(&f.children),
            BookmarkItem::Bookmark(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<BookmarkItem>> {
        match self {
            BookmarkItem::Folder(f) => Some(&mut f.children),
            BookmarkItem::Bookmark(_) => None,
        }
    }

    pub fn validate(&self) -> Result<(), BookmarkError> {
        match self {
            BookmarkItem::Bookmark(b) => b.validate(),
            BookmarkItem::Folder(f) if f.title.trim().is_empty() => Err(
                BookmarkError::Validation("folder title cannot be empty".to_string()),
            ),
            BookmarkItem::Folder(_) => Ok(()),
        }
    }
}

impl From<Bookmark> for BookmarkItem {
    fn from(b: Bookmark) -> Self {
        BookmarkItem::Bookmark(b)
    }
}

impl From<Folder> for BookmarkItem {
    fn from(f: Folder) -> Self {
        BookmarkItem::Folder(f)
    }
}
