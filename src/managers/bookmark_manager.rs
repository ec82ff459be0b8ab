//! Bookmark Manager for Treemarks.
//!
//! Implements `BookmarkManagerTrait` on top of a [`DocumentStore`]. Every
//! mutation is a load, transform, save sequence run under one lock, so two
//! callers never interleave on the same document.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::engine::tree_ops::{self, UpsertOutcome};
use crate::services::merge_engine::{self, MergeSummary};
use crate::services::netscape_codec;
use crate::services::tag_suggester::{self, TagSuggester};
use crate::store::DocumentStore;
use crate::types::bookmark::{BookmarkItem, Tree};
use crate::types::errors::BookmarkError;
use crate::types::settings::StorageSettings;

/// Trait defining bookmark tree operations.
pub trait BookmarkManagerTrait {
    fn load(&self) -> Result<Tree, BookmarkError>;
    /// Upserts `item` and returns its id.
    fn save(&self, item: BookmarkItem, parent_id: Option<&str>) -> Result<String, BookmarkError>;
    fn delete(&self, id: &str) -> Result<(), BookmarkError>;
    /// Returns how many of `ids` were found and removed.
    fn delete_many(&self, ids: &[String]) -> Result<usize, BookmarkError>;
    /// Returns the new favorite flag.
    fn toggle_favorite(&self, id: &str) -> Result<bool, BookmarkError>;
    /// Returns the index the item landed at.
    fn reorder(&self, id: &str, new_index: i64, parent_id: Option<&str>) -> Result<usize, BookmarkError>;
    fn parse_import_file(&self, text: &str) -> Tree;
    fn diff_for_merge(&self, text: &str) -> Result<Tree, BookmarkError>;
    fn apply_merge(&self, approved: &[BookmarkItem]) -> Result<MergeSummary, BookmarkError>;
    fn replace_all(&self, tree: Tree) -> Result<(), BookmarkError>;
    fn export_all(&self) -> Result<String, BookmarkError>;
    fn export_selected(&self, ids: &[String]) -> Result<String, BookmarkError>;
    fn backup(&self) -> Result<Option<PathBuf>, BookmarkError>;
}

/// Bookmark manager backed by a JSON document store.
///
/// The last tree read or written is cached for reads; mutations always start
/// from the document on disk.
pub struct BookmarkManager {
    store: DocumentStore,
    cache: Mutex<Option<Tree>>,
}

impl BookmarkManager {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            cache: Mutex::new(None),
        }
    }

    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(DocumentStore::from_settings(settings))
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Drops the cached tree so the next read goes to disk.
    pub fn reload(&self) -> Result<(), BookmarkError> {
        *self.lock()? = None;
        Ok(())
    }

    /// Like `save`, but fills an untagged bookmark's tags from `suggester` first.
    pub fn save_with_suggestions(
        &self,
        mut item: BookmarkItem,
        parent_id: Option<&str>,
        suggester: &dyn TagSuggester,
    ) -> Result<String, BookmarkError> {
        item.validate()?;
        if let BookmarkItem::Bookmark(bookmark) = &mut item {
            tag_suggester::enrich_tags(bookmark, suggester);
        }
        self.save(item, parent_id)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Tree>>, BookmarkError> {
        self.cache.lock().map_err(|_| BookmarkError::LockPoisoned)
    }

    /// Reads the current tree, from cache when warm.
    fn snapshot(&self) -> Result<Tree, BookmarkError> {
        let mut cache = self.lock()?;
        if let Some(tree) = cache.as_ref() {
            return Ok(tree.clone());
        }
        let tree = self.store.load()?;
        *cache = Some(tree.clone());
        Ok(tree)
    }

    /// Runs `op` against a freshly loaded tree and persists the result.
    ///
    /// When `op` fails nothing is written and the cache is left as it was.
    fn mutate<T, F>(&self, op: F) -> Result<T, BookmarkError>
    where
        F: FnOnce(&mut Tree) -> Result<T, BookmarkError>,
    {
        let mut cache = self.lock()?;
        let mut tree = self.store.load()?;
        let out = op(&mut tree)?;
        self.store.save(&tree)?;
        *cache = Some(tree);
        Ok(out)
    }
}

impl BookmarkManagerTrait for BookmarkManager {
    fn load(&self) -> Result<Tree, BookmarkError> {
        self.snapshot()
    }

    fn save(&self, mut item: BookmarkItem, parent_id: Option<&str>) -> Result<String, BookmarkError> {
        item.validate()?;
        if item.id().is_empty() {
            item.set_id(crate::types::bookmark::new_id());
        }
        let id = item.id().to_string();

        let outcome = self.mutate(|tree| Ok(tree_ops::upsert(tree, item, parent_id)))?;
        match outcome {
            UpsertOutcome::Created => tracing::info!(%id, parent = ?parent_id, "bookmark item created"),
            UpsertOutcome::Updated => tracing::info!(%id, "bookmark item updated"),
        }
        Ok(id)
    }

    fn delete(&self, id: &str) -> Result<(), BookmarkError> {
        self.mutate(|tree| {
            if tree_ops::delete_by_id(tree, id) {
                Ok(())
            } else {
                Err(BookmarkError::NotFound(id.to_string()))
            }
        })?;
        tracing::info!(%id, "bookmark item deleted");
        Ok(())
    }

    fn delete_many(&self, ids: &[String]) -> Result<usize, BookmarkError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let wanted: HashSet<String> = ids.iter().cloned().collect();
        let removed = self.mutate(|tree| Ok(tree_ops::delete_many(tree, &wanted)))?;
        tracing::info!(requested = ids.len(), removed, "bookmark items deleted");
        Ok(removed)
    }

    fn toggle_favorite(&self, id: &str) -> Result<bool, BookmarkError> {
        let favorite = self.mutate(|tree| tree_ops::toggle_favorite(tree, id))?;
        tracing::debug!(%id, favorite, "favorite toggled");
        Ok(favorite)
    }

    fn reorder(&self, id: &str, new_index: i64, parent_id: Option<&str>) -> Result<usize, BookmarkError> {
        let index = self.mutate(|tree| tree_ops::move_item(tree, id, new_index, parent_id))?;
        tracing::debug!(%id, index, parent = ?parent_id, "bookmark item moved");
        Ok(index)
    }

    fn parse_import_file(&self, text: &str) -> Tree {
        let tree = netscape_codec::parse_document(text);
        tracing::info!(nodes = tree_ops::count_nodes(&tree), "import file parsed");
        tree
    }

    fn diff_for_merge(&self, text: &str) -> Result<Tree, BookmarkError> {
        let imported = self.parse_import_file(text);
        let existing = self.snapshot()?;
        let diff = merge_engine::diff_new(&existing, &imported);
        tracing::info!(new_nodes = tree_ops::count_nodes(&diff), "merge diff computed");
        Ok(diff)
    }

    fn apply_merge(&self, approved: &[BookmarkItem]) -> Result<MergeSummary, BookmarkError> {
        let summary = self.mutate(|tree| Ok(merge_engine::apply_merge(tree, approved)))?;
        tracing::info!(
            bookmarks = summary.bookmarks_added,
            folders = summary.folders_created,
            "merge applied"
        );
        Ok(summary)
    }

    fn replace_all(&self, mut tree: Tree) -> Result<(), BookmarkError> {
        let mut seen = HashSet::new();
        for item in tree.iter_mut() {
            tree_ops::ensure_unique_ids(item, &mut seen);
        }

        let mut cache = self.lock()?;
        let snapshot = self.store.backup()?;
        self.store.save(&tree)?;
        tracing::info!(
            nodes = tree_ops::count_nodes(&tree),
            backup = ?snapshot,
            "bookmark tree replaced"
        );
        *cache = Some(tree);
        Ok(())
    }

    fn export_all(&self) -> Result<String, BookmarkError> {
        let tree = self.snapshot()?;
        Ok(netscape_codec::serialize_document(&tree))
    }

    fn export_selected(&self, ids: &[String]) -> Result<String, BookmarkError> {
        let tree = self.snapshot()?;
        let wanted: HashSet<String> = ids.iter().cloned().collect();
        Ok(netscape_codec::export_selected(&tree, &wanted))
    }

    fn backup(&self) -> Result<Option<PathBuf>, BookmarkError> {
        let _guard = self.lock()?;
        let path = self.store.backup()?;
        if path.is_none() {
            tracing::debug!("nothing to back up");
        }
        Ok(path)
    }
}
