//! Id-addressed mutation primitives over an in-memory bookmark tree.
//!
//! Every search is pre-order and depth-first; ids are assumed unique across
//! the whole tree, and when they are not the first match wins.

use std::collections::HashSet;

use chrono::Utc;

use crate::types::bookmark::{new_id, BookmarkItem, Tree};
use crate::types::errors::BookmarkError;

/// Parent id that addresses the root sequence in `move_item`.
pub const ROOT_ID: &str = "root";

/// Whether `upsert` replaced an existing node or inserted a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Visits every node in pre-order.
pub fn walk<'a, F>(items: &'a [BookmarkItem], visit: &mut F)
where
    F: FnMut(&'a BookmarkItem),
{
    for item in items {
        visit(item);
        if let Some(children) = item.children() {
            walk(children, visit);
        }
    }
}

pub fn find<'a>(items: &'a [BookmarkItem], id: &str) -> Option<&'a BookmarkItem> {
    for item in items {
        if item.id() == id {
            return Some(item);
        }
        if let Some(found) = item.children().and_then(|c| find(c, id)) {
            return Some(found);
        }
    }
    None
}

pub fn find_mut<'a>(items: &'a mut [BookmarkItem], id: &str) -> Option<&'a mut BookmarkItem> {
    for item in items.iter_mut() {
        if item.id() == id {
            return Some(item);
        }
        if let BookmarkItem::Folder(folder) = item {
            if let Some(found) = find_mut(&mut folder.children, id) {
                return Some(found);
            }
        }
    }
    None
}

pub fn collect_ids(items: &[BookmarkItem]) -> HashSet<String> {
    let mut ids = HashSet::new();
    walk(items, &mut |item| {
        ids.insert(item.id().to_string());
    });
    ids
}

pub fn count_nodes(items: &[BookmarkItem]) -> usize {
    let mut count = 0;
    walk(items, &mut |_| count += 1);
    count
}

/// Gives `item` and its descendants fresh ids wherever an id is empty or
/// already in `seen`, recording every id it keeps.
pub fn ensure_unique_ids(item: &mut BookmarkItem, seen: &mut HashSet<String>) {
    if item.id().is_empty() || seen.contains(item.id()) {
        item.set_id(new_id());
    }
    seen.insert(item.id().to_string());
    if let Some(children) = item.children_mut() {
        for child in children.iter_mut() {
            ensure_unique_ids(child, seen);
        }
    }
}

/// Inserts or replaces `item`.
///
/// When a node with the same id exists it is replaced in place, keeping its
/// `createdAt`; a folder replacing a folder keeps the existing children, and
/// a folder replacing a bookmark brings its own children, re-identified
/// against the tree. Otherwise the item is stamped now and appended to `parent_id`'s children,
/// or to the root when `parent_id` is absent or names no folder.
pub fn upsert(tree: &mut Tree, mut item: BookmarkItem, parent_id: Option<&str>) -> UpsertOutcome {
    if item.id().is_empty() {
        item.set_id(new_id());
    }

    let mut seen = collect_ids(tree);

    if let Some(existing) = find_mut(tree, item.id()) {
        item.set_created_at(existing.created_at());
        match (&mut *existing, &mut item) {
            (BookmarkItem::Folder(old), BookmarkItem::Folder(new)) => {
                new.children = std::mem::take(&mut old.children);
            }
            (_, BookmarkItem::Folder(new)) => {
                for child in new.children.iter_mut() {
                    ensure_unique_ids(child, &mut seen);
                }
            }
            _ => {}
        }
        *existing = item;
        return UpsertOutcome::Updated;
    }

    item.set_created_at(Utc::now());
    ensure_unique_ids(&mut item, &mut seen);

    let parent = parent_id.and_then(|pid| find_mut(tree, pid)).and_then(|p| p.children_mut());
    match parent {
        Some(children) => children.push(item),
        None => tree.push(item),
    }
    UpsertOutcome::Created
}

/// Removes the first node with `id` (pre-order) and returns it with its subtree.
pub fn extract(items: &mut Vec<BookmarkItem>, id: &str) -> Option<BookmarkItem> {
    for idx in 0..items.len() {
        if items[idx].id() == id {
            return Some(items.remove(idx));
        }
        if let Some(children) = items[idx].children_mut() {
            if let Some(found) = extract(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Deletes the node with `id` and all of its descendants.
pub fn delete_by_id(tree: &mut Tree, id: &str) -> bool {
    extract(tree, id).is_some()
}

/// Deletes every node whose id is in `ids`, in one pass.
///
/// Returns how many matching nodes were removed; descendants of a removed
/// folder go with it and are not counted separately.
pub fn delete_many(items: &mut Vec<BookmarkItem>, ids: &HashSet<String>) -> usize {
    let before = items.len();
    items.retain(|item| !ids.contains(item.id()));
    let mut removed = before - items.len();
    for item in items.iter_mut() {
        if let Some(children) = item.children_mut() {
            removed += delete_many(children, ids);
        }
    }
    removed
}

/// Flips `isFavorite` on a bookmark and returns the new value.
pub fn toggle_favorite(tree: &mut Tree, id: &str) -> Result<bool, BookmarkError> {
    match find_mut(tree, id) {
        Some(BookmarkItem::Bookmark(bookmark)) => {
            bookmark.is_favorite = !bookmark.is_favorite;
            Ok(bookmark.is_favorite)
        }
        Some(BookmarkItem::Folder(_)) => Err(BookmarkError::NotABookmark(id.to_string())),
        None => Err(BookmarkError::NotFound(id.to_string())),
    }
}

/// Moves a node to `new_index` within `target_parent` (root when `None` or `"root"`).
///
/// The index is clamped to `0..=len`, where `len` is measured after the node
/// has been taken out. The target is validated first, so an error leaves the
/// tree unchanged. Returns the index the node ended up at.
pub fn move_item(
    tree: &mut Tree,
    id: &str,
    new_index: i64,
    target_parent: Option<&str>,
) -> Result<usize, BookmarkError> {
    let target = target_parent.filter(|pid| *pid != ROOT_ID);

    let moving = find(tree, id).ok_or_else(|| BookmarkError::NotFound(id.to_string()))?;
    if let Some(pid) = target {
        let into_itself = pid == id
            || moving
                .children()
                .map(|children| find(children, pid).is_some())
                .unwrap_or(false);
        if into_itself {
            return Err(BookmarkError::InvalidMove(id.to_string()));
        }
        if !matches!(find(tree, pid), Some(BookmarkItem::Folder(_))) {
            return Err(BookmarkError::FolderNotFound(pid.to_string()));
        }
    }

    let node = extract(tree, id).ok_or_else(|| BookmarkError::NotFound(id.to_string()))?;
    let siblings = match target {
        Some(pid) => find_mut(tree, pid)
            .and_then(|parent| parent.children_mut())
            .ok_or_else(|| BookmarkError::FolderNotFound(pid.to_string()))?,
        None => tree,
    };

    let index = new_index.clamp(0, siblings.len() as i64) as usize;
    siblings.insert(index, node);
    Ok(index)
}
