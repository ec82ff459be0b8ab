//! Merge/diff of an imported tree against the existing one.
//!
//! `diff_new` offers only bookmarks whose normalized URL is not stored yet;
//! `apply_merge` folds an approved subset in, matching folders by title.

use std::collections::HashSet;

use crate::engine::tree_ops;
use crate::services::url_normalizer::{build_url_index, normalize, UrlIndex};
use crate::types::bookmark::{BookmarkItem, Folder, Tree};

/// Counts of what `apply_merge` inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub bookmarks_added: usize,
    pub folders_created: usize,
}

/// The part of `imported` not already present in `existing`.
///
/// A bookmark survives iff its normalized URL is absent from `existing`; a
/// folder survives iff something inside it survives.
pub fn diff_new(existing: &[BookmarkItem], imported: &[BookmarkItem]) -> Tree {
    let index = build_url_index(existing);
    filter_new(imported, &index)
}

fn filter_new(items: &[BookmarkItem], index: &UrlIndex) -> Tree {
    let mut kept = Tree::new();
    for item in items {
        match item {
            BookmarkItem::Bookmark(bookmark) => {
                if !index.contains_key(&normalize(&bookmark.url)) {
                    kept.push(item.clone());
                }
            }
            BookmarkItem::Folder(folder) => {
                let children = filter_new(&folder.children, index);
                if !children.is_empty() {
                    kept.push(BookmarkItem::Folder(Folder {
                        id: folder.id.clone(),
                        title: folder.title.clone(),
                        children,
                        created_at: folder.created_at,
                    }));
                }
            }
        }
    }
    kept
}

/// Structurally merges `approved` into `existing`.
///
/// Each incoming folder is matched by title among the current target's
/// immediate children (first match wins) or created empty and recursed into.
/// Each incoming bookmark is appended unless its normalized URL is in the
/// index of `existing` taken before the merge started. The index is not
/// refreshed while merging, so two new bookmarks sharing a URL within one
/// batch are both inserted.
///
/// Inserted nodes whose id already exists in the tree receive a fresh id.
pub fn apply_merge(existing: &mut Tree, approved: &[BookmarkItem]) -> MergeSummary {
    let index = build_url_index(existing);
    let mut seen = tree_ops::collect_ids(existing);
    let mut summary = MergeSummary::default();
    merge_into(existing, approved, &index, &mut seen, &mut summary);
    summary
}

fn merge_into(
    target: &mut Vec<BookmarkItem>,
    incoming: &[BookmarkItem],
    index: &UrlIndex,
    seen: &mut HashSet<String>,
    summary: &mut MergeSummary,
) {
    for item in incoming {
        match item {
            BookmarkItem::Folder(folder) => {
                let position = target
                    .iter()
                    .position(|t| t.is_folder() && t.title() == folder.title);
                let position = match position {
                    Some(p) => p,
                    None => {
                        let mut created = BookmarkItem::Folder(Folder {
                            id: folder.id.clone(),
                            title: folder.title.clone(),
                            children: Vec::new(),
                            created_at: folder.created_at,
                        });
                        tree_ops::ensure_unique_ids(&mut created, seen);
                        target.push(created);
                        summary.folders_created += 1;
                        target.len() - 1
                    }
                };
                if let Some(children) = target[position].children_mut() {
                    merge_into(children, &folder.children, index, seen, summary);
                }
            }
            BookmarkItem::Bookmark(bookmark) => {
                if index.contains_key(&normalize(&bookmark.url)) {
                    continue;
                }
                let mut added = item.clone();
                tree_ops::ensure_unique_ids(&mut added, seen);
                target.push(added);
                summary.bookmarks_added += 1;
                tracing::trace!(url = %bookmark.url, "merged bookmark");
            }
        }
    }
}
