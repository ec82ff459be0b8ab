//! Unit tests for diff/merge of imported trees.

use std::collections::HashSet;

use treemarks::engine::tree_ops;
use treemarks::services::merge_engine::{apply_merge, diff_new, MergeSummary};
use treemarks::types::bookmark::{Bookmark, BookmarkItem, Folder, Tree};

fn bm(id: &str, url: &str) -> BookmarkItem {
    let mut b = Bookmark::new(id, url);
    b.id = id.to_string();
    b.into()
}

fn folder(id: &str, title: &str, children: Vec<BookmarkItem>) -> BookmarkItem {
    let mut f = Folder::new(title).with_children(children);
    f.id = id.to_string();
    f.into()
}

fn urls(items: &[BookmarkItem]) -> Vec<String> {
    let mut out = Vec::new();
    tree_ops::walk(items, &mut |item| {
        if let BookmarkItem::Bookmark(b) = item {
            out.push(b.url.clone());
        }
    });
    out
}

#[test]
fn test_work_folder_duplicate_after_normalization() {
    let mut tree: Tree = vec![folder("work", "Work", vec![bm("a", "x.com")])];
    tree_ops::upsert(&mut tree, bm("b", "x.com/"), Some("work"));
    assert_eq!(tree[0].children().unwrap().len(), 2);

    let imported = vec![folder("imp", "Work", vec![bm("b2", "x.com/")])];
    assert!(diff_new(&tree, &imported).is_empty());
}

#[test]
fn test_diff_prunes_folders_without_new_content() {
    let existing = vec![bm("e", "https://known.example/")];
    let imported = vec![
        folder("f1", "All known", vec![bm("k", "http://www.known.example")]),
        folder("f2", "Empty", vec![]),
        folder(
            "f3",
            "Mixed",
            vec![
                bm("k2", "known.example"),
                folder("f4", "Deep", vec![bm("n", "https://new.example")]),
            ],
        ),
    ];

    let diff = diff_new(&existing, &imported);
    assert_eq!(diff.len(), 1);
    assert_eq!(diff[0].title(), "Mixed");
    let mixed = diff[0].children().unwrap();
    assert_eq!(mixed.len(), 1);
    assert_eq!(mixed[0].title(), "Deep");
    assert_eq!(urls(&diff), vec!["https://new.example"]);
}

#[test]
fn test_merge_matches_folders_by_title_among_immediate_children() {
    let mut existing = vec![
        folder("work", "Work", vec![bm("a", "https://a.example")]),
        folder("other", "Other", vec![folder("nested-work", "Work", vec![])]),
    ];
    let approved = vec![folder("imp", "Work", vec![bm("n", "https://n.example")])];

    let summary = apply_merge(&mut existing, &approved);
    assert_eq!(
        summary,
        MergeSummary {
            bookmarks_added: 1,
            folders_created: 0
        }
    );
    assert_eq!(existing[0].children().unwrap().len(), 2);
    let nested = existing[1].children().unwrap()[0].children().unwrap();
    assert!(nested.is_empty());
}

#[test]
fn test_merge_creates_missing_folders_recursively() {
    let mut existing: Tree = Vec::new();
    let approved = vec![folder(
        "p",
        "Parent",
        vec![folder("c", "Child", vec![bm("n", "https://n.example")])],
    )];

    let summary = apply_merge(&mut existing, &approved);
    assert_eq!(summary.folders_created, 2);
    assert_eq!(summary.bookmarks_added, 1);
    assert_eq!(existing[0].title(), "Parent");
    assert_eq!(existing[0].children().unwrap()[0].title(), "Child");
}

#[test]
fn test_merge_first_title_match_wins() {
    let mut existing = vec![folder("w1", "Work", vec![]), folder("w2", "Work", vec![])];
    apply_merge(&mut existing, &[folder("imp", "Work", vec![bm("n", "https://n.example")])]);
    assert_eq!(existing[0].children().unwrap().len(), 1);
    assert!(existing[1].children().unwrap().is_empty());
}

#[test]
fn test_merge_skips_urls_already_present() {
    let mut existing = vec![bm("a", "https://www.a.example/")];
    let summary = apply_merge(&mut existing, &[bm("dup", "http://a.example")]);
    assert_eq!(summary.bookmarks_added, 0);
    assert_eq!(existing.len(), 1);
}

#[test]
fn test_merge_keeps_duplicates_within_one_batch() {
    let mut existing: Tree = Vec::new();
    let approved = vec![bm("n1", "https://same.example"), bm("n2", "https://same.example/")];
    let summary = apply_merge(&mut existing, &approved);
    assert_eq!(summary.bookmarks_added, 2);
}

#[test]
fn test_merge_reassigns_colliding_ids() {
    let mut existing = vec![bm("shared", "https://a.example")];
    apply_merge(&mut existing, &[bm("shared", "https://b.example")]);

    assert_eq!(existing.len(), 2);
    let ids: HashSet<String> = tree_ops::collect_ids(&existing);
    assert_eq!(ids.len(), 2);
    assert!(ids.contains("shared"));
}
