//! Unit tests for URL normalization and the dedup index.

use rstest::rstest;

use treemarks::services::url_normalizer::{build_url_index, normalize};
use treemarks::types::bookmark::{Bookmark, BookmarkItem, Folder};

#[rstest]
#[case("https://www.Example.com/path/")]
#[case("example.com/path")]
#[case("http://EXAMPLE.com/path/")]
#[case("https://example.com:8443/path?q=1#frag")]
#[case("  www.example.com/path  ")]
fn test_equivalent_forms_normalize_alike(#[case] raw: &str) {
    assert_eq!(normalize(raw), "example.com/path");
}

#[rstest]
#[case("https://example.com/", "example.com")]
#[case("https://example.com", "example.com")]
#[case("https://example.com/a//", "example.com/a/")]
#[case("https://sub.www.example.com/x", "sub.www.example.com/x")]
#[case("https://example.com/Case", "example.com/Case")]
fn test_normalize_edge_cases(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(normalize(raw), expected);
}

#[rstest]
#[case("")]
#[case("://")]
#[case("http://[::1")]
#[case("not a url at all/")]
fn test_normalize_is_total(#[case] raw: &str) {
    let _ = normalize(raw);
}

#[test]
fn test_unparsable_input_uses_textual_strip() {
    assert_eq!(normalize("http://www.exa mple.com/"), "exa mple.com");
}

#[test]
fn test_index_keeps_first_pre_order_match() {
    let mut nested = Bookmark::new("Nested", "https://www.dup.example/");
    nested.id = "nested".to_string();
    let mut later = Bookmark::new("Later", "http://dup.example");
    later.id = "later".to_string();
    let mut other = Bookmark::new("Other", "https://other.example/page");
    other.id = "other".to_string();

    let tree: Vec<BookmarkItem> = vec![
        Folder::new("F").with_children(vec![nested.into()]).into(),
        later.into(),
        other.into(),
    ];

    let index = build_url_index(&tree);
    assert_eq!(index.len(), 2);
    assert_eq!(index["dup.example"], "nested");
    assert_eq!(index["other.example/page"], "other");
}
