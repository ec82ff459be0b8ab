use treemarks::types::errors::*;

// === BookmarkError Tests ===

#[test]
fn test_bookmark_error_display_variants() {
    assert_eq!(
        BookmarkError::NotFound("bm-1".to_string()).to_string(),
        "Bookmark not found: bm-1"
    );
    assert_eq!(
        BookmarkError::NotABookmark("f-1".to_string()).to_string(),
        "Item is a folder, not a bookmark: f-1"
    );
    assert_eq!(
        BookmarkError::FolderNotFound("f-2".to_string()).to_string(),
        "Bookmark folder not found: f-2"
    );
    assert_eq!(
        BookmarkError::InvalidMove("f-3".to_string()).to_string(),
        "Cannot move folder into its own subtree: f-3"
    );
    assert_eq!(
        BookmarkError::Validation("bad url".to_string()).to_string(),
        "Invalid bookmark: bad url"
    );
    assert_eq!(
        BookmarkError::Storage("disk full".to_string()).to_string(),
        "Bookmark storage error: disk full"
    );
    assert_eq!(BookmarkError::LockPoisoned.to_string(), "Bookmark tree lock poisoned");
}

#[test]
fn test_bookmark_error_wraps_store_error() {
    let err: BookmarkError = StoreError::Io("permission denied".to_string()).into();
    assert_eq!(
        err.to_string(),
        "Bookmark storage error: Storage I/O error: permission denied"
    );
}

#[test]
fn test_bookmark_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(BookmarkError::NotFound("id".to_string()));
    assert!(err.source().is_none());
}

// === StoreError Tests ===

#[test]
fn test_store_error_display_variants() {
    assert_eq!(
        StoreError::Io("read failed".to_string()).to_string(),
        "Storage I/O error: read failed"
    );
    assert_eq!(
        StoreError::Serialization("bad utf-8".to_string()).to_string(),
        "Storage serialization error: bad utf-8"
    );
}

// === SettingsError Tests ===

#[test]
fn test_settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("no access".to_string()).to_string(),
        "Settings I/O error: no access"
    );
    assert_eq!(
        SettingsError::SerializationError("eof".to_string()).to_string(),
        "Settings serialization error: eof"
    );
    assert_eq!(
        SettingsError::InvalidKey("a.b".to_string()).to_string(),
        "Invalid settings key: a.b"
    );
    assert_eq!(
        SettingsError::InvalidValue("not a number".to_string()).to_string(),
        "Invalid settings value: not a number"
    );
}

// === ProbeError / TagSuggestError Tests ===

#[test]
fn test_probe_error_display_variants() {
    assert_eq!(
        ProbeError::ClientBuild("tls".to_string()).to_string(),
        "Link checker client error: tls"
    );
    assert_eq!(
        ProbeError::Runtime("no reactor".to_string()).to_string(),
        "Link checker runtime error: no reactor"
    );
}

#[test]
fn test_tag_suggest_error_display_variants() {
    assert_eq!(
        TagSuggestError::Unavailable.to_string(),
        "No tag suggestion provider configured"
    );
    assert_eq!(
        TagSuggestError::ProviderError("429".to_string()).to_string(),
        "Tag suggestion failed: 429"
    );
}
