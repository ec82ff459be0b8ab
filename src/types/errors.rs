use std::fmt;

// === StoreError ===

/// Errors raised by the bookmark document store.
#[derive(Debug)]
pub enum StoreError {
    /// The document or a snapshot could not be read or written.
    Io(String),
    /// The tree could not be encoded as JSON.
    Serialization(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "Storage I/O error: {}", msg),
            StoreError::Serialization(msg) => write!(f, "Storage serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

// === BookmarkError ===

/// Errors related to bookmark tree operations.
#[derive(Debug)]
pub enum BookmarkError {
    /// No node with the given ID exists anywhere in the tree.
    NotFound(String),
    /// The ID belongs to a folder where a bookmark was required.
    NotABookmark(String),
    /// The target folder was not found.
    FolderNotFound(String),
    /// A folder cannot be moved into itself or one of its descendants.
    InvalidMove(String),
    /// The item failed validation before reaching the tree.
    Validation(String),
    /// The underlying document store failed.
    Storage(String),
    /// Another thread panicked while holding the tree lock.
    LockPoisoned,
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::NotFound(id) => write!(f, "Bookmark not found: {}", id),
            BookmarkError::NotABookmark(id) => write!(f, "Item is a folder, not a bookmark: {}", id),
            BookmarkError::FolderNotFound(id) => write!(f, "Bookmark folder not found: {}", id),
            BookmarkError::InvalidMove(id) => {
                write!(f, "Cannot move folder into its own subtree: {}", id)
            }
            BookmarkError::Validation(msg) => write!(f, "Invalid bookmark: {}", msg),
            BookmarkError::Storage(msg) => write!(f, "Bookmark storage error: {}", msg),
            BookmarkError::LockPoisoned => write!(f, "Bookmark tree lock poisoned"),
        }
    }
}

impl std::error::Error for BookmarkError {}

impl From<StoreError> for BookmarkError {
    fn from(err: StoreError) -> Self {
        BookmarkError::Storage(err.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === ProbeError ===

/// Errors related to setting up the dead-link prober.
///
/// Individual probe failures are reported as `LinkStatus` values instead.
#[derive(Debug)]
pub enum ProbeError {
    /// The HTTP client could not be constructed.
    ClientBuild(String),
    /// The async runtime could not be started.
    Runtime(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::ClientBuild(msg) => write!(f, "Link checker client error: {}", msg),
            ProbeError::Runtime(msg) => write!(f, "Link checker runtime error: {}", msg),
        }
    }
}

impl std::error::Error for ProbeError {}

// === TagSuggestError ===

/// Errors returned by a tag suggestion provider.
#[derive(Debug)]
pub enum TagSuggestError {
    /// No provider is configured.
    Unavailable,
    /// The provider could not be reached or returned an error.
    ProviderError(String),
}

impl fmt::Display for TagSuggestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagSuggestError::Unavailable => write!(f, "No tag suggestion provider configured"),
            TagSuggestError::ProviderError(msg) => write!(f, "Tag suggestion failed: {}", msg),
        }
    }
}

impl std::error::Error for TagSuggestError {}
