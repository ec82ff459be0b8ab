//! Treemarks persistence layer.
//!
//! The whole bookmark tree is stored as one JSON document and always
//! rewritten in full.
//!
//! # Usage
//!
//! ```no_run
//! use treemarks::store::DocumentStore;
//!
//! let store = DocumentStore::new("bookmarks.json", "backups");
//! let tree = store.load().expect("failed to load bookmarks");
//! store.save(&tree).expect("failed to save bookmarks");
//! store.backup().expect("failed to snapshot bookmarks");
//! ```

pub mod document;
pub mod migrations;

pub use document::DocumentStore;
