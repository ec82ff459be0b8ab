//! JSON document store for the bookmark tree.
//!
//! Provides [`DocumentStore`], which loads, atomically rewrites and
//! snapshots a single `bookmarks.json` file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use super::migrations;
use crate::types::bookmark::Tree;
use crate::types::errors::StoreError;
use crate::types::settings::StorageSettings;

/// Whole-document store. Holds no tree state of its own.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
    backup_dir: PathBuf,
    backup_retention: Option<usize>,
}

impl DocumentStore {
    /// Creates a store for the document at `path`, snapshotting into `backup_dir`.
    ///
    /// Nothing is touched on disk until the first `load`, `save` or `backup`.
    pub fn new<P: AsRef<Path>, B: AsRef<Path>>(path: P, backup_dir: B) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            backup_dir: backup_dir.as_ref().to_path_buf(),
            backup_retention: None,
        }
    }

    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(&settings.data_file, &settings.backup_dir)
            .with_retention(settings.backup_retention)
    }

    /// Keeps at most `retention` snapshots; `None` keeps all of them.
    pub fn with_retention(mut self, retention: Option<usize>) -> Self {
        self.backup_retention = retention;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Reads the tree from disk.
    ///
    /// A missing or unparsable document is replaced by an empty tree, which is
    /// persisted immediately. Unparsable content is first copied aside next to
    /// the document. Nodes without `createdAt` are back-filled and the fix is
    /// written back.
    ///
    /// # Errors
    /// Returns `StoreError::Io` when the document exists but cannot be read,
    /// or when the replacement cannot be written.
    pub fn load(&self) -> Result<Tree, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "bookmark document missing, initializing empty tree");
                let tree = Tree::new();
                self.save(&tree)?;
                return Ok(tree);
            }
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let mut value: Value = match decode(&raw) {
            Ok(v) => v,
            Err(e) => return self.reset_corrupt(&raw, &e.to_string()),
        };

        let fixed = migrations::run_all(&mut value);

        let tree: Tree = match serde_json::from_value(value) {
            Ok(t) => t,
            Err(e) => return self.reset_corrupt(&raw, &e.to_string()),
        };

        if fixed > 0 {
            tracing::warn!(nodes = fixed, "back-filled missing createdAt timestamps");
            self.save(&tree)?;
        }

        Ok(tree)
    }

    /// Replaces the document with `tree`.
    ///
    /// The JSON is written to a sibling temp file and renamed over the
    /// document, so readers never observe a partial write.
    pub fn save(&self, tree: &Tree) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Io(format!("Failed to create data directory: {}", e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(tree)
            .map_err(|e| StoreError::Serialization(format!("Failed to serialize tree: {}", e)))?;

        let tmp = self.temp_path();
        fs::write(&tmp, json)
            .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            StoreError::Io(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(path = %self.path.display(), items = tree.len(), "bookmark document saved");
        Ok(())
    }

    /// Copies the current document verbatim into a timestamped snapshot.
    ///
    /// Returns the snapshot path, or `None` when there is nothing to back up
    /// (no document, or an empty tree).
    pub fn backup(&self) -> Result<Option<PathBuf>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let is_empty = decode(&raw)
            .map(|v| v.as_array().is_some_and(|items| items.is_empty()))
            .unwrap_or(false);
        if is_empty {
            return Ok(None);
        }

        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| StoreError::Io(format!("Failed to create backup directory: {}", e)))?;

        let target = self.next_snapshot_path();
        fs::write(&target, raw)
            .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", target.display(), e)))?;
        tracing::info!(path = %target.display(), "bookmark backup written");

        if let Some(keep) = self.backup_retention {
            self.prune_backups(keep)?;
        }

        Ok(Some(target))
    }

    /// Lists snapshots of this document, oldest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(format!("Failed to list backups: {}", e))),
        };

        let prefix = format!("{}-", self.stem());
        let mut backups: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy())
                    .map(|name| name.starts_with(&prefix) && name.ends_with(".json"))
                    .unwrap_or(false)
            })
            .collect();
        // Compare stems so "<stamp>" sorts before its collision "<stamp>-001".
        backups.sort_by(|a, b| a.file_stem().cmp(&b.file_stem()));
        Ok(backups)
    }

    fn prune_backups(&self, keep: usize) -> Result<(), StoreError> {
        let backups = self.list_backups()?;
        if backups.len() <= keep {
            return Ok(());
        }
        let excess = backups.len() - keep;
        for old in backups.into_iter().take(excess) {
            fs::remove_file(&old).map_err(|e| {
                StoreError::Io(format!("Failed to remove {}: {}", old.display(), e))
            })?;
            tracing::debug!(path = %old.display(), "pruned old backup");
        }
        Ok(())
    }

    /// Moves unreadable content out of the way and starts over with `[]`.
    fn reset_corrupt(&self, raw: &str, reason: &str) -> Result<Tree, StoreError> {
        if raw.trim().is_empty() {
            tracing::warn!(path = %self.path.display(), "bookmark document empty, initializing empty tree");
        } else {
            let aside = self.path.with_file_name(format!(
                "{}.corrupt-{}.json",
                self.stem(),
                Utc::now().format("%Y%m%d-%H%M%S")
            ));
            fs::write(&aside, raw).map_err(|e| {
                StoreError::Io(format!("Failed to preserve corrupt document: {}", e))
            })?;
            tracing::warn!(
                path = %self.path.display(),
                preserved = %aside.display(),
                reason,
                "bookmark document unparsable, initializing empty tree"
            );
        }

        let tree = Tree::new();
        self.save(&tree)?;
        Ok(tree)
    }

    fn next_snapshot_path(&self) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%d-%H%M%S-%6f");
        let base = format!("{}-{}", self.stem(), stamp);
        let mut candidate = self.backup_dir.join(format!("{}.json", base));
        let mut n = 1;
        while candidate.exists() {
            candidate = self.backup_dir.join(format!("{}-{:03}.json", base, n));
            n += 1;
        }
        candidate
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "bookmarks.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "bookmarks".to_string())
    }
}

/// Parses a document with no nesting limit; folder depth is bounded only by
/// what the engine itself wrote.
fn decode(raw: &str) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_str(raw);
    de.disable_recursion_limit();
    let value = Value::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}
