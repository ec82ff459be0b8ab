//! App Core for Treemarks.
//!
//! Central struct holding the settings engine, the bookmark manager and the
//! optional tag suggestion provider.

use crate::managers::bookmark_manager::BookmarkManager;
use crate::services::link_checker::LinkChecker;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::tag_suggester::{NoopTagSuggester, TagSuggester};
use crate::store::DocumentStore;
use crate::types::errors::ProbeError;

pub struct App {
    pub settings_engine: SettingsEngine,
    pub bookmarks: BookmarkManager,
    pub tag_suggester: Box<dyn TagSuggester + Send>,
}

impl App {
    /// Loads settings from `config_path` (platform default when `None`) and
    /// opens the bookmark document they point at.
    ///
    /// An unreadable settings file falls back to defaults.
    pub fn new(config_path: Option<String>) -> Self {
        let mut settings_engine = SettingsEngine::new(config_path);
        if let Err(e) = settings_engine.load() {
            tracing::warn!(
                path = settings_engine.get_config_path(),
                error = %e,
                "settings unreadable, using defaults"
            );
        }
        let store = DocumentStore::from_settings(&settings_engine.get_settings().storage);
        Self::with_store(settings_engine, store)
    }

    /// Builds an app around an explicit document store.
    pub fn with_store(settings_engine: SettingsEngine, store: DocumentStore) -> Self {
        tracing::info!(document = %store.path().display(), "bookmark store opened");
        Self {
            settings_engine,
            bookmarks: BookmarkManager::new(store),
            tag_suggester: Box::new(NoopTagSuggester),
        }
    }

    pub fn set_tag_suggester(&mut self, suggester: Box<dyn TagSuggester + Send>) {
        self.tag_suggester = suggester;
    }

    /// A prober configured from the current link-check settings.
    pub fn link_checker(&self) -> Result<LinkChecker, ProbeError> {
        LinkChecker::new(&self.settings_engine.get_settings().link_check)
    }
}
