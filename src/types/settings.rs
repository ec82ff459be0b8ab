use serde::{Deserialize, Serialize};

use crate::platform;

/// Top-level settings container.
///
/// Missing sections and fields take their default values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct TreemarksSettings {
    pub storage: StorageSettings,
    pub link_check: LinkCheckSettings,
}

/// Where the bookmark document and its snapshots live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    pub data_file: String,
    pub backup_dir: String,
    /// Number of snapshots to keep; `None` keeps every snapshot.
    pub backup_retention: Option<usize>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let data_dir = platform::get_data_dir();
        Self {
            data_file: data_dir.join("bookmarks.json").to_string_lossy().to_string(),
            backup_dir: data_dir.join("backups").to_string_lossy().to_string(),
            backup_retention: None,
        }
    }
}

/// Dead-link prober tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinkCheckSettings {
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Route probes through the proxy configured in the environment.
    pub use_system_proxy: bool,
}

impl Default for LinkCheckSettings {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout_secs: 10,
            user_agent: format!("treemarks/{}", env!("CARGO_PKG_VERSION")),
            use_system_proxy: true,
        }
    }
}
