// Treemarks platform abstraction
// Resolves where settings and the bookmark document live on Windows, macOS, and Linux.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Overrides the platform data directory when set.
pub const DATA_DIR_ENV: &str = "TREEMARKS_DATA_DIR";

/// Returns the platform-specific configuration directory for Treemarks.
///
/// - **Linux**: `~/.config/treemarks` (or `$XDG_CONFIG_HOME/treemarks`)
/// - **macOS**: `~/Library/Application Support/Treemarks`
/// - **Windows**: `%APPDATA%/Treemarks`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the directory holding `bookmarks.json` and its backups.
///
/// `$TREEMARKS_DATA_DIR` wins when set; otherwise:
/// - **Linux**: `~/.local/share/treemarks` (or `$XDG_DATA_HOME/treemarks`)
/// - **macOS**: `~/Library/Application Support/Treemarks`
/// - **Windows**: `%APPDATA%/Treemarks`
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
