// Treemarks platform paths for Linux
// Config: ~/.config/treemarks
// Data:   ~/.local/share/treemarks

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Uses `$XDG_CONFIG_HOME/treemarks` if set, otherwise `~/.config/treemarks`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("treemarks"),
        _ => home_dir().join(".config").join("treemarks"),
    }
}

/// Uses `$XDG_DATA_HOME/treemarks` if set, otherwise `~/.local/share/treemarks`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("treemarks"),
        _ => home_dir().join(".local").join("share").join("treemarks"),
    }
}
