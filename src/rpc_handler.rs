//! RPC method handler for the Treemarks JSON protocol.
//!
//! Kept apart from `rpc_server.rs` so dispatch can be unit-tested without
//! stdin/stdout. `handle_method` maps a method name and its params onto the
//! bookmark manager, the settings engine and the link checker.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::bookmark::{BookmarkItem, Tree};
use crate::types::errors::ProbeError;

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn ids_param(params: &Value) -> Result<Vec<String>, String> {
    let ids = params.get("ids").cloned().ok_or("missing ids")?;
    serde_json::from_value(ids).map_err(|e| format!("invalid ids: {}", e))
}

fn tree_param(params: &Value) -> Result<Tree, String> {
    let tree = params.get("tree").cloned().ok_or("missing tree")?;
    serde_json::from_value(tree).map_err(|e| format!("invalid tree: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch a method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Bookmarks ───
        "bookmarks.load" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let tree = a.bookmarks.load().map_err(|e| e.to_string())?;
            to_json(&tree)
        }
        "bookmarks.save" => {
            let item = params.get("item").cloned().ok_or("missing item")?;
            let item: BookmarkItem =
                serde_json::from_value(item).map_err(|e| format!("invalid item: {}", e))?;
            let parent = params.get("parentId").and_then(|v| v.as_str());
            let suggest = params.get("suggestTags").and_then(|v| v.as_bool()).unwrap_or(false);
            let a = app.lock().map_err(|e| e.to_string())?;
            let id = if suggest {
                a.bookmarks
                    .save_with_suggestions(item, parent, a.tag_suggester.as_ref())
            } else {
                a.bookmarks.save(item, parent)
            }
            .map_err(|e| e.to_string())?;
            Ok(json!({"id": id}))
        }
        "bookmarks.delete" => {
            let id = str_param(params, "id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            a.bookmarks.delete(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmarks.deleteMany" => {
            let ids = ids_param(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let removed = a.bookmarks.delete_many(&ids).map_err(|e| e.to_string())?;
            Ok(json!({"removed": removed}))
        }
        "bookmarks.toggleFavorite" => {
            let id = str_param(params, "id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let favorite = a.bookmarks.toggle_favorite(id).map_err(|e| e.to_string())?;
            Ok(json!({"isFavorite": favorite}))
        }
        "bookmarks.reorder" => {
            let id = str_param(params, "id")?;
            let new_index = params
                .get("newIndex")
                .and_then(|v| v.as_i64())
                .ok_or("missing newIndex")?;
            let parent = params.get("parentId").and_then(|v| v.as_str());
            let a = app.lock().map_err(|e| e.to_string())?;
            let index = a
                .bookmarks
                .reorder(id, new_index, parent)
                .map_err(|e| e.to_string())?;
            Ok(json!({"index": index}))
        }
        "bookmarks.backup" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let path = a.bookmarks.backup().map_err(|e| e.to_string())?;
            Ok(json!({"path": path.map(|p| p.to_string_lossy().to_string())}))
        }

        // ─── Import / export ───
        "import.parse" => {
            let text = str_param(params, "text")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(&a.bookmarks.parse_import_file(text))
        }
        "import.diff" => {
            let text = str_param(params, "text")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let diff = a.bookmarks.diff_for_merge(text).map_err(|e| e.to_string())?;
            to_json(&diff)
        }
        "import.applyMerge" => {
            let tree = tree_param(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let summary = a.bookmarks.apply_merge(&tree).map_err(|e| e.to_string())?;
            Ok(json!({
                "bookmarksAdded": summary.bookmarks_added,
                "foldersCreated": summary.folders_created,
            }))
        }
        "import.replaceAll" => {
            let tree = tree_param(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            a.bookmarks.replace_all(tree).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "export.all" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let html = a.bookmarks.export_all().map_err(|e| e.to_string())?;
            Ok(json!({"html": html}))
        }
        "export.selected" => {
            let ids = ids_param(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let html = a.bookmarks.export_selected(&ids).map_err(|e| e.to_string())?;
            Ok(json!({"html": html}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(a.settings_engine.get_settings())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            if key.starts_with("storage.") {
                let manager = BookmarkManager::from_settings(&a.settings_engine.get_settings().storage);
                a.bookmarks = manager;
                tracing::info!(key, "bookmark store reopened");
            }
            Ok(json!({"ok": true}))
        }

        // ─── Dead links ───
        "links.check" => {
            let (checker, tree) = {
                let a = app.lock().map_err(|e| e.to_string())?;
                let checker = a.link_checker().map_err(|e| e.to_string())?;
                let tree = a.bookmarks.load().map_err(|e| e.to_string())?;
                (checker, tree)
            };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| ProbeError::Runtime(e.to_string()).to_string())?;
            let report = runtime.block_on(checker.check_tree(&tree));
            to_json(&report)
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
