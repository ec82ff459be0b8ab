//! One-time fix-ups applied to the raw JSON document before it is decoded.
//!
//! Documents written by older versions may lack `createdAt` on some nodes.
//! Such nodes receive the Unix epoch so that typed decoding succeeds; the
//! caller persists the repaired document right away.

use serde_json::Value;

/// Timestamp given to nodes that were saved without one.
pub const EPOCH_TIMESTAMP: &str = "1970-01-01T00:00:00Z";

/// Runs every fix-up over the document. Returns the number of nodes changed.
pub fn run_all(doc: &mut Value) -> usize {
    let mut fixed = 0;
    if let Value::Array(items) = doc {
        for item in items.iter_mut() {
            backfill_created_at(item, &mut fixed);
        }
    }
    fixed
}

fn backfill_created_at(node: &mut Value, fixed: &mut usize) {
    let Value::Object(map) = node else {
        return;
    };

    let missing = matches!(map.get("createdAt"), None | Some(Value::Null));
    if missing {
        map.insert("createdAt".to_string(), Value::String(EPOCH_TIMESTAMP.to_string()));
        *fixed += 1;
    }

    if let Some(Value::Array(children)) = map.get_mut("children") {
        for child in children.iter_mut() {
            backfill_created_at(child, fixed);
        }
    }
}
