use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Outcome of probing a single bookmark URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum LinkStatus {
    Reachable,
    Timeout,
    DnsFailure,
    HttpError(u16),
    /// The probe failed for a reason that says nothing about the link.
    Unknown,
}

impl LinkStatus {
    /// Whether this outcome marks the bookmark (and its ancestors) as dead.
    pub fn is_dead(&self) -> bool {
        matches!(
            self,
            LinkStatus::Timeout | LinkStatus::DnsFailure | LinkStatus::HttpError(_)
        )
    }
}

/// Results of a dead-link check over a tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkReport {
    /// Status per bookmark id.
    pub statuses: HashMap<String, LinkStatus>,
    /// Folder ids containing at least one dead bookmark at any depth.
    pub flagged_folders: HashSet<String>,
}

impl LinkReport {
    pub fn dead_count(&self) -> usize {
        self.statuses.values().filter(|s| s.is_dead()).count()
    }
}
