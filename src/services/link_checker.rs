//! Dead-link prober.
//!
//! Issues one HTTP probe per bookmark with bounded concurrency and a
//! per-probe timeout. Every outcome is classified on its own; nothing a
//! single probe does can fail the whole check.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use reqwest::StatusCode;

use crate::engine::tree_ops;
use crate::types::bookmark::BookmarkItem;
use crate::types::errors::ProbeError;
use crate::types::link_check::{LinkReport, LinkStatus};
use crate::types::settings::LinkCheckSettings;

pub struct LinkChecker {
    client: reqwest::Client,
    concurrency: usize,
    timeout: Duration,
}

impl LinkChecker {
    pub fn new(settings: &LinkCheckSettings) -> Result<Self, ProbeError> {
        let timeout = Duration::from_secs(settings.timeout_secs.max(1));
        let mut builder = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5));
        if !settings.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ProbeError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            concurrency: settings.concurrency.max(1),
            timeout,
        })
    }

    /// Probes every bookmark in `tree` and flags folders holding dead links.
    ///
    /// Folder flags are computed only after all probes have settled.
    pub async fn check_tree(&self, tree: &[BookmarkItem]) -> LinkReport {
        let mut targets = Vec::new();
        tree_ops::walk(tree, &mut |item| {
            if let BookmarkItem::Bookmark(bookmark) = item {
                targets.push((bookmark.id.clone(), bookmark.url.clone()));
            }
        });
        tracing::info!(links = targets.len(), concurrency = self.concurrency, "checking links");

        let statuses: HashMap<String, LinkStatus> = stream::iter(targets)
            .map(|(id, url)| async move {
                let status = self.probe(&url).await;
                if status.is_dead() {
                    tracing::debug!(%url, ?status, "dead link");
                }
                (id, status)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let flagged_folders = flag_folders(tree, &statuses);
        let report = LinkReport {
            statuses,
            flagged_folders,
        };
        tracing::info!(dead = report.dead_count(), "link check finished");
        report
    }

    /// Probes a single URL. HEAD first, GET when the server refuses HEAD.
    pub async fn probe(&self, url: &str) -> LinkStatus {
        match tokio::time::timeout(self.timeout, self.request(url)).await {
            Ok(status) => status,
            Err(_) => LinkStatus::Timeout,
        }
    }

    async fn request(&self, url: &str) -> LinkStatus {
        match self.client.head(url).send().await {
            Ok(resp)
                if resp.status() == StatusCode::METHOD_NOT_ALLOWED
                    || resp.status() == StatusCode::NOT_IMPLEMENTED =>
            {
                match self.client.get(url).send().await {
                    Ok(resp) => classify_status(resp.status()),
                    Err(e) => classify_error(&e),
                }
            }
            Ok(resp) => classify_status(resp.status()),
            Err(e) => classify_error(&e),
        }
    }
}

fn classify_status(status: StatusCode) -> LinkStatus {
    if status.as_u16() < 400 {
        LinkStatus::Reachable
    } else {
        LinkStatus::HttpError(status.as_u16())
    }
}

fn classify_error(err: &reqwest::Error) -> LinkStatus {
    if err.is_timeout() {
        return LinkStatus::Timeout;
    }
    if is_dns_failure(err) {
        return LinkStatus::DnsFailure;
    }
    tracing::debug!(error = %err, "probe failed without a link verdict");
    LinkStatus::Unknown
}

fn is_dns_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let msg = e.to_string().to_lowercase();
        if msg.contains("dns")
            || msg.contains("failed to lookup address")
            || msg.contains("name or service not known")
            || msg.contains("no such host")
        {
            return true;
        }
        current = e.source();
    }
    false
}

/// Ids of folders with at least one dead bookmark anywhere beneath them.
pub fn flag_folders(tree: &[BookmarkItem], statuses: &HashMap<String, LinkStatus>) -> HashSet<String> {
    let mut flagged = HashSet::new();
    mark_dead(tree, statuses, &mut flagged);
    flagged
}

fn mark_dead(
    items: &[BookmarkItem],
    statuses: &HashMap<String, LinkStatus>,
    flagged: &mut HashSet<String>,
) -> bool {
    let mut any_dead = false;
    for item in items {
        let dead = match item {
            BookmarkItem::Bookmark(b) => statuses.get(&b.id).map(|s| s.is_dead()).unwrap_or(false),
            BookmarkItem::Folder(f) => {
                let dead = mark_dead(&f.children, statuses, flagged);
                if dead {
                    flagged.insert(f.id.clone());
                }
                dead
            }
        };
        any_dead |= dead;
    }
    any_dead
}
