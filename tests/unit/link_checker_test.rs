//! Unit tests for the dead-link prober against throwaway local HTTP servers.

use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use treemarks::services::link_checker::LinkChecker;
use treemarks::types::bookmark::{Bookmark, BookmarkItem, Folder};
use treemarks::types::link_check::LinkStatus;
use treemarks::types::settings::LinkCheckSettings;

fn checker() -> LinkChecker {
    LinkChecker::new(&LinkCheckSettings {
        concurrency: 4,
        timeout_secs: 1,
        user_agent: "treemarks-test".to_string(),
        use_system_proxy: false,
    })
    .unwrap()
}

fn response(status: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status
    )
}

/// Serves every connection with a reply chosen from the request's method.
async fn serve(head: &'static str, get: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 2048];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let status = if request.starts_with("HEAD") { head } else { get };
                let _ = socket.write_all(response(status).as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{}/", addr)
}

/// Accepts connections and never answers.
async fn serve_silent() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_reachable_on_success() {
    let url = serve("200 OK", "200 OK").await;
    assert_eq!(checker().probe(&url).await, LinkStatus::Reachable);
}

#[tokio::test]
async fn test_http_error_carries_status_code() {
    let url = serve("404 Not Found", "404 Not Found").await;
    assert_eq!(checker().probe(&url).await, LinkStatus::HttpError(404));
}

#[tokio::test]
async fn test_head_rejected_falls_back_to_get() {
    let url = serve("405 Method Not Allowed", "200 OK").await;
    assert_eq!(checker().probe(&url).await, LinkStatus::Reachable);
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let url = serve_silent().await;
    let started = Instant::now();
    assert_eq!(checker().probe(&url).await, LinkStatus::Timeout);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_refused_connection_is_unknown() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let status = checker().probe(&format!("http://{}/", addr)).await;
    assert_eq!(status, LinkStatus::Unknown);
    assert!(!status.is_dead());
}

#[tokio::test]
async fn test_unsupported_scheme_is_unknown() {
    assert_eq!(checker().probe("ftp://files.example/").await, LinkStatus::Unknown);
}

#[tokio::test]
async fn test_check_tree_reports_every_bookmark_and_flags_ancestors() {
    let ok = serve("200 OK", "200 OK").await;
    let gone = serve("410 Gone", "410 Gone").await;

    let mut alive = Bookmark::new("Alive", &ok);
    alive.id = "alive".to_string();
    let mut dead = Bookmark::new("Dead", &gone);
    dead.id = "dead".to_string();
    let mut inner = Folder::new("Inner").with_children(vec![dead.into()]);
    inner.id = "inner".to_string();
    let mut outer = Folder::new("Outer").with_children(vec![inner.into()]);
    outer.id = "outer".to_string();
    let mut clean = Folder::new("Clean").with_children(vec![alive.into()]);
    clean.id = "clean".to_string();

    let tree: Vec<BookmarkItem> = vec![outer.into(), clean.into()];
    let report = checker().check_tree(&tree).await;

    assert_eq!(report.statuses.len(), 2);
    assert_eq!(report.statuses["alive"], LinkStatus::Reachable);
    assert_eq!(report.statuses["dead"], LinkStatus::HttpError(410));
    assert_eq!(report.dead_count(), 1);
    assert!(report.flagged_folders.contains("inner"));
    assert!(report.flagged_folders.contains("outer"));
    assert!(!report.flagged_folders.contains("clean"));
}

#[tokio::test]
async fn test_check_tree_on_empty_tree() {
    let report = checker().check_tree(&[]).await;
    assert!(report.statuses.is_empty());
    assert!(report.flagged_folders.is_empty());
}
