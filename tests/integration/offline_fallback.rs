//! Integration tests for offline behavior: the client keeps working from
//! its cached snapshot when the task service is unreachable.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mytasks::state::AppState;
use mytasks::sync::{FileCache, HttpTaskApi, RefreshSource, SyncLayer, TaskCache};
use mytasks_proto::{Priority, Task, TaskId};
use mytasks_server::api::start_local;
use mytasks_server::store::MemoryTaskStore;
use url::Url;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// An address nothing is listening on.
fn dead_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

fn sync_layer(addr: SocketAddr, cache: FileCache) -> SyncLayer<HttpTaskApi, FileCache> {
    let url = Url::parse(&format!("http://{addr}/tasks")).unwrap();
    let api = HttpTaskApi::new(&url, Duration::from_secs(2)).unwrap();
    SyncLayer::new(api, cache)
}

fn task(title: &str, priority: Priority) -> Task {
    let now = Utc::now();
    Task {
        id: TaskId::new(),
        title: title.to_string(),
        priority,
        completed: false,
        created_at: now,
        updated_at: now,
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_service_shows_cached_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::in_dir(dir.path());
    let cached = vec![task("cached one", Priority::High), task("cached two", Priority::Low)];
    cache.store(&cached).await.unwrap();

    let sync = sync_layer(dead_addr(), cache);
    let mut state = AppState::new();

    assert_eq!(sync.refresh(&mut state).await, RefreshSource::Cache);
    assert_eq!(state.tasks, cached);
}

#[tokio::test]
async fn unreachable_service_without_cache_leaves_list_empty() {
    let dir = tempfile::tempdir().unwrap();
    let sync = sync_layer(dead_addr(), FileCache::in_dir(dir.path()));
    let mut state = AppState::new();

    assert_eq!(sync.refresh(&mut state).await, RefreshSource::Unchanged);
    assert!(state.tasks.is_empty());
}

#[tokio::test]
async fn added_task_survives_losing_the_service() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryTaskStore::new());
    let (addr, handle) = start_local(store).await.unwrap();

    let created = {
        let sync = sync_layer(addr, FileCache::in_dir(dir.path()));
        let mut state = AppState::new();
        sync.add(&mut state, "Buy milk", Priority::Medium)
            .await
            .unwrap()
    };

    // Take the service down and wait for the listener to close.
    handle.abort();
    let _ = handle.await;

    // A new session over the same cache file.
    let sync = sync_layer(addr, FileCache::in_dir(dir.path()));
    let mut state = AppState::new();
    assert_eq!(sync.refresh(&mut state).await, RefreshSource::Cache);
    assert_eq!(state.tasks, vec![created]);
}

#[tokio::test]
async fn mutations_offline_fail_and_change_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::in_dir(dir.path());
    let cached = vec![task("cached", Priority::Medium)];
    cache.store(&cached).await.unwrap();

    let sync = sync_layer(dead_addr(), cache);
    let mut state = AppState::new();
    sync.refresh(&mut state).await;
    let id = cached[0].id;

    assert!(sync.add(&mut state, "new", Priority::Low).await.unwrap_err().is_offline());
    assert!(sync.toggle(&mut state, id).await.unwrap_err().is_offline());
    assert!(sync.remove(&mut state, id).await.unwrap_err().is_offline());

    state.begin_edit(id);
    let mut edited = cached[0].clone();
    edited.title = "renamed".into();
    assert!(sync.edit(&mut state, &edited).await.unwrap_err().is_offline());
    assert!(state.editing.is_none());

    assert_eq!(state.tasks, cached);
    let snapshot = sync.cache().load().await.unwrap().unwrap();
    assert_eq!(mytasks_proto::codec::decode_snapshot(&snapshot).unwrap(), cached);
}

#[tokio::test]
async fn empty_service_falls_back_to_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::in_dir(dir.path());
    let cached = vec![task("left over", Priority::High)];
    cache.store(&cached).await.unwrap();

    let store = Arc::new(MemoryTaskStore::new());
    let (addr, handle) = start_local(store).await.unwrap();

    let sync = sync_layer(addr, cache);
    let mut state = AppState::new();
    assert_eq!(sync.refresh(&mut state).await, RefreshSource::Cache);
    assert_eq!(state.tasks, cached);

    handle.abort();
}
