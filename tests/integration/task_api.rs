//! Integration tests for the task service HTTP contract.
//!
//! Starts a real server on an OS-assigned port and drives every endpoint
//! with `reqwest`, checking status codes and JSON bodies.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use mytasks_proto::api::{ErrorBody, MessageBody};
use mytasks_proto::{Priority, Task, TaskId};
use mytasks_server::api::{DEFAULT_MAX_BODY_SIZE, start_local, start_server};
use mytasks_server::store::{FileTaskStore, MemoryTaskStore};
use reqwest::StatusCode;
use serde_json::json;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Starts a server over a fresh in-memory store and returns its task base URL.
async fn spawn_server() -> (String, tokio::task::JoinHandle<()>) {
    let store = Arc::new(MemoryTaskStore::new());
    let (addr, handle) = start_local(store).await.expect("failed to start task service");
    (format!("http://{addr}/tasks"), handle)
}

async fn create(client: &reqwest::Client, base: &str, title: &str, priority: &str) -> Task {
    let resp = client
        .post(format!("{base}/createTask"))
        .json(&json!({ "title": title, "priority": priority }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

async fn list(client: &reqwest::Client, base: &str) -> Vec<Task> {
    let resp = client.get(format!("{base}/allTasks")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_buy_milk_scenario() {
    let (base, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let task = create(&client, &base, "Buy milk", "Medium").await;
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.priority, Priority::Medium);
    assert!(!task.completed);
    assert_eq!(task.created_at, task.updated_at);

    handle.abort();
}

#[tokio::test]
async fn create_empty_title_creates_nothing() {
    let (base, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/createTask"))
        .json(&json!({ "title": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorBody = resp.json().await.unwrap();
    assert!(!err.error.is_empty());
    assert!(list(&client, &base).await.is_empty());

    handle.abort();
}

#[tokio::test]
async fn full_lifecycle() {
    let (base, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let older = create(&client, &base, "older", "Low").await;
    let newer = create(&client, &base, "newer", "High").await;

    // Newest first.
    let tasks = list(&client, &base).await;
    assert_eq!(
        tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![newer.id, older.id]
    );

    // Partial update leaves other fields alone.
    let resp = client
        .patch(format!("{base}/updateTask/{}", older.id))
        .json(&json!({ "title": "older, renamed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let renamed: Task = resp.json().await.unwrap();
    assert_eq!(renamed.title, "older, renamed");
    assert_eq!(renamed.priority, Priority::Low);
    assert!(renamed.updated_at >= older.updated_at);

    // Toggle twice returns to the original flag.
    for expected in [true, false] {
        let resp = client
            .put(format!("{base}/toggle/{}", newer.id))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let toggled: Task = resp.json().await.unwrap();
        assert_eq!(toggled.completed, expected);
    }

    // Delete is permanent.
    let resp = client
        .delete(format!("{base}/deleteTasks/{}", newer.id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let msg: MessageBody = resp.json().await.unwrap();
    assert_eq!(msg.message, "Task deleted successfully");

    let resp = client
        .put(format!("{base}/toggle/{}", newer.id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let tasks = list(&client, &base).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, older.id);

    handle.abort();
}

#[tokio::test]
async fn update_unknown_id_is_404() {
    let (base, handle) = spawn_server().await;
    let client = reqwest::Client::new();
    let existing = create(&client, &base, "still here", "Low").await;

    let resp = client
        .patch(format!("{base}/updateTask/{}", TaskId::new()))
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.error, "Task not found");

    assert_eq!(list(&client, &base).await, vec![existing]);

    handle.abort();
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let (base, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .request(reqwest::Method::OPTIONS, format!("{base}/createTask"))
        .header("Origin", "http://localhost:8081")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("access-control-allow-origin"));

    handle.abort();
}

#[tokio::test]
async fn file_store_survives_server_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let client = reqwest::Client::new();

    let created = {
        let store = Arc::new(FileTaskStore::open(&path).await.unwrap());
        let (addr, handle) = start_server("127.0.0.1:0", store, DEFAULT_MAX_BODY_SIZE)
            .await
            .unwrap();
        let task = create(&client, &format!("http://{addr}/tasks"), "durable", "High").await;
        handle.abort();
        task
    };

    let store = Arc::new(FileTaskStore::open(&path).await.unwrap());
    let (addr, handle) = start_server("127.0.0.1:0", store, DEFAULT_MAX_BODY_SIZE)
        .await
        .unwrap();
    let tasks = list(&client, &format!("http://{addr}/tasks")).await;
    assert_eq!(tasks, vec![created]);

    handle.abort();
}
