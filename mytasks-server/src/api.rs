//! Task service HTTP layer: router, handlers, and server startup.
//!
//! Handlers are stateless. Each one validates the request shape, runs
//! exactly one [`TaskStore`] operation, and maps the outcome to a status
//! code. Failures are logged here with the operation name and task id; the
//! client only ever sees an `{"error": ...}` body.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use mytasks_proto::api::{
    ALL_TASKS, BASE_PATH, CREATE_TASK, CreateTaskRequest, DELETE_TASK, DELETED_MESSAGE,
    MessageBody, TOGGLE_TASK, UPDATE_TASK, UpdateTaskRequest,
};
use mytasks_proto::{Task, TaskId, ValidationError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, Operation, StoreError};
use crate::store::TaskStore;

/// Default maximum request body size in bytes (64 KB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024;

/// Plain-text body served at `/`.
pub const BANNER: &str = "My Tasks API is running";

/// Builds the full application router over a store.
pub fn router<S: TaskStore + 'static>(store: Arc<S>, max_body_size: usize) -> Router {
    let tasks = Router::new()
        .route(ALL_TASKS, get(list_tasks::<S>))
        .route(CREATE_TASK, post(create_task::<S>))
        .route(&format!("{UPDATE_TASK}/{{id}}"), patch(update_task::<S>))
        .route(&format!("{TOGGLE_TASK}/{{id}}"), put(toggle_task::<S>))
        .route(&format!("{DELETE_TASK}/{{id}}"), delete(delete_task::<S>));

    Router::new()
        .route("/", get(banner))
        .nest(BASE_PATH, tasks)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Starts the task service on `addr`.
///
/// Returns the bound address (useful with port `0`) and the server task.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server<S: TaskStore + 'static>(
    addr: &str,
    store: Arc<S>,
    max_body_size: usize,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(store, max_body_size);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task service error");
        }
    });

    Ok((bound_addr, handle))
}

/// Starts the task service on an OS-assigned loopback port with the
/// default body limit.
///
/// # Errors
///
/// Returns an error if no loopback port can be bound.
pub async fn start_local<S: TaskStore + 'static>(
    store: Arc<S>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server("127.0.0.1:0", store, DEFAULT_MAX_BODY_SIZE).await
}

async fn banner() -> &'static str {
    BANNER
}

/// `GET /tasks/allTasks`
async fn list_tasks<S: TaskStore>(
    State(store): State<Arc<S>>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let op = Operation::List;
    match store.list().await {
        Ok(tasks) => {
            tracing::debug!(op = %op, count = tasks.len(), "listed tasks");
            Ok(Json(tasks))
        }
        Err(e) => {
            tracing::error!(op = %op, error = %e, "store failure");
            Err(ApiError::from_store(op, e))
        }
    }
}

/// `POST /tasks/createTask`
async fn create_task<S: TaskStore>(
    State(store): State<Arc<S>>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let op = Operation::Create;
    let new_task = parse_body(op, None, body)?
        .validate()
        .map_err(|e| rejected(op, None, e))?;

    match store.create(new_task).await {
        Ok(task) => {
            tracing::info!(op = %op, task_id = %task.id, priority = %task.priority, "task created");
            Ok((StatusCode::CREATED, Json(task)))
        }
        Err(e) => Err(store_failure(op, None, e)),
    }
}

/// `PATCH /tasks/updateTask/{id}`
async fn update_task<S: TaskStore>(
    State(store): State<Arc<S>>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let op = Operation::Update;
    let id = parse_id(op, &raw_id)?;
    let patch = parse_body(op, Some(id), body)?
        .validate()
        .map_err(|e| rejected(op, Some(id), e))?;

    match store.update(id, patch).await {
        Ok(task) => {
            tracing::info!(op = %op, task_id = %id, "task updated");
            Ok(Json(task))
        }
        Err(e) => Err(store_failure(op, Some(id), e)),
    }
}

/// `PUT /tasks/toggle/{id}`
async fn toggle_task<S: TaskStore>(
    State(store): State<Arc<S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let op = Operation::Toggle;
    let id = parse_id(op, &raw_id)?;

    match store.toggle_completed(id).await {
        Ok(task) => {
            tracing::info!(op = %op, task_id = %id, completed = task.completed, "task toggled");
            Ok(Json(task))
        }
        Err(e) => Err(store_failure(op, Some(id), e)),
    }
}

/// `DELETE /tasks/deleteTasks/{id}`
async fn delete_task<S: TaskStore>(
    State(store): State<Arc<S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let op = Operation::Delete;
    let id = parse_id(op, &raw_id)?;

    match store.delete(id).await {
        Ok(()) => {
            tracing::info!(op = %op, task_id = %id, "task deleted");
            Ok(Json(MessageBody {
                message: DELETED_MESSAGE.to_string(),
            }))
        }
        Err(e) => Err(store_failure(op, Some(id), e)),
    }
}

/// Parses a path id. Anything that is not a task id cannot name a task,
/// so it is reported as not found.
fn parse_id(op: Operation, raw: &str) -> Result<TaskId, ApiError> {
    raw.parse().map_err(|_| {
        tracing::warn!(op = %op, raw_id = %raw, "unparseable task id");
        ApiError::NotFound
    })
}

/// Unwraps a JSON body, turning extractor rejections into 400s.
fn parse_body<T>(
    op: Operation,
    id: Option<TaskId>,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        rejected(
            op,
            id,
            ValidationError::MalformedBody(rejection.body_text()),
        )
    })
}

fn rejected(op: Operation, id: Option<TaskId>, err: ValidationError) -> ApiError {
    match id {
        Some(id) => tracing::warn!(op = %op, task_id = %id, error = %err, "invalid request"),
        None => tracing::warn!(op = %op, error = %err, "invalid request"),
    }
    ApiError::Validation(err)
}

fn store_failure(op: Operation, id: Option<TaskId>, err: StoreError) -> ApiError {
    match (id, matches!(err, StoreError::Storage(_))) {
        (Some(id), true) => {
            tracing::error!(op = %op, task_id = %id, error = %err, "store failure");
        }
        (None, true) => tracing::error!(op = %op, error = %err, "store failure"),
        (Some(id), false) => {
            tracing::warn!(op = %op, task_id = %id, error = %err, "request failed");
        }
        (None, false) => tracing::warn!(op = %op, error = %err, "request failed"),
    }
    ApiError::from_store(op, err)
}
