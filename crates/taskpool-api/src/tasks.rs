// Task CRUD HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use taskpool_core::{NewTask, Task, TaskQueue, TaskStore};

use crate::common::ListResponse;
use crate::services::{TaskService, TaskServiceError};
use crate::validation::{validate_description, validate_title};

/// App state for task routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TaskService>,
}

impl AppState {
    pub fn new(store: Arc<dyn TaskStore>, queue: TaskQueue) -> Self {
        Self {
            service: Arc::new(TaskService::new(store, queue)),
        }
    }
}

/// Create task routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/tasks", post(create_task).get(list_tasks))
        .route("/v1/tasks/:task_id", get(get_task))
        .with_state(state)
}

/// Request to create a task
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    /// Task title (non-empty, max 200 bytes)
    #[schema(example = "Test Task")]
    pub title: String,
    /// Task description (non-empty, max 2000 bytes)
    #[schema(example = "Test Description")]
    pub description: String,
}

/// Public task representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// One of "pending", "completed", "failed"
    #[schema(example = "pending")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status.to_string(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// POST /v1/tasks - Create a new task and schedule it for execution
#[utoipa::path(
    post,
    path = "/v1/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created and queued", body = TaskResponse),
        (status = 400, description = "Invalid title or description"),
        (status = 503, description = "Service is shutting down"),
        (status = 500, description = "Internal server error")
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), StatusCode> {
    validate_title(&req.title)?;
    validate_description(&req.description)?;

    let input = NewTask {
        title: req.title,
        description: req.description,
    };

    let task = state.service.create(input).await.map_err(|e| match e {
        TaskServiceError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
        e => {
            tracing::error!("Failed to create task: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    })?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// GET /v1/tasks - List all tasks
#[utoipa::path(
    get,
    path = "/v1/tasks",
    responses(
        (status = 200, description = "List of tasks", body = ListResponse<TaskResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "tasks"
)]
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<TaskResponse>>, StatusCode> {
    let tasks = state.service.list().await.map_err(|e| {
        tracing::error!("Failed to list tasks: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ListResponse::new(
        tasks.into_iter().map(TaskResponse::from).collect(),
    )))
}

/// GET /v1/tasks/{task_id} - Get a task by id
#[utoipa::path(
    get,
    path = "/v1/tasks/{task_id}",
    params(
        ("task_id" = Uuid, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "tasks"
)]
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskResponse>, StatusCode> {
    let task = state.service.get(task_id).await.map_err(|e| match e {
        TaskServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        e => {
            tracing::error!("Failed to get task: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    })?;

    Ok(Json(task.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use taskpool_storage::MemoryTaskStore;
    use tower::ServiceExt;

    fn test_app(queue: &TaskQueue) -> Router {
        let store = Arc::new(MemoryTaskStore::new());
        routes(AppState::new(store, queue.clone()))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_returns_created_with_pending_status() {
        let queue = TaskQueue::bounded(4);
        let app = test_app(&queue);

        let response = app
            .oneshot(post_json(
                "/v1/tasks",
                r#"{"title":"Test Task","description":"Test Description"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let task: TaskResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.status, "pending");

        // The created task was handed to the queue.
        assert_eq!(queue.dequeue().await.unwrap().id, task.id);
    }

    #[tokio::test]
    async fn create_rejects_invalid_input() {
        let queue = TaskQueue::bounded(4);
        let app = test_app(&queue);

        let response = app
            .clone()
            .oneshot(post_json(
                "/v1/tasks",
                r#"{"title":"","description":"Test Description"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let oversized = format!(
            r#"{{"title":"t","description":"{}"}}"#,
            "x".repeat(crate::validation::MAX_DESCRIPTION_BYTES + 1)
        );
        let response = app.oneshot(post_json("/v1/tasks", &oversized)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_during_shutdown_returns_service_unavailable() {
        let queue = TaskQueue::bounded(4);
        let app = test_app(&queue);
        queue.close();

        let response = app
            .oneshot(post_json(
                "/v1/tasks",
                r#"{"title":"late","description":"d"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn get_unknown_task_returns_not_found() {
        let queue = TaskQueue::bounded(4);
        let app = test_app(&queue);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/tasks/{}", Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_wraps_tasks_in_data() {
        let queue = TaskQueue::bounded(4);
        let app = test_app(&queue);

        app.clone()
            .oneshot(post_json(
                "/v1/tasks",
                r#"{"title":"a","description":"d"}"#,
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/tasks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let list: ListResponse<TaskResponse> = serde_json::from_slice(&body).unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].title, "a");
    }
}
