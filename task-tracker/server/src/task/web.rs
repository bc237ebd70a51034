use crate::task::{TaskCreate, TaskRead, TaskService, TaskUpdate};
use crate::web::error::{ApiError, ErrorDetail};
use crate::web::extract::{ApiJson, ApiPath, ApiQuery};
use crate::web::session::Session;
use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

impl TaskState {
    async fn session(&self) -> Result<Session, ApiError> {
        Ok(Session::begin(&self.db).await?)
    }
}

/// Narrows a path id to the storage key. Ids outside the key range cannot
/// name a stored task.
fn task_key(task_id: i64) -> Result<i32, ApiError> {
    i32::try_from(task_id).map_err(|_| ApiError::NotFound)
}

/// Query parameters for listing tasks.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    /// Number of tasks to skip
    #[serde(default)]
    skip: u64,
    /// Maximum number of tasks to return
    #[serde(default = "default_limit")]
    limit: u64,
}

fn default_limit() -> u64 {
    100
}

/// Handler for POST /tasks/ - Creates a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/tasks/",
    request_body = TaskCreate,
    responses(
        (status = 200, description = "Task created", body = TaskRead),
        (status = 422, description = "Invalid task payload", body = ErrorDetail)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<TaskState>,
    ApiJson(payload): ApiJson<TaskCreate>,
) -> Result<Json<TaskRead>, ApiError> {
    let session = state.session().await?;
    let task = TaskService::new(session.connection())
        .create_task(payload)
        .await?;
    session.commit().await?;
    Ok(Json(task.into()))
}

/// Handler for GET /tasks/ - Lists tasks in insertion order.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks/",
    params(ListTasksQuery),
    responses(
        (status = 200, description = "Tasks in insertion order", body = [TaskRead]),
        (status = 400, description = "Invalid query string", body = ErrorDetail)
    ),
    tag = "Tasks"
)]
pub async fn list_tasks_handler(
    State(state): State<TaskState>,
    ApiQuery(query): ApiQuery<ListTasksQuery>,
) -> Result<Json<Vec<TaskRead>>, ApiError> {
    let session = state.session().await?;
    let tasks = TaskService::new(session.connection())
        .list_tasks(query.skip, query.limit)
        .await?;
    session.commit().await?;
    Ok(Json(tasks.into_iter().map(TaskRead::from).collect()))
}

/// Handler for GET /tasks/{task_id} - Fetches one task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks/{task_id}",
    params(("task_id" = i64, Path, description = "ID of the task")),
    responses(
        (status = 200, description = "The task", body = TaskRead),
        (status = 404, description = "Task not found", body = ErrorDetail)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<TaskState>,
    ApiPath(task_id): ApiPath<i64>,
) -> Result<Json<TaskRead>, ApiError> {
    let task_id = task_key(task_id)?;
    let session = state.session().await?;
    let task = TaskService::new(session.connection())
        .get_task(task_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    session.commit().await?;
    Ok(Json(task.into()))
}

/// Handler for PUT /tasks/{task_id} - Applies a partial update.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/tasks/{task_id}",
    params(("task_id" = i64, Path, description = "ID of the task")),
    request_body = TaskUpdate,
    responses(
        (status = 200, description = "The updated task", body = TaskRead),
        (status = 404, description = "Task not found", body = ErrorDetail),
        (status = 422, description = "Invalid update payload", body = ErrorDetail)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<TaskState>,
    ApiPath(task_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<TaskUpdate>,
) -> Result<Json<TaskRead>, ApiError> {
    let task_id = task_key(task_id)?;
    let session = state.session().await?;
    let task = TaskService::new(session.connection())
        .update_task(task_id, payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    session.commit().await?;
    Ok(Json(task.into()))
}

/// Handler for DELETE /tasks/{task_id} - Deletes a task and returns it.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/tasks/{task_id}",
    params(("task_id" = i64, Path, description = "ID of the task")),
    responses(
        (status = 200, description = "The deleted task", body = TaskRead),
        (status = 404, description = "Task not found", body = ErrorDetail)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<TaskState>,
    ApiPath(task_id): ApiPath<i64>,
) -> Result<Json<TaskRead>, ApiError> {
    let task_id = task_key(task_id)?;
    let session = state.session().await?;
    let task = TaskService::new(session.connection())
        .delete_task(task_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    session.commit().await?;
    Ok(Json(task.into()))
}

/// Creates and returns the tasks router.
pub fn create_task_router(state: TaskState) -> Router {
    Router::new()
        .route("/tasks/", get(list_tasks_handler).post(create_task_handler))
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{task_id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(state)
}
