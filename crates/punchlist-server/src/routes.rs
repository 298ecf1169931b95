//! Task route handlers.
//!
//! Mutation responses wrap the resulting task in a `{task}` envelope;
//! `GET /tasks/{id}` returns the bare task. Handlers call the stateless
//! repository on a pooled connection and let [`ServerError`] translate
//! failures to status codes.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use punchlist_core::{
    Task, TaskCreate, TaskEnvelope, TaskListResponse, TaskStatus, TaskUpdate,
    UpdateChecklistRequest, UpdateStatusRequest,
};
use punchlist_store::{TaskFilter, TaskRepository};
use serde::Deserialize;

use crate::errors::ServerError;
use crate::health::{self, HealthResponse};
use crate::server::AppState;

/// Query parameters for `GET /tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only tasks in this status (`Pending`, `InProgress`, `Completed`).
    pub status: Option<TaskStatus>,
    /// Page size override.
    pub limit: Option<u32>,
    /// Page offset.
    pub offset: Option<u32>,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ServerError> {
    let conn = state.conn()?;
    let task_count = TaskRepository::count_tasks(&conn)?;
    Ok(Json(health::health_check(state.start_time, task_count)))
}

/// GET /tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TaskListResponse>, ServerError> {
    let conn = state.conn()?;
    let filter = TaskFilter {
        status: query.status,
    };
    let limit = query.limit.unwrap_or(state.config.default_page_size);
    let offset = query.offset.unwrap_or(0);
    let page = TaskRepository::list_tasks(&conn, &filter, limit, offset)?;
    Ok(Json(TaskListResponse {
        tasks: page.tasks,
        total: page.total,
    }))
}

/// POST /tasks
pub async fn create_task(
    State(state): State<AppState>,
    Json(body): Json<TaskCreate>,
) -> Result<(StatusCode, Json<TaskEnvelope>), ServerError> {
    let conn = state.conn()?;
    let task = TaskRepository::create_task(&conn, &body)?;
    tracing::info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(TaskEnvelope { task })))
}

/// GET /tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ServerError> {
    let conn = state.conn()?;
    let task = TaskRepository::get_task(&conn, &id)?.ok_or(ServerError::TaskNotFound)?;
    Ok(Json(task))
}

/// PUT /tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TaskUpdate>,
) -> Result<Json<TaskEnvelope>, ServerError> {
    let conn = state.conn()?;
    let task = TaskRepository::update_task(&conn, &id, &body)?.ok_or(ServerError::TaskNotFound)?;
    Ok(Json(TaskEnvelope { task }))
}

/// DELETE /tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let conn = state.conn()?;
    if !TaskRepository::delete_task(&conn, &id)? {
        return Err(ServerError::TaskNotFound);
    }
    tracing::info!(task_id = %id, "task deleted");
    Ok(Json(serde_json::json!({ "message": "Task deleted successfully" })))
}

/// PUT /tasks/{id}/status
///
/// Persists the requested status verbatim. The checklist is only
/// touched when the new status is `Completed`, in which case every item
/// is marked done so the stored checklist agrees with the status.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<TaskEnvelope>, ServerError> {
    let conn = state.conn()?;
    let task =
        TaskRepository::set_status(&conn, &id, body.status)?.ok_or(ServerError::TaskNotFound)?;
    Ok(Json(TaskEnvelope { task }))
}

/// PUT /tasks/{id}/todo
///
/// Replaces the checklist wholesale and bumps `updatedAt`. Status is
/// never touched here: clients follow up with a status write when the
/// derived status changed, and a task whose second write never arrives
/// keeps the new checklist.
pub async fn update_checklist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateChecklistRequest>,
) -> Result<Json<TaskEnvelope>, ServerError> {
    let conn = state.conn()?;
    let task = TaskRepository::replace_checklist(&conn, &id, &body.todo_checklist)?
        .ok_or(ServerError::TaskNotFound)?;
    Ok(Json(TaskEnvelope { task }))
}
