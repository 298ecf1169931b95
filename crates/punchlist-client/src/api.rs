//! Typed wrapper over the task API.
//!
//! One method per route. Mutation responses arrive as a `{task}`
//! envelope; a success response whose envelope lacks the task maps to
//! [`ApiError::MissingTask`] so callers can treat it as a failed write.

use punchlist_core::{
    ChecklistItem, ErrorBody, Task, TaskCreate, TaskListResponse, TaskStatus,
    UpdateChecklistRequest, UpdateStatusRequest,
};
use serde::Deserialize;

use crate::errors::{ApiError, Result};

/// Envelope for mutation responses. The task is optional so a missing
/// payload surfaces as [`ApiError::MissingTask`] instead of a decode
/// error.
#[derive(Debug, Deserialize)]
struct TaskPayload {
    task: Option<Task>,
}

/// HTTP client for the task server.
#[derive(Debug, Clone)]
pub struct TasksApi {
    client: reqwest::Client,
    base_url: String,
}

impl TasksApi {
    /// Create a client for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            let _ = base_url.pop();
        }
        Self { client, base_url }
    }

    /// The server this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch one task.
    #[tracing::instrument(skip_all)]
    pub async fn get_task(&self, id: &str) -> Result<Task> {
        let resp = self
            .client
            .get(self.url(&format!("/tasks/{id}")))
            .send()
            .await?;
        if resp.status().as_u16() != 200 {
            return Err(error_for(resp).await);
        }
        Ok(serde_json::from_str(&resp.text().await?)?)
    }

    /// List tasks, optionally filtered by status.
    #[tracing::instrument(skip_all)]
    pub async fn list_tasks(&self, status: Option<TaskStatus>) -> Result<TaskListResponse> {
        let mut request = self.client.get(self.url("/tasks"));
        if let Some(status) = status {
            request = request.query(&[("status", status)]);
        }
        let resp = request.send().await?;
        if resp.status().as_u16() != 200 {
            return Err(error_for(resp).await);
        }
        Ok(serde_json::from_str(&resp.text().await?)?)
    }

    /// Create a task.
    #[tracing::instrument(skip_all)]
    pub async fn create_task(&self, params: &TaskCreate) -> Result<Task> {
        let resp = self
            .client
            .post(self.url("/tasks"))
            .json(params)
            .send()
            .await?;
        if resp.status().as_u16() != 201 {
            return Err(error_for(resp).await);
        }
        unwrap_task(resp).await
    }

    /// Delete a task.
    #[tracing::instrument(skip_all)]
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.url(&format!("/tasks/{id}")))
            .send()
            .await?;
        if resp.status().as_u16() != 200 {
            return Err(error_for(resp).await);
        }
        Ok(())
    }

    /// Replace a task's checklist wholesale.
    #[tracing::instrument(skip_all)]
    pub async fn update_checklist(&self, id: &str, items: &[ChecklistItem]) -> Result<Task> {
        let body = UpdateChecklistRequest {
            todo_checklist: items.to_vec(),
        };
        let resp = self
            .client
            .put(self.url(&format!("/tasks/{id}/todo")))
            .json(&body)
            .send()
            .await?;
        if resp.status().as_u16() != 200 {
            return Err(error_for(resp).await);
        }
        unwrap_task(resp).await
    }

    /// Set a task's status.
    #[tracing::instrument(skip_all)]
    pub async fn update_status(&self, id: &str, status: TaskStatus) -> Result<Task> {
        let body = UpdateStatusRequest { status };
        let resp = self
            .client
            .put(self.url(&format!("/tasks/{id}/status")))
            .json(&body)
            .send()
            .await?;
        if resp.status().as_u16() != 200 {
            return Err(error_for(resp).await);
        }
        unwrap_task(resp).await
    }
}

async fn unwrap_task(resp: reqwest::Response) -> Result<Task> {
    let payload: TaskPayload = serde_json::from_str(&resp.text().await?)?;
    payload.task.ok_or(ApiError::MissingTask)
}

async fn error_for(resp: reqwest::Response) -> ApiError {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text).map_or(text, |body| body.message);
    ApiError::Status { status, message }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
