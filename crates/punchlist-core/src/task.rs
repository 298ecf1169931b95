//! Task, checklist, and wire payload types.
//!
//! Every type here serializes with camelCase field names because the
//! HTTP surface speaks camelCase JSON. Enum variants serialize under
//! their Rust names (`"Pending"`, `"InProgress"`, `"Completed"`), which
//! are the literal strings the wire format requires.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Status and priority
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle state of a task.
///
/// The wire representation is the variant name verbatim. The database
/// representation is the lowercase form returned by [`TaskStatus::as_sql`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// No checklist progress yet.
    #[default]
    Pending,
    /// At least one checklist item is done, but not all of them.
    InProgress,
    /// Every checklist item is done (and the checklist is non-empty).
    Completed,
}

impl TaskStatus {
    /// Stable string form used in SQL storage and queries.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Parses the SQL string form produced by [`TaskStatus::as_sql`].
    #[must_use]
    pub fn from_sql(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Whether the task has reached its final state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Scheduling weight of a task. Purely informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPriority {
    /// Can slip without consequence.
    Low,
    /// Default weight for new tasks.
    #[default]
    Medium,
    /// Needs attention before anything else.
    High,
}

impl TaskPriority {
    /// Stable string form used in SQL storage and queries.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses the SQL string form produced by [`TaskPriority::as_sql`].
    #[must_use]
    pub fn from_sql(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task and its parts
// ─────────────────────────────────────────────────────────────────────────────

/// One entry in a task's todo checklist.
///
/// Items have no identity of their own. They are addressed by position
/// within the owning task's checklist, and the whole list is replaced
/// wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    /// What needs doing.
    pub text: String,
    /// Whether it has been done.
    pub completed: bool,
}

impl ChecklistItem {
    /// A fresh, not-yet-completed item.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

/// A user a task is assigned to, as shown in task listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedUser {
    /// Opaque user identifier.
    pub id: String,
    /// Display name, when the directory knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar image reference, when the user has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// A tracked task with its checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned by the server at creation.
    pub id: String,
    /// Short human-readable title.
    pub title: String,
    /// Longer free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Scheduling weight.
    pub priority: TaskPriority,
    /// Current lifecycle state.
    pub status: TaskStatus,
    /// Due date in ISO 8601 form, when one is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Users this task is assigned to, in assignment order.
    #[serde(default)]
    pub assigned_to: Vec<AssignedUser>,
    /// Attachment references (URLs or file names).
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Ordered checklist the status is derived from.
    #[serde(default)]
    pub todo_checklist: Vec<ChecklistItem>,
    /// Creation timestamp, ISO 8601 UTC.
    pub created_at: String,
    /// Last-modified timestamp, ISO 8601 UTC.
    pub updated_at: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Request and response payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters for creating a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreate {
    /// Short human-readable title.
    pub title: String,
    /// Longer free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Scheduling weight. Defaults to medium when omitted.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Due date in ISO 8601 form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Initial assignees.
    #[serde(default)]
    pub assigned_to: Vec<AssignedUser>,
    /// Initial attachment references.
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Initial checklist. The task's status is derived from it.
    #[serde(default)]
    pub todo_checklist: Vec<ChecklistItem>,
}

/// Partial update for a task's descriptive fields.
///
/// Status and checklist changes go through their dedicated endpoints;
/// omitted fields here are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    /// New title, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New priority, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// New due date, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Replacement assignee list, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Vec<AssignedUser>>,
    /// Replacement attachment list, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

/// Body of `PUT /tasks/{id}/todo`: the full replacement checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChecklistRequest {
    /// The checklist that replaces the stored one, in order.
    pub todo_checklist: Vec<ChecklistItem>,
}

/// Body of `PUT /tasks/{id}/status`: the status to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// The status the task should take.
    pub status: TaskStatus,
}

/// Mutation responses wrap the resulting task under a `task` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEnvelope {
    /// The task after the mutation was applied.
    pub task: Task,
}

/// Response body for task listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListResponse {
    /// Tasks matching the query, newest first.
    pub tasks: Vec<Task>,
    /// Total number of matching tasks.
    pub total: u64,
}

/// Error response body shared by all endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Human-readable description of what went wrong.
    pub message: String,
}
