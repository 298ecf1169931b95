//! SQL data access layer for tasks and checklists.
//!
//! All methods take a `&Connection` parameter and are stateless: pure
//! functions that translate between [`punchlist_core`] types and SQL.
//! Uses `uuid::Uuid::now_v7()` for time-ordered ID generation.
//!
//! Checklist items live in the `checklist_items` table, keyed by
//! `(task_id, position)`. A checklist is always written wholesale:
//! delete the old rows, insert the new ones, touch `updated_at`, all in
//! one transaction.

use punchlist_core::{
    AssignedUser, ChecklistItem, Task, TaskCreate, TaskStatus, TaskUpdate, derive_status,
};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::errors::{Result, StoreError};

/// Generate a prefixed UUID v7 ID.
fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::now_v7())
}

/// Get current UTC timestamp as ISO 8601 string.
fn now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse a JSON array column into a list, empty on malformed data.
fn parse_list<T: DeserializeOwned>(json: &str) -> Vec<T> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Serialize a list into a JSON array column.
fn list_to_json<T: Serialize>(list: &[T]) -> Result<String> {
    Ok(serde_json::to_string(list)?)
}

/// Filter for task listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    /// Only tasks in this status.
    pub status: Option<TaskStatus>,
}

/// One page of a task listing.
#[derive(Debug, Clone)]
pub struct TaskPage {
    /// Tasks on this page, newest first.
    pub tasks: Vec<Task>,
    /// Total number of tasks matching the filter.
    pub total: u64,
}

/// Task repository for SQL CRUD operations.
pub struct TaskRepository;

impl TaskRepository {
    // ─────────────────────────────────────────────────────────────────────
    // Task CRUD
    // ─────────────────────────────────────────────────────────────────────

    /// Create a new task. The initial status is derived from the
    /// supplied checklist.
    pub fn create_task(conn: &Connection, create: &TaskCreate) -> Result<Task> {
        let id = generate_id("task");
        let now = now_iso();
        let status = derive_status(&create.todo_checklist);
        let assigned_json = list_to_json(&create.assigned_to)?;
        let attachments_json = list_to_json(&create.attachments)?;

        let tx = conn.unchecked_transaction()?;
        let _ = tx.execute(
            "INSERT INTO tasks (id, title, description, priority, status,
             due_date, assigned_to, attachments, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            params![
                id,
                create.title,
                create.description,
                create.priority.as_sql(),
                status.as_sql(),
                create.due_date,
                assigned_json,
                attachments_json,
                now,
            ],
        )?;
        insert_checklist(&tx, &id, &create.todo_checklist)?;
        tx.commit()?;

        Self::get_task(conn, &id)?.ok_or_else(|| StoreError::TaskNotFound(id))
    }

    /// Get a task by ID, checklist included.
    pub fn get_task(conn: &Connection, id: &str) -> Result<Option<Task>> {
        let task = conn
            .query_row("SELECT * FROM tasks WHERE id = ?1", params![id], |row| {
                Ok(task_from_row(row))
            })
            .optional()?;
        match task {
            Some(mut task) => {
                task.todo_checklist = load_checklist(conn, id)?;
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    /// Update a task's descriptive fields. Returns the updated task,
    /// or `None` if not found. Status and checklist are never touched
    /// here; they have dedicated methods.
    pub fn update_task(conn: &Connection, id: &str, updates: &TaskUpdate) -> Result<Option<Task>> {
        // Build dynamic SET clause
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(ref title) = updates.title {
            sets.push("title = ?".to_string());
            values.push(Box::new(title.clone()));
        }
        if let Some(ref desc) = updates.description {
            sets.push("description = ?".to_string());
            values.push(Box::new(desc.clone()));
        }
        if let Some(priority) = updates.priority {
            sets.push("priority = ?".to_string());
            values.push(Box::new(priority.as_sql().to_string()));
        }
        if let Some(ref due) = updates.due_date {
            sets.push("due_date = ?".to_string());
            // Empty string clears the date.
            let normalized: Option<String> = if due.is_empty() {
                None
            } else {
                Some(due.clone())
            };
            values.push(Box::new(normalized));
        }
        if let Some(ref users) = updates.assigned_to {
            sets.push("assigned_to = ?".to_string());
            values.push(Box::new(list_to_json(users)?));
        }
        if let Some(ref attachments) = updates.attachments {
            sets.push("attachments = ?".to_string());
            values.push(Box::new(list_to_json(attachments)?));
        }

        if sets.is_empty() {
            return Self::get_task(conn, id);
        }

        sets.push("updated_at = ?".to_string());
        values.push(Box::new(now_iso()));
        values.push(Box::new(id.to_string()));

        let sql = format!("UPDATE tasks SET {} WHERE id = ?", sets.join(", "));

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            values.iter().map(AsRef::as_ref).collect();
        let changed = conn.execute(&sql, params_refs.as_slice())?;

        if changed == 0 {
            return Ok(None);
        }

        Self::get_task(conn, id)
    }

    /// Delete a task by ID. Checklist rows cascade. Returns true if a
    /// row was deleted.
    pub fn delete_task(conn: &Connection, id: &str) -> Result<bool> {
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// List tasks with filtering and pagination, newest first.
    pub fn list_tasks(
        conn: &Connection,
        filter: &TaskFilter,
        limit: u32,
        offset: u32,
    ) -> Result<TaskPage> {
        let mut conditions: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push("status = ?".to_string());
            values.push(Box::new(status.as_sql().to_string()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Count query
        let count_sql = format!("SELECT COUNT(*) FROM tasks {where_clause}");
        let count_params: Vec<&dyn rusqlite::types::ToSql> =
            values.iter().map(AsRef::as_ref).collect();
        let total: u64 = conn.query_row(&count_sql, count_params.as_slice(), |row| row.get(0))?;

        // Data query
        let data_sql = format!(
            "SELECT * FROM tasks {where_clause} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        );

        let mut data_values = values;
        data_values.push(Box::new(limit));
        data_values.push(Box::new(offset));
        let data_params: Vec<&dyn rusqlite::types::ToSql> =
            data_values.iter().map(AsRef::as_ref).collect();

        let mut stmt = conn.prepare(&data_sql)?;
        let mut tasks: Vec<Task> = stmt
            .query_map(data_params.as_slice(), |row| Ok(task_from_row(row)))?
            .filter_map(std::result::Result::ok)
            .collect();

        for task in &mut tasks {
            task.todo_checklist = load_checklist(conn, &task.id)?;
        }

        Ok(TaskPage { tasks, total })
    }

    /// Total number of stored tasks.
    pub fn count_tasks(conn: &Connection) -> Result<u64> {
        let total: u64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        Ok(total)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Checklist and status
    // ─────────────────────────────────────────────────────────────────────

    /// Replace a task's checklist wholesale, preserving order, and
    /// touch `updated_at`. The task's status is left as it was.
    /// Returns the updated task, or `None` if not found.
    pub fn replace_checklist(
        conn: &Connection,
        id: &str,
        items: &[ChecklistItem],
    ) -> Result<Option<Task>> {
        let tx = conn.unchecked_transaction()?;

        let touched = tx.execute(
            "UPDATE tasks SET updated_at = ?1 WHERE id = ?2",
            params![now_iso(), id],
        )?;
        if touched == 0 {
            return Ok(None);
        }

        let _ = tx.execute(
            "DELETE FROM checklist_items WHERE task_id = ?1",
            params![id],
        )?;
        insert_checklist(&tx, id, items)?;
        tx.commit()?;

        Self::get_task(conn, id)
    }

    /// Persist the given status verbatim and touch `updated_at`.
    ///
    /// Setting [`TaskStatus::Completed`] also marks every checklist
    /// item completed, so the stored checklist agrees with the status.
    /// Returns the updated task, or `None` if not found.
    pub fn set_status(conn: &Connection, id: &str, status: TaskStatus) -> Result<Option<Task>> {
        let tx = conn.unchecked_transaction()?;

        let changed = tx.execute(
            "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_sql(), now_iso(), id],
        )?;
        if changed == 0 {
            return Ok(None);
        }

        if status == TaskStatus::Completed {
            let _ = tx.execute(
                "UPDATE checklist_items SET completed = 1 WHERE task_id = ?1",
                params![id],
            )?;
        }
        tx.commit()?;

        Self::get_task(conn, id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Row conversion
// ─────────────────────────────────────────────────────────────────────────────

fn task_from_row(row: &rusqlite::Row<'_>) -> Task {
    let status_str: String = row.get_unwrap("status");
    let priority_str: String = row.get_unwrap("priority");
    let assigned_json: String = row.get_unwrap("assigned_to");
    let attachments_json: String = row.get_unwrap("attachments");

    Task {
        id: row.get_unwrap("id"),
        title: row.get_unwrap("title"),
        description: row.get_unwrap("description"),
        priority: punchlist_core::TaskPriority::from_sql(&priority_str).unwrap_or_default(),
        status: TaskStatus::from_sql(&status_str).unwrap_or_default(),
        due_date: row.get_unwrap("due_date"),
        assigned_to: parse_list::<AssignedUser>(&assigned_json),
        attachments: parse_list::<String>(&attachments_json),
        todo_checklist: Vec::new(),
        created_at: row.get_unwrap("created_at"),
        updated_at: row.get_unwrap("updated_at"),
    }
}

fn load_checklist(conn: &Connection, task_id: &str) -> Result<Vec<ChecklistItem>> {
    let mut stmt = conn.prepare(
        "SELECT text, completed FROM checklist_items WHERE task_id = ?1 ORDER BY position",
    )?;
    let items = stmt
        .query_map(params![task_id], |row| {
            Ok(ChecklistItem {
                text: row.get(0)?,
                completed: row.get(1)?,
            })
        })?
        .filter_map(std::result::Result::ok)
        .collect();
    Ok(items)
}

fn insert_checklist(conn: &Connection, task_id: &str, items: &[ChecklistItem]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO checklist_items (task_id, position, text, completed) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (position, item) in items.iter().enumerate() {
        let _ = stmt.execute(params![task_id, position, item.text, item.completed])?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
