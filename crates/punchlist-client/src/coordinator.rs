//! Two-phase checklist toggling with optimistic snapshots.
//!
//! A toggle flips one checklist item locally, pushes the whole checklist
//! to the server, then aligns the task status with what the checklist
//! implies. The first phase is recoverable (a failed write reverts the
//! snapshot); the second is not (a failed status write leaves the
//! checklist committed and the status lagging until the next toggle).

use punchlist_core::{Task, derive_status};
use tokio::sync::watch;

use crate::api::TasksApi;
use crate::errors::{ApiError, Result};

/// What a toggle attempt did.
#[derive(Debug)]
pub enum ToggleOutcome {
    /// No task loaded, or the index was out of range. Nothing was sent.
    Skipped,
    /// The checklist write failed; the snapshot was restored.
    Reverted {
        /// Error the checklist write failed with.
        error: ApiError,
    },
    /// The checklist was written and the status already matched it.
    Committed,
    /// The checklist was written but the status write failed. The
    /// snapshot keeps the committed checklist with the stale status.
    StatusLagged {
        /// Error the status write failed with.
        error: ApiError,
    },
    /// Both writes landed.
    Synced,
}

/// Drives checklist toggles against one task and publishes each
/// intermediate state on a watch channel.
#[derive(Debug)]
pub struct ChecklistCoordinator {
    api: TasksApi,
    snapshot: watch::Sender<Option<Task>>,
}

impl ChecklistCoordinator {
    /// Create a coordinator with no task loaded.
    #[must_use]
    pub fn new(api: TasksApi) -> Self {
        let (snapshot, _) = watch::channel(None);
        Self { api, snapshot }
    }

    /// Watch the task snapshot as toggles progress.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Task>> {
        self.snapshot.subscribe()
    }

    /// The task as last published.
    #[must_use]
    pub fn snapshot(&self) -> Option<Task> {
        self.snapshot.borrow().clone()
    }

    /// Fetch a task and make it the current snapshot.
    pub async fn load(&self, id: &str) -> Result<Task> {
        let task = self.api.get_task(id).await?;
        let _ = self.snapshot.send_replace(Some(task.clone()));
        Ok(task)
    }

    /// Toggle the checklist item at `index`.
    ///
    /// Publishes the optimistic flip, replaces the checklist on the
    /// server, then writes the derived status if it differs. Never
    /// fails; every failure mode is an outcome variant.
    pub async fn toggle_item(&self, index: usize) -> ToggleOutcome {
        // Guard must drop before the awaits below.
        let current = self.snapshot.borrow().clone();
        let Some(original) = current else {
            tracing::warn!(index, "toggle with no task loaded");
            return ToggleOutcome::Skipped;
        };
        if index >= original.todo_checklist.len() {
            tracing::warn!(
                index,
                len = original.todo_checklist.len(),
                task_id = %original.id,
                "toggle index out of range"
            );
            return ToggleOutcome::Skipped;
        }

        let mut flipped = original.clone();
        flipped.todo_checklist[index].completed = !flipped.todo_checklist[index].completed;
        let _ = self.snapshot.send_replace(Some(flipped.clone()));

        // Phase one: replace the checklist. The server answer is
        // authoritative, so republish whatever it returns.
        let committed = match self
            .api
            .update_checklist(&original.id, &flipped.todo_checklist)
            .await
        {
            Ok(task) => {
                let _ = self.snapshot.send_replace(Some(task.clone()));
                task
            }
            Err(error) => {
                tracing::warn!(task_id = %original.id, %error, "checklist write failed, reverting");
                let _ = self.snapshot.send_replace(Some(original));
                return ToggleOutcome::Reverted { error };
            }
        };

        let desired = derive_status(&committed.todo_checklist);
        if committed.status == desired {
            return ToggleOutcome::Committed;
        }

        // Phase two: no rollback. The checklist stays committed even if
        // the status write is lost.
        match self.api.update_status(&committed.id, desired).await {
            Ok(task) => {
                let _ = self.snapshot.send_replace(Some(task));
                ToggleOutcome::Synced
            }
            Err(error) => {
                tracing::warn!(task_id = %committed.id, %error, "status write failed, status lags");
                ToggleOutcome::StatusLagged { error }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
