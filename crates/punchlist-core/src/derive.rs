//! Status derivation from checklist completion.

use crate::task::{ChecklistItem, TaskStatus};

/// Derives the status a task should have from its checklist.
///
/// A task is [`TaskStatus::Completed`] only when the checklist is
/// non-empty and every item is completed, [`TaskStatus::InProgress`]
/// when at least one item is completed but not all of them, and
/// [`TaskStatus::Pending`] otherwise. An empty checklist is always
/// pending: there is nothing done, and nothing to finish.
#[must_use]
pub fn derive_status(checklist: &[ChecklistItem]) -> TaskStatus {
    let completed = checklist.iter().filter(|item| item.completed).count();
    if completed == checklist.len() && !checklist.is_empty() {
        TaskStatus::Completed
    } else if completed > 0 {
        TaskStatus::InProgress
    } else {
        TaskStatus::Pending
    }
}
