//! # punchlist-core
//!
//! Shared domain types for the punchlist task tracker, plus the single
//! rule that maps a checklist's completion state onto a task status.
//!
//! Both the server and the client crates depend on this crate so that
//! the status a client predicts locally is always the same status the
//! server would compute from the same checklist.

#![deny(unsafe_code)]

mod derive;
mod task;

pub use derive::derive_status;
pub use task::{
    AssignedUser, ChecklistItem, ErrorBody, Task, TaskCreate, TaskEnvelope, TaskListResponse,
    TaskPriority, TaskStatus, TaskUpdate, UpdateChecklistRequest, UpdateStatusRequest,
};
