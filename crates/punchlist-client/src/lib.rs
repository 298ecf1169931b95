//! # punchlist-client
//!
//! Typed HTTP client for the task API plus the checklist toggle
//! coordinator.
//!
//! [`TasksApi`] is a thin reqwest wrapper, one method per route.
//! [`ChecklistCoordinator`] sits on top and implements the two-phase
//! toggle flow: flip an item optimistically, persist the checklist,
//! then persist the derived status. Observers watch the coordinator's
//! task snapshot through a `tokio::sync::watch` channel and always see
//! the latest published state.

#![deny(unsafe_code)]

mod api;
mod coordinator;
mod errors;

pub use api::TasksApi;
pub use coordinator::{ChecklistCoordinator, ToggleOutcome};
pub use errors::{ApiError, Result};
