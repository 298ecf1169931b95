//! # punchlist-store
//!
//! `SQLite` persistence for tasks and their checklists.
//!
//! The store is split into a connection layer (WAL-mode pool with
//! pragma enforcement), an embedded migration runner, and a stateless
//! repository that translates between [`punchlist_core`] types and SQL.
//! Checklist items live in their own table keyed by `(task_id, position)`
//! so a checklist replace is a plain delete-and-reinsert inside one
//! transaction.

#![deny(unsafe_code)]

mod connection;
mod errors;
mod migrations;
mod repository;

pub use connection::{
    ConnectionConfig, ConnectionPool, PooledConnection, PragmaState, new_file, new_in_memory,
    verify_pragmas,
};
pub use errors::{Result, StoreError};
pub use migrations::{current_version, latest_version, run_migrations};
pub use repository::{TaskFilter, TaskPage, TaskRepository};
