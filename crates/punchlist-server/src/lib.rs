//! # punchlist-server
//!
//! Axum HTTP server exposing the task API.
//!
//! - Task CRUD plus the two checklist-driven mutation routes
//!   (`PUT /tasks/{id}/todo`, `PUT /tasks/{id}/status`)
//! - Health check with live task count
//! - Graceful shutdown via `tokio::signal` + `CancellationToken`
//!
//! The checklist route replaces the stored checklist wholesale and never
//! touches the task's status; the status route persists whatever status
//! the client sends. Clients are expected to pair the two, which is what
//! makes a lost second call recoverable.

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod health;
pub mod routes;
pub mod server;
pub mod shutdown;
