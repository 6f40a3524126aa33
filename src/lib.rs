//! In-memory engine of a small-team project/task management tool: users
//! with three roles, Kanban-style task boards, a report request/submission/
//! review workflow and the notification fan-out those workflows trigger.
//!
//! All state lives in one owned [`AppState`]; nothing is persisted and
//! there is a single logical writer. The only async boundary is the
//! external description generator in [`ai`].

pub mod ai;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod error;
pub mod grid;
pub mod notification;
pub mod project;
pub mod report;
pub mod task;

pub use app_state::{AppState, AppView, ViewMode};
pub use error::{Error, Result};
