//! Domain module for task tracking.
//!
//! This module contains the domain models and value objects shared by the
//! HTTP layer, the repositories and the client wrappers.

pub mod project;
pub mod task;

pub use project::{NewProject, Project, ProjectId};
pub use task::{
    FieldUpdate, NewTask, Task, TaskId, TaskPatch, TaskStatus, Timestamp, UnknownStatus,
};
