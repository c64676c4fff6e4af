//! Taskflow API Library
//!
//! A small task tracker: projects own tasks, both stored in SQLite and
//! served as JSON over HTTP. [`client::TaskflowClient`] calls the same
//! endpoints from Rust.

pub mod api;
pub mod client;
pub mod domain;
pub mod infrastructure;
pub mod server;
