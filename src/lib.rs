//! Core of a run-tracking client: accumulates GPS fixes into a path,
//! derives distance, speed and elapsed time, and persists finished runs.

pub mod config;
pub mod error;
pub mod store;
pub mod tracker;
pub mod types;
pub mod ui;
