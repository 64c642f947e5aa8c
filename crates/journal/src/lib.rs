//! Deletion planning, execution and the cleanup log
//!
//! This crate provides:
//! - Keep/delete reconciliation of scanned checkpoints
//! - Pluggable confirmation before destructive work
//! - Fail-soft per-file deletion with per-item outcomes
//! - Timestamped plain-text cleanup log

pub mod confirm;
pub mod executor;
pub mod log;
pub mod plan;

// Re-exports
pub use confirm::{AutoConfirm, Confirm, StdinConfirm};
pub use executor::{execute, DeleteOutcome, DeletionReport};
pub use log::CleanupLog;
pub use plan::DeletionPlan;
