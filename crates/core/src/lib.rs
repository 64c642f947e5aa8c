//! Checkpoint model and retention policy for stepprune
//!
//! This crate provides:
//! - Checkpoint data structures (step-numbered model files)
//! - Directory scanner for the `model_step_<n>.pt` naming convention
//! - Newest `checkpoints/*` directory discovery
//! - Tiered retention policy (early / middle / last phases)

pub mod checkpoint;
pub mod discover;
pub mod error;
pub mod retention;

// Re-exports
pub use checkpoint::{scan_checkpoints, Checkpoint, CheckpointPattern};
pub use discover::newest_checkpoint_dir;
pub use error::{DiscoverError, PolicyError, ScanError};
pub use retention::{nearest_step, Boundary, Interval, PhaseWindows, RetainedSet, RetentionPolicy};
