//! Best-effort deletion of planned checkpoints

use crate::plan::DeletionPlan;
use std::fs;
use stepprune_core::Checkpoint;
use tracing::{debug, warn};

/// Result of deleting a single checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Removal failed; the message is the underlying I/O error
    Failed(String),
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

/// Per-checkpoint outcomes of a deletion run, in deletion order
#[derive(Debug, Clone, Default)]
pub struct DeletionReport {
    pub outcomes: Vec<(Checkpoint, DeleteOutcome)>,
}

impl DeletionReport {
    pub fn deleted_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_deleted()).count()
    }

    pub fn error_count(&self) -> usize {
        self.outcomes.len() - self.deleted_count()
    }

    /// Bytes freed by successful deletions (sizes as scanned)
    pub fn bytes_freed(&self) -> u64 {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.is_deleted())
            .map(|(cp, _)| cp.size)
            .sum()
    }

    /// Checkpoints that could not be removed
    pub fn failures(&self) -> impl Iterator<Item = (&Checkpoint, &str)> {
        self.outcomes.iter().filter_map(|(cp, outcome)| match outcome {
            DeleteOutcome::Failed(reason) => Some((cp, reason.as_str())),
            DeleteOutcome::Deleted => None,
        })
    }
}

/// Delete every checkpoint in the plan's delete list, in ascending-step order
///
/// A failure on one file is recorded and the remaining files are still
/// attempted. `observer` sees each outcome as soon as it is known.
pub fn execute<F>(plan: &DeletionPlan, mut observer: F) -> DeletionReport
where
    F: FnMut(&Checkpoint, &DeleteOutcome),
{
    let mut report = DeletionReport {
        outcomes: Vec::with_capacity(plan.delete().len()),
    };

    for checkpoint in plan.delete() {
        let outcome = match fs::remove_file(&checkpoint.path) {
            Ok(()) => {
                debug!("Deleted {}", checkpoint.path.display());
                DeleteOutcome::Deleted
            }
            Err(e) => {
                warn!("Failed to delete {}: {}", checkpoint.path.display(), e);
                DeleteOutcome::Failed(e.to_string())
            }
        };

        observer(checkpoint, &outcome);
        report.outcomes.push((checkpoint.clone(), outcome));
    }

    report
}
