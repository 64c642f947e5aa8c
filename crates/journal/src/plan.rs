//! Keep/delete reconciliation

use stepprune_core::{Checkpoint, RetainedSet};

/// Checkpoints partitioned into those to keep and those to delete
///
/// Both lists preserve the ascending-step order of the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionPlan {
    keep: Vec<Checkpoint>,
    delete: Vec<Checkpoint>,
}

impl DeletionPlan {
    /// Split `checkpoints` by membership of their step in `retained`
    pub fn reconcile(checkpoints: &[Checkpoint], retained: &RetainedSet) -> Self {
        let (keep, delete) = checkpoints
            .iter()
            .cloned()
            .partition(|cp| retained.contains(&cp.step));

        Self { keep, delete }
    }

    pub fn keep(&self) -> &[Checkpoint] {
        &self.keep
    }

    pub fn delete(&self) -> &[Checkpoint] {
        &self.delete
    }

    /// Number of checkpoints the plan was built from
    pub fn total(&self) -> usize {
        self.keep.len() + self.delete.len()
    }

    /// True when nothing would be deleted
    pub fn is_empty(&self) -> bool {
        self.delete.is_empty()
    }

    /// Bytes that deleting every planned file would free
    pub fn bytes_to_free(&self) -> u64 {
        self.delete.iter().map(|cp| cp.size).sum()
    }
}
