//! Console output for each stage of a run

use crate::util;
use owo_colors::OwoColorize;
use std::path::Path;
use stepprune_core::{Checkpoint, PhaseWindows, RetentionPolicy};
use stepprune_journal::{DeleteOutcome, DeletionPlan, DeletionReport};

pub fn auto_selected(dir: &Path) {
    println!("Auto-selected newest checkpoint directory: {}", dir.display().cyan());
}

pub fn no_checkpoint_dir() {
    println!("{}", "No checkpoint directory found!".yellow());
}

pub fn no_checkpoints(dir: &Path) {
    println!("{} {}", "No checkpoint files found in".yellow(), dir.display());
}

pub fn latest(checkpoint: &Checkpoint) {
    println!(
        "Found latest checkpoint: {} (step: {})",
        checkpoint.file_name(),
        checkpoint.step
    );
}

/// Resolved phase layout, shown before the file lists
pub fn phases(policy: &RetentionPolicy, windows: &PhaseWindows) {
    println!();
    println!("{}", "Retention phases".bold());
    println!(
        "  {}  [{}, {}) every {} steps ({})",
        "early ".cyan(),
        windows.first_step,
        windows.middle_start,
        windows.early_interval,
        policy.early_interval
    );
    println!(
        "  {}  [{}, {}) every {} steps ({})",
        "middle".cyan(),
        windows.middle_start,
        windows.last_start,
        windows.middle_interval,
        policy.middle_interval
    );
    if policy.keep_all_last {
        println!(
            "  {}  [{}, {}] every checkpoint",
            "last  ".cyan(),
            windows.last_start,
            windows.last_step
        );
    } else {
        println!(
            "  {}  [{}, {}) every {} steps ({})",
            "last  ".cyan(),
            windows.last_start,
            windows.last_step,
            windows.last_interval,
            policy.last_interval
        );
    }
    println!();
}

pub fn plan(plan: &DeletionPlan) {
    println!("Found {} model checkpoint files.", plan.total());
    println!(
        "Planning to keep {} files, delete {} files.",
        plan.keep().len(),
        plan.delete().len()
    );
    println!(
        "Space to free: {}",
        util::format_size(plan.bytes_to_free()).green()
    );

    println!("\n{}", "Files to keep:".bold());
    for cp in plan.keep() {
        println!("  {}", cp.file_name());
    }

    println!("\n{}", "Files to delete:".bold());
    for cp in plan.delete() {
        println!("  {}", cp.file_name().dimmed());
    }
}

pub fn log_saved(path: &Path) {
    println!("\nCleanup plan saved to: {}", path.display());
}

pub fn dry_run() {
    println!("\n{}", "Dry run complete - no files were deleted.".yellow());
}

pub fn nothing_to_delete() {
    println!("\n{}", "Nothing to delete - every checkpoint is retained.".dimmed());
}

pub fn cancelled() {
    println!("{}", "Deletion cancelled.".yellow());
}

pub fn outcome(checkpoint: &Checkpoint, outcome: &DeleteOutcome) {
    match outcome {
        DeleteOutcome::Deleted => println!("Deleted: {}", checkpoint.file_name()),
        DeleteOutcome::Failed(reason) => println!(
            "{} {}: {}",
            "Error deleting".red(),
            checkpoint.file_name(),
            reason
        ),
    }
}

pub fn log_append_failed(path: &Path, err: &std::io::Error) {
    println!(
        "{} could not update {}: {}",
        "Warning:".yellow(),
        path.display(),
        err
    );
}

pub fn completed(report: &DeletionReport) {
    println!(
        "\nDeletion complete. Deleted {} files, {} errors.",
        report.deleted_count(),
        report.error_count()
    );
    if report.deleted_count() > 0 {
        println!(
            "Space freed: {}",
            util::format_size(report.bytes_freed()).green()
        );
    }
}
