//! The prune pipeline
//!
//! `SCAN -> PLAN -> (DRY_RUN_EXIT | CONFIRM -> (ABORT | DELETE -> DONE))`
//!
//! Nothing is resumable: an interrupted run leaves whatever was already
//! deleted gone, and the plan log is the only record.

use crate::config::Settings;
use crate::report;
use crate::util;
use anyhow::{Context, Result};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use stepprune_core::{newest_checkpoint_dir, scan_checkpoints};
use stepprune_journal::{execute, CleanupLog, Confirm, DeletionPlan, DeletionReport};
use tracing::{info, warn};

/// Prompt shown before deleting
pub const CONFIRM_PROMPT: &str = "\nContinue with deletion? (yes/no): ";

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// No `--model_dir` and no `checkpoints/*` directory to fall back on
    NoCheckpointDir,
    /// The directory holds no checkpoint files
    NoCheckpoints { dir: PathBuf },
    /// Plan computed and logged, nothing touched
    DryRun {
        dir: PathBuf,
        plan: DeletionPlan,
        log: CleanupLog,
    },
    /// Confirmation declined, nothing touched
    Aborted {
        dir: PathBuf,
        plan: DeletionPlan,
        log: CleanupLog,
    },
    /// Deletion attempted for every planned file
    Completed {
        dir: PathBuf,
        plan: DeletionPlan,
        log: CleanupLog,
        report: DeletionReport,
    },
}

/// Run the pipeline once with merged settings
pub fn run(settings: &Settings, confirm: &mut dyn Confirm) -> Result<RunOutcome> {
    // 1. Scan
    let dir = match &settings.model_dir {
        Some(dir) => dir.clone(),
        None => {
            let found = newest_checkpoint_dir(&settings.search_root)
                .context("Failed to search for checkpoint directories")?;
            match found {
                Some(dir) => {
                    report::auto_selected(&util::display_relative(&dir, &settings.search_root));
                    dir
                }
                None => {
                    report::no_checkpoint_dir();
                    return Ok(RunOutcome::NoCheckpointDir);
                }
            }
        }
    };

    let checkpoints = scan_checkpoints(&dir, &settings.pattern)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    let (Some(first), Some(latest)) = (checkpoints.first(), checkpoints.last()) else {
        report::no_checkpoints(&dir);
        return Ok(RunOutcome::NoCheckpoints { dir });
    };
    report::latest(latest);

    // 2. Plan
    let windows = settings.policy.resolve(first.step, latest.step)?;
    let retained = settings.policy.retain_within(&windows, &checkpoints);
    let plan = DeletionPlan::reconcile(&checkpoints, &retained);
    info!(
        "Plan for {}: keep {}, delete {}",
        dir.display(),
        plan.keep().len(),
        plan.delete().len()
    );

    report::phases(&settings.policy, &windows);
    report::plan(&plan);

    let log = CleanupLog::write(&dir, &plan, Local::now())
        .with_context(|| format!("Failed to write cleanup log in {}", dir.display()))?;
    report::log_saved(log.path());

    if settings.dry_run {
        report::dry_run();
        return Ok(RunOutcome::DryRun { dir, plan, log });
    }

    // 3. Confirm
    if plan.is_empty() {
        report::nothing_to_delete();
    } else if !settings.no_confirm {
        let accepted = confirm
            .confirm(CONFIRM_PROMPT)
            .context("Failed to read confirmation")?;
        if !accepted {
            info!("Deletion declined");
            report::cancelled();
            return Ok(RunOutcome::Aborted { dir, plan, log });
        }
    }

    // 4. Delete
    let deletion = delete_with_progress(&plan);

    if let Err(e) = log.append_summary(&deletion, Local::now()) {
        warn!("Failed to append summary to {}: {}", log.path().display(), e);
        report::log_append_failed(log.path(), &e);
    }
    report::completed(&deletion);

    Ok(RunOutcome::Completed {
        dir,
        plan,
        log,
        report: deletion,
    })
}

fn delete_with_progress(plan: &DeletionPlan) -> DeletionReport {
    let pb = ProgressBar::new(plan.delete().len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }

    let deletion = execute(plan, |checkpoint, outcome| {
        pb.suspend(|| report::outcome(checkpoint, outcome));
        pb.inc(1);
    });

    pb.finish_and_clear();
    deletion
}
