//! Plain-text cleanup log written next to the checkpoints
//!
//! The plan section is written before anything is deleted, so the log
//! survives as a record even if the run is interrupted. The summary is
//! appended once deletion finishes.

use crate::executor::DeletionReport;
use crate::plan::DeletionPlan;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name prefix of cleanup logs
pub const LOG_PREFIX: &str = "checkpoint_cleanup_";

const FILE_STAMP: &str = "%Y%m%d_%H%M%S";
const COMPLETION_STAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Handle to a cleanup log on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupLog {
    path: PathBuf,
}

impl CleanupLog {
    /// Write the plan for `dir` to `checkpoint_cleanup_<YYYYMMDD_HHMMSS>.log` inside it
    pub fn write(dir: &Path, plan: &DeletionPlan, started_at: DateTime<Local>) -> io::Result<Self> {
        let stamp = started_at.format(FILE_STAMP).to_string();
        let path = dir.join(format!("{}{}.log", LOG_PREFIX, stamp));

        fs::write(&path, render_plan(dir, plan, &stamp))?;
        info!("Wrote cleanup plan to {}", path.display());

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append actual deletion counts and the completion time
    pub fn append_summary(&self, report: &DeletionReport, completed_at: DateTime<Local>) -> io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        write!(
            file,
            "\nActual deletions: {} files\nDeletion errors: {} files\nCompletion time: {}",
            report.deleted_count(),
            report.error_count(),
            completed_at.format(COMPLETION_STAMP)
        )
    }
}

fn render_plan(dir: &Path, plan: &DeletionPlan, stamp: &str) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "Checkpoint cleanup log - {}", stamp);
    let _ = writeln!(out, "Directory: {}", dir.display());
    let _ = writeln!(out, "Total files: {}", plan.total());
    let _ = writeln!(out, "Files kept: {}", plan.keep().len());
    let _ = writeln!(out, "Files deleted: {}", plan.delete().len());

    out.push_str("\nKept files:\n");
    for cp in plan.keep() {
        let _ = writeln!(out, "  {}", cp.file_name());
    }

    out.push_str("\nDeleted files:\n");
    for cp in plan.delete() {
        let _ = writeln!(out, "  {}", cp.file_name());
    }

    out
}
