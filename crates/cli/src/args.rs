//! Command-line arguments

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use stepprune_core::{Boundary, Interval};

/// stepprune - Thin out training checkpoints with a tiered retention policy
///
/// Keeps checkpoints densely near the start and end of a run and sparsely
/// in the middle. Absolute-step flags take precedence over percent flags.
#[derive(Debug, Parser)]
#[command(name = "stepprune")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing model checkpoints (default: newest checkpoints/* directory)
    #[arg(long = "model_dir", visible_alias = "model-dir")]
    pub model_dir: Option<PathBuf>,

    /// Early phase keep interval (fixed number of steps) [default: 5000]
    #[arg(long = "early_interval", visible_alias = "early-interval")]
    pub early_interval: Option<u64>,

    /// Early phase keep interval (% of total step range)
    #[arg(long = "early_interval_percent", visible_alias = "early-interval-percent")]
    pub early_interval_percent: Option<f64>,

    /// Middle phase keep interval (fixed number of steps) [default: 10000]
    #[arg(long = "middle_interval", visible_alias = "middle-interval")]
    pub middle_interval: Option<u64>,

    /// Middle phase keep interval (% of total step range)
    #[arg(long = "middle_interval_percent", visible_alias = "middle-interval-percent")]
    pub middle_interval_percent: Option<f64>,

    /// Last phase keep interval (fixed number of steps) [default: 2000]
    #[arg(long = "last_interval", visible_alias = "last-interval")]
    pub last_interval: Option<u64>,

    /// Last phase keep interval (% of total step range)
    #[arg(long = "last_interval_percent", visible_alias = "last-interval-percent")]
    pub last_interval_percent: Option<f64>,

    /// Start point for middle phase (% of total range) [default: 33]
    #[arg(long = "middle_start_percent", visible_alias = "middle-start-percent")]
    pub middle_start_percent: Option<f64>,

    /// Start point for last phase (% of total range) [default: 90]
    #[arg(long = "last_start_percent", visible_alias = "last-start-percent")]
    pub last_start_percent: Option<f64>,

    /// Start point for middle phase (specific step number)
    #[arg(long = "middle_start_steps", visible_alias = "middle-start-steps")]
    pub middle_start_steps: Option<u64>,

    /// Start point for last phase (specific step number)
    #[arg(long = "last_start_steps", visible_alias = "last-start-steps")]
    pub last_start_steps: Option<u64>,

    /// Keep every checkpoint in the last phase instead of sampling it
    #[arg(long = "keep_all_last", visible_alias = "keep-all-last")]
    pub keep_all_last: bool,

    /// Show files to be deleted without actually deleting
    #[arg(long = "dry_run", visible_alias = "dry-run")]
    pub dry_run: bool,

    /// Delete without confirmation
    #[arg(long = "no_confirm", visible_alias = "no-confirm")]
    pub no_confirm: bool,

    /// Configuration file (default: $STEPPRUNE_CONFIG or the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print an example configuration file and exit
    #[arg(long = "print_config", visible_alias = "print-config")]
    pub print_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn early_interval(&self) -> Option<Interval> {
        interval(self.early_interval, self.early_interval_percent)
    }

    pub fn middle_interval(&self) -> Option<Interval> {
        interval(self.middle_interval, self.middle_interval_percent)
    }

    pub fn last_interval(&self) -> Option<Interval> {
        interval(self.last_interval, self.last_interval_percent)
    }

    pub fn middle_start(&self) -> Option<Boundary> {
        boundary(self.middle_start_steps, self.middle_start_percent)
    }

    pub fn last_start(&self) -> Option<Boundary> {
        boundary(self.last_start_steps, self.last_start_percent)
    }
}

fn interval(steps: Option<u64>, percent: Option<f64>) -> Option<Interval> {
    steps.map(Interval::Steps).or(percent.map(Interval::Percent))
}

fn boundary(steps: Option<u64>, percent: Option<f64>) -> Option<Boundary> {
    steps.map(Boundary::Steps).or(percent.map(Boundary::Percent))
}
