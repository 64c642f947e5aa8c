//! Tiered retention policy for training checkpoints
//!
//! A run's step range `[first_step, last_step]` is split into three
//! contiguous phases:
//!
//! ```text
//! first_step        middle_start                 last_start        last_step
//!     |--- early ---------|---------- middle ----------|----- last -----|
//! ```
//!
//! Each phase is sampled at its own interval and every sampled target is
//! snapped to the nearest checkpoint that actually exists. The first and last
//! checkpoints are always retained.

use crate::checkpoint::Checkpoint;
use crate::error::PolicyError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Steps chosen to survive pruning
pub type RetainedSet = BTreeSet<u64>;

/// Where a phase begins: an absolute step or a share of the run's step range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    Steps(u64),
    Percent(f64),
}

impl Boundary {
    /// Absolute step for this boundary over `[first_step, first_step + total_range]`
    pub fn resolve(self, first_step: u64, total_range: u64) -> u64 {
        match self {
            Boundary::Steps(step) => step,
            Boundary::Percent(pct) => first_step.saturating_add(percent_of(total_range, pct)),
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Steps(step) => write!(f, "step {}", step),
            Boundary::Percent(pct) => write!(f, "{}%", pct),
        }
    }
}

/// Sampling interval of a phase: fixed steps or a share of the step range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    Steps(u64),
    Percent(f64),
}

impl Interval {
    /// Interval in steps, never less than 1
    pub fn resolve(self, total_range: u64) -> u64 {
        match self {
            Interval::Steps(steps) => steps.max(1),
            Interval::Percent(pct) => percent_of(total_range, pct).max(1),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Steps(steps) => write!(f, "{} steps", steps),
            Interval::Percent(pct) => write!(f, "{}% of range", pct),
        }
    }
}

fn percent_of(total_range: u64, pct: f64) -> u64 {
    (total_range as f64 * pct / 100.0).floor() as u64
}

/// Retention policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    /// Sampling interval from the first step up to `middle_start` (default: 5000 steps)
    pub early_interval: Interval,
    /// Sampling interval from `middle_start` up to `last_start` (default: 10000 steps)
    pub middle_interval: Interval,
    /// Sampling interval from `last_start` up to the last step (default: 2000 steps)
    pub last_interval: Interval,
    /// Start of the middle phase (default: 33%)
    pub middle_start: Boundary,
    /// Start of the last phase (default: 90%)
    pub last_start: Boundary,
    /// Keep every checkpoint in the last phase instead of sampling it
    pub keep_all_last: bool,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            early_interval: Interval::Steps(5000),
            middle_interval: Interval::Steps(10000),
            last_interval: Interval::Steps(2000),
            middle_start: Boundary::Percent(33.0),
            last_start: Boundary::Percent(90.0),
            keep_all_last: false,
        }
    }
}

/// Phase boundaries and intervals resolved against a concrete step range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseWindows {
    pub first_step: u64,
    pub middle_start: u64,
    pub last_start: u64,
    pub last_step: u64,
    pub early_interval: u64,
    pub middle_interval: u64,
    pub last_interval: u64,
}

impl PhaseWindows {
    /// Sample targets of the early phase, excluding the first step
    ///
    /// Targets at or past the last step are not generated, they would only
    /// snap to the last step.
    pub fn early_targets(&self) -> impl Iterator<Item = u64> {
        let first_step = self.first_step;
        let end = self.middle_start.min(self.last_step);
        targets(self.first_step, end, self.early_interval).filter(move |&step| step != first_step)
    }

    /// Sample targets of the middle phase, stopping before the last step
    pub fn middle_targets(&self) -> impl Iterator<Item = u64> {
        let end = self.last_start.min(self.last_step);
        targets(self.middle_start, end, self.middle_interval)
    }

    /// Sample targets of the last phase, excluding the last step
    pub fn last_targets(&self) -> impl Iterator<Item = u64> {
        targets(self.last_start, self.last_step, self.last_interval)
    }
}

/// `start, start + interval, ...` strictly below `end`; empty when `end <= start`
fn targets(start: u64, end: u64, interval: u64) -> impl Iterator<Item = u64> {
    let stride = usize::try_from(interval.max(1)).unwrap_or(usize::MAX);
    (start..end.max(start)).step_by(stride)
}

impl RetentionPolicy {
    /// Reject intervals and boundaries that cannot describe three ordered phases
    pub fn validate(&self) -> Result<(), PolicyError> {
        for (phase, interval) in [
            ("early", self.early_interval),
            ("middle", self.middle_interval),
            ("last", self.last_interval),
        ] {
            match interval {
                Interval::Steps(0) => return Err(PolicyError::ZeroInterval { phase }),
                Interval::Percent(value) if !(value.is_finite() && value > 0.0 && value <= 100.0) => {
                    return Err(PolicyError::IntervalPercent { phase, value });
                }
                _ => {}
            }
        }

        for (boundary, value) in [("middle_start", self.middle_start), ("last_start", self.last_start)] {
            if let Boundary::Percent(value) = value {
                if !(value.is_finite() && (0.0..=100.0).contains(&value)) {
                    return Err(PolicyError::BoundaryPercent { boundary, value });
                }
            }
        }

        match (self.middle_start, self.last_start) {
            (Boundary::Steps(middle_start), Boundary::Steps(last_start)) if middle_start > last_start => {
                Err(PolicyError::InvertedPhases {
                    middle_start,
                    last_start,
                })
            }
            (Boundary::Percent(middle_start), Boundary::Percent(last_start)) if middle_start > last_start => {
                Err(PolicyError::InvertedPercents {
                    middle_start,
                    last_start,
                })
            }
            _ => Ok(()),
        }
    }

    /// Resolve boundaries and intervals against the run's first and last step
    ///
    /// Explicit step boundaries may lie outside `[first_step, last_step]`;
    /// phases that end up empty are simply skipped. A middle phase that
    /// starts after the last phase is rejected.
    pub fn resolve(&self, first_step: u64, last_step: u64) -> Result<PhaseWindows, PolicyError> {
        self.validate()?;

        let last_step = last_step.max(first_step);
        let total_range = last_step - first_step;

        let middle_start = self.middle_start.resolve(first_step, total_range);
        let last_start = self.last_start.resolve(first_step, total_range);

        if middle_start > last_start {
            return Err(PolicyError::InvertedPhases {
                middle_start,
                last_start,
            });
        }

        Ok(PhaseWindows {
            first_step,
            middle_start,
            last_start,
            last_step,
            early_interval: self.early_interval.resolve(total_range),
            middle_interval: self.middle_interval.resolve(total_range),
            last_interval: self.last_interval.resolve(total_range),
        })
    }

    /// Compute the steps to keep from an ascending list of checkpoint steps
    pub fn retained_steps(&self, steps: &[u64]) -> Result<RetainedSet, PolicyError> {
        let (Some(&first_step), Some(&last_step)) = (steps.first(), steps.last()) else {
            return Ok(RetainedSet::new());
        };

        let windows = self.resolve(first_step, last_step)?;
        Ok(self.retained_steps_within(&windows, steps))
    }

    /// Compute the steps to keep using phase windows already resolved
    /// against `steps`
    pub fn retained_steps_within(&self, windows: &PhaseWindows, steps: &[u64]) -> RetainedSet {
        debug_assert!(steps.windows(2).all(|w| w[0] <= w[1]), "steps must be sorted");

        let mut keep = RetainedSet::new();
        let (Some(&first_step), Some(&last_step)) = (steps.first(), steps.last()) else {
            return keep;
        };

        keep.insert(first_step);
        keep.insert(last_step);

        debug!(
            "Phase windows: early [{}, {}) every {}, middle [{}, {}) every {}, last [{}, {}) every {}",
            windows.first_step,
            windows.middle_start,
            windows.early_interval,
            windows.middle_start,
            windows.last_start,
            windows.middle_interval,
            windows.last_start,
            windows.last_step,
            windows.last_interval,
        );

        let mut snap = |target: u64| {
            if let Some(step) = nearest_step(steps, target) {
                keep.insert(step);
            }
        };

        windows.early_targets().for_each(&mut snap);
        windows.middle_targets().for_each(&mut snap);

        if self.keep_all_last {
            keep.extend(steps.iter().copied().filter(|&step| step >= windows.last_start));
        } else {
            windows.last_targets().for_each(&mut snap);
        }

        keep
    }

    /// Same as [`retained_steps`](Self::retained_steps) for scanned checkpoints
    pub fn retain(&self, checkpoints: &[Checkpoint]) -> Result<RetainedSet, PolicyError> {
        self.retained_steps(&steps_of(checkpoints))
    }

    /// Same as [`retained_steps_within`](Self::retained_steps_within) for scanned checkpoints
    pub fn retain_within(&self, windows: &PhaseWindows, checkpoints: &[Checkpoint]) -> RetainedSet {
        self.retained_steps_within(windows, &steps_of(checkpoints))
    }
}

fn steps_of(checkpoints: &[Checkpoint]) -> Vec<u64> {
    checkpoints.iter().map(|cp| cp.step).collect()
}

/// Closest step to `target` in an ascending list
///
/// On a tie the smaller step wins.
pub fn nearest_step(steps: &[u64], target: u64) -> Option<u64> {
    let idx = steps.partition_point(|&step| step < target);
    let below = idx.checked_sub(1).map(|i| steps[i]);
    let above = steps.get(idx).copied();

    match (below, above) {
        (Some(below), Some(above)) => {
            if target - below <= above - target {
                Some(below)
            } else {
                Some(above)
            }
        }
        (below, above) => below.or(above),
    }
}
