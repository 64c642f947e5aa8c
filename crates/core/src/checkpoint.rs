//! Checkpoint data structures and directory scanning

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A checkpoint file produced by a training run at a given step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// Full path to the checkpoint file
    pub path: PathBuf,
    /// Training step parsed from the file name
    pub step: u64,
    /// File size in bytes at scan time
    pub size: u64,
}

impl Checkpoint {
    /// Create a checkpoint record
    pub fn new(path: impl Into<PathBuf>, step: u64, size: u64) -> Self {
        Self {
            path: path.into(),
            step,
            size,
        }
    }

    /// Base name of the checkpoint file, as shown in plans and logs
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Naming convention for checkpoint files: `<prefix><digits><suffix>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointPattern {
    pub prefix: String,
    pub suffix: String,
}

impl Default for CheckpointPattern {
    fn default() -> Self {
        Self {
            prefix: "model_step_".to_string(),
            suffix: ".pt".to_string(),
        }
    }
}

impl CheckpointPattern {
    /// Extract the step number from a file name, if it follows the convention
    ///
    /// Only ASCII digits are accepted between prefix and suffix. A digit run
    /// too large for `u64` does not match.
    pub fn parse_step(&self, file_name: &str) -> Option<u64> {
        let digits = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        match digits.parse::<u64>() {
            Ok(step) => Some(step),
            Err(e) => {
                warn!("Ignoring {}: step number out of range ({})", file_name, e);
                None
            }
        }
    }

    /// File name for a given step
    pub fn file_name(&self, step: u64) -> String {
        format!("{}{}{}", self.prefix, step, self.suffix)
    }
}

/// List checkpoint files in `dir`, sorted ascending by step
///
/// Files that do not match `pattern` and all subdirectories are skipped.
/// An empty result is not an error.
pub fn scan_checkpoints(dir: &Path, pattern: &CheckpointPattern) -> Result<Vec<Checkpoint>, ScanError> {
    if !dir.exists() {
        return Err(ScanError::DirNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let io_err = |source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut checkpoints = Vec::new();

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(step) = pattern.parse_step(name) else {
            continue;
        };

        // Follows symlinks, so linked checkpoints count as files
        let path = entry.path();
        let metadata = match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        checkpoints.push(Checkpoint::new(path, step, metadata.len()));
    }

    checkpoints.sort_by_key(|cp| cp.step);
    debug!("Scanned {} checkpoints in {}", checkpoints.len(), dir.display());

    Ok(checkpoints)
}
