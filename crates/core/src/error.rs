use std::path::PathBuf;

/// Errors that can occur while scanning a checkpoint directory.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("checkpoint directory not found: {0}")]
    DirNotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors that can occur while searching for a checkpoint directory.
#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    #[error("failed to walk {root}")]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to read modification time of {path}")]
    Mtime {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors produced when a retention policy is malformed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("{phase} interval must be at least 1 step")]
    ZeroInterval { phase: &'static str },

    #[error("{phase} interval percent must be in (0, 100], got {value}")]
    IntervalPercent { phase: &'static str, value: f64 },

    #[error("{boundary} percent must be in [0, 100], got {value}")]
    BoundaryPercent { boundary: &'static str, value: f64 },

    #[error("middle phase starts at step {middle_start} but last phase starts earlier at step {last_start}")]
    InvertedPhases { middle_start: u64, last_start: u64 },

    #[error("middle phase starts at {middle_start}% but last phase starts earlier at {last_start}%")]
    InvertedPercents { middle_start: f64, last_start: f64 },
}
