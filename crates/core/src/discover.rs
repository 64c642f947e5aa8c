//! Locate the most recently modified training run under a `checkpoints/` tree

use crate::error::DiscoverError;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Name of the directory whose children are treated as run directories
pub const CHECKPOINTS_DIR_NAME: &str = "checkpoints";

/// Find the newest run directory matching `**/checkpoints/*` below `root`
///
/// Hidden entries are not descended into and unreadable subtrees are skipped
/// with a warning. Run directories may be symlinks. Returns `None` when no
/// `checkpoints/` directory with a subdirectory exists.
pub fn newest_checkpoint_dir(root: &Path) -> Result<Option<PathBuf>, DiscoverError> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(DiscoverError::Walk {
                    root: root.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                warn!("Skipping unreadable path during checkpoint search: {}", e);
                continue;
            }
        };

        if !parent_is_checkpoints(&entry) {
            continue;
        }

        // Follows symlinked run directories
        let mtime = match fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_dir() => metadata.modified().map_err(|source| DiscoverError::Mtime {
                path: entry.path().to_path_buf(),
                source,
            })?,
            Ok(_) => continue,
            Err(e) => {
                warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        debug!("Candidate checkpoint directory: {}", entry.path().display());

        match &newest {
            Some((best, _)) if *best >= mtime => {}
            _ => newest = Some((mtime, entry.path().to_path_buf())),
        }
    }

    Ok(newest.map(|(_, path)| path))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn parent_is_checkpoints(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .map(|name| name == CHECKPOINTS_DIR_NAME)
            .unwrap_or(false)
}
