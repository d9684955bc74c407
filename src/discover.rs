//! Leaf folder discovery
//!
//! A leaf folder is a directory without subdirectories. The whole tree below
//! the root is walked without following symlinks, but a symlink to a
//! directory still counts as a subdirectory of its parent.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

/// Find all leaf folders below (and including) `root`, sorted by path
///
/// A missing or unreadable root has no leaf folders.
pub fn find_leaf_folders(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        warn!("Root folder {} does not exist or is not a directory", root.display());
        return Vec::new();
    }

    let mut dirs = Vec::new();
    let mut parents = HashSet::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };

        let is_dir = entry.file_type().is_dir();
        let is_dir_link = entry.path_is_symlink() && entry.path().is_dir();
        if (is_dir || is_dir_link) && entry.depth() > 0 {
            if let Some(parent) = entry.path().parent() {
                parents.insert(parent.to_path_buf());
            }
        }
        if is_dir {
            dirs.push(entry.into_path());
        }
    }

    dirs.into_iter()
        .filter(|dir| !parents.contains(dir))
        .collect()
}
