//! Input discovery.
//!
//! Walks the input root and returns every HEIC/HEIF file in a deterministic
//! order. The list is recomputed fresh on every call, so a re-run always
//! reflects the current filesystem state.

use crate::naming::is_heic_path;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("input folder does not exist: {0}")]
    NotFound(PathBuf),
    #[error("input path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("IO error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Recursively collect all HEIC/HEIF files under `input_root`.
///
/// Ordering is lexicographic per directory (sorted traversal), so repeated
/// runs over an unchanged tree process files in the same order.
pub fn discover(input_root: &Path) -> Result<Vec<PathBuf>, DiscoverError> {
    if !input_root.exists() {
        return Err(DiscoverError::NotFound(input_root.to_path_buf()));
    }
    if !input_root.is_dir() {
        return Err(DiscoverError::NotADirectory(input_root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input_root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_heic_path(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
