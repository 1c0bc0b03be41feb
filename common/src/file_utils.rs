//! File utility functions for listing files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Returns paths to all regular files directly inside `dir`, sorted by path.
/// Subdirectories are skipped, not descended into.
pub fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}
