//! Recursive discovery of tree-bank files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::validate_input_dir;
use crate::error::Result;

/// Every regular file below `dir`, in sorted path order.
///
/// # Errors
///
/// Returns `InputDirectory` if `dir` is not a directory and `Scan` if a
/// directory below it cannot be read.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    validate_input_dir(dir)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    tracing::debug!(dir = %dir.display(), count = files.len(), "Collected input files");
    Ok(files)
}
