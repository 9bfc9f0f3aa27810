//! Configuration constants and validation functions for the partitioner.

use std::path::Path;

use levelmark_engine::Level;

use crate::error::{PartitionError, Result};

/// Directory per-level corpora are written to when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// File name prefix of a per-level corpus.
pub const LEVEL_FILE_PREFIX: &str = "level_";

/// File extension of a per-level corpus.
pub const LEVEL_FILE_EXTENSION: &str = "conllu";

/// File name of the corpus for `level`, e.g. `level_4.conllu`.
#[must_use]
pub fn level_file_name(level: Level) -> String {
    format!("{LEVEL_FILE_PREFIX}{level}.{LEVEL_FILE_EXTENSION}")
}

/// Check that the input folder exists and is a directory.
///
/// # Errors
///
/// Returns `InputDirectory` otherwise.
pub fn validate_input_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(PartitionError::InputDirectory(path.to_path_buf()))
    }
}

/// Check that the output folder exists and is a directory.
///
/// # Errors
///
/// Returns `OutputDirectory` otherwise.
pub fn validate_output_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(PartitionError::OutputDirectory(path.to_path_buf()))
    }
}
