//! Error types for the partitioner.
//!
//! Uses the dual-error pattern: `PartitionError` for the command-line
//! surface, wrapping the engine's `EngineError` for anything the engine
//! reports itself.

use std::path::PathBuf;

use levelmark_engine::EngineError;
use thiserror::Error;

/// Main error type for the partitioner.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// Input folder does not exist or is not a directory.
    #[error("Input directory not found: {}", .0.display())]
    InputDirectory(PathBuf),

    /// Output folder does not exist or is not a directory.
    #[error("Output directory not found: {}", .0.display())]
    OutputDirectory(PathBuf),

    /// Recursive scan of the input folder failed.
    #[error("Failed to scan input directory: {0}")]
    Scan(#[from] walkdir::Error),

    /// A tree-bank file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A per-level corpus could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Engine error (resources, synthesis table, report JSON).
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for partitioner operations.
pub type Result<T> = std::result::Result<T, PartitionError>;
