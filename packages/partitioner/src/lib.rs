//! Levelmark Partitioner - mark tree banks and divide them by level.
//!
//! This crate drives the engine over files and splits marked tree banks
//! into one corpus per level.
//!
//! # Example
//!
//! ```
//! use levelmark_partitioner::{config, LevelPartition};
//!
//! let marked = "# sent_id = s1\n# text = Koer jooksis.\n\
//! 1\tKoer\tkoer\tNOUN\tS\tCase=Nom\t2\tnsubj\t_\tLvl=1,13\n\
//! 2\tjooksis\tjooksma\tVERB\tV\t_\t0\troot\t_\tLvl=1,13\n";
//!
//! let mut partition = LevelPartition::new();
//! partition.add_document(marked);
//! let levels: Vec<String> = partition.levels().map(config::level_file_name).collect();
//! assert_eq!(levels, ["level_1.conllu", "level_13.conllu"]);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Output naming and directory validation
//! - [`error`]: Error types and Result alias
//! - [`scan`]: Recursive input discovery
//! - [`partition`]: Level extraction, bucketing and per-level output
//! - [`cli`]: Command-line interface (`mark`, `divide`)

pub mod cli;
pub mod config;
pub mod error;
pub mod partition;
pub mod scan;

// Re-export commonly used items
pub use config::level_file_name;
pub use error::{PartitionError, Result};
pub use partition::{extract_levels, LevelPartition, WrittenLevel};
pub use scan::collect_files;
