//! Error types for the Levelmark engine

use std::path::PathBuf;

use thiserror::Error;

/// Structural problems that make a sentence unusable as a dependency tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// No word is attached to the synthetic root
    #[error("sentence has no root word")]
    NoRoot,

    /// More than one word is attached to the synthetic root
    #[error("sentence has {0} root words")]
    MultipleRoots(usize),

    /// The word attached to the synthetic root is not labelled `root`
    #[error("word {0} is attached to the root but labelled '{1}'")]
    RootRelation(usize, String),

    /// A head points outside the sentence
    #[error("word {word} has head {head} outside the sentence")]
    HeadOutOfRange { word: usize, head: usize },

    /// The head graph contains a cycle
    #[error("head cycle through word {0}")]
    Cycle(usize),

    /// Word ids are not 1, 2, 3, ... in order
    #[error("expected word id {expected}, found {found}")]
    NonContiguousIds { expected: usize, found: usize },

    /// Column could not be parsed as a number
    #[error("invalid {column} value '{value}'")]
    InvalidNumber { column: &'static str, value: String },

    /// Sentence block without any word rows
    #[error("sentence has no words")]
    Empty,
}

/// Failure of the external morphological synthesis capability
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// The backend has no forms for the lemma
    #[error("no forms for lemma '{lemma}' ({spec})")]
    UnknownLemma { lemma: String, spec: String },

    /// No backend is configured
    #[error("morphological synthesis is not available")]
    Unavailable,
}

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed dependency tree
    #[error("Malformed tree{}: {source}", .sent_id.as_ref().map(|id| format!(" in {id}")).unwrap_or_default())]
    MalformedTree {
        sent_id: Option<String>,
        #[source]
        source: TreeError,
    },

    /// Lexical resource or lookup table could not be loaded
    #[error("Failed to load resource {}: {source}", .path.display())]
    ResourceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Level code outside 1..=13
    #[error("Invalid level: '{0}'")]
    InvalidLevel(String),

    /// Report could not be serialized
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl EngineError {
    /// Wrap a tree error with the sentence it came from.
    pub fn malformed(sent_id: Option<&str>, source: TreeError) -> Self {
        Self::MalformedTree {
            sent_id: sent_id.map(String::from),
            source,
        }
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::InvalidLevel("14".to_string());
        assert_eq!(err.to_string(), "Invalid level: '14'");
    }

    #[test]
    fn test_malformed_with_sentence_id() {
        let err = EngineError::malformed(Some("doc1_s3"), TreeError::MultipleRoots(2));
        assert_eq!(
            err.to_string(),
            "Malformed tree in doc1_s3: sentence has 2 root words"
        );
    }

    #[test]
    fn test_malformed_without_sentence_id() {
        let err = EngineError::malformed(None, TreeError::NoRoot);
        assert_eq!(err.to_string(), "Malformed tree: sentence has no root word");
    }

    #[test]
    fn test_resource_load_display() {
        let err = EngineError::ResourceLoad {
            path: PathBuf::from("missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("missing.txt"));
    }
}
