//! Error types for morph-retree.
//!
//! Every resource or treebank problem is fatal: loaders and the CoNLL-U
//! reader return a [`RetreeError`] carrying enough context (file, line) to
//! locate the offending record.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum RetreeError {
    /// IO error while reading a resource or writing the output treebank.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid JSON in a segmentation lexicon record.
    #[error("Invalid segmentation JSON in {resource} at line {line}: {source}")]
    Json {
        resource: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A resource line without the expected columns.
    #[error("Malformed record in {resource} at line {line}: {reason}")]
    MalformedRecord {
        resource: String,
        line: usize,
        reason: String,
    },

    /// A CoNLL-U line that cannot be read.
    #[error("Malformed CoNLL-U at line {line}: {reason}")]
    Conllu { line: usize, reason: String },

    /// A directive that does not fit the node it is applied to.
    #[error("Cannot split word {word_id}: {reason}")]
    InvalidSplit { word_id: usize, reason: String },

    /// JSON serialization of directives failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl RetreeError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RetreeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a malformed-record error.
    pub fn malformed(resource: &str, line: usize, reason: impl Into<String>) -> Self {
        RetreeError::MalformedRecord {
            resource: resource.to_string(),
            line,
            reason: reason.into(),
        }
    }
}

/// Result type alias for morph-retree operations.
pub type Result<T> = std::result::Result<T, RetreeError>;
