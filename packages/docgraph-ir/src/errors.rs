//! Error types for docgraph-ir
//!
//! Provides unified error handling across the crate. Every variant aborts
//! the conversion of the current document; recoverable conditions are
//! reported as `ConversionWarning`s on the graph instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use docgraph_storage::StorageError;

/// Main error type for docgraph-ir operations
#[derive(Debug, Error)]
pub enum ExportError {
    /// No token of the document carries text
    #[error("Document '{document}' has no text")]
    NoText { document: String },

    /// Token without identifier while identifiers are required
    #[error("Token at position {position} of document '{document}' has no identifier; assign ids before converting")]
    MissingTokenId { document: String, position: usize },

    /// Reference to a token that was never registered
    #[error("Dangling reference to '{reference}' from {referrer}")]
    DanglingReference { reference: String, referrer: String },

    /// Two elements share an identifier
    #[error("Duplicate identifier '{id}'")]
    DuplicateIdentifier { id: String },

    /// IO error
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON document
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Malformed YAML document
    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Input path that is neither file nor directory
    #[error("File or directory not found: {0}")]
    NotFound(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Worker pool could not be started
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ExportError {
    pub fn dangling(reference: impl Into<String>, referrer: impl Into<String>) -> Self {
        ExportError::DanglingReference {
            reference: reference.into(),
            referrer: referrer.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }

    /// Errors caused by the document content rather than the environment
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            ExportError::NoText { .. }
                | ExportError::MissingTokenId { .. }
                | ExportError::DanglingReference { .. }
                | ExportError::DuplicateIdentifier { .. }
                | ExportError::Json { .. }
                | ExportError::Yaml { .. }
        )
    }
}

/// Result type alias for docgraph operations
pub type Result<T> = std::result::Result<T, ExportError>;
