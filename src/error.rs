//! Error types for the alignment engine.
//!
//! Only structural problems are errors. A source that has nothing to say about
//! a task, or that contradicts it, is reported through findings instead.

use std::path::PathBuf;

use thiserror::Error;

/// Failure raised out of the engine or its collaborators.
#[derive(Error, Debug)]
pub enum AlignError {
    /// A context bundle violates its structural contract.
    #[error("Malformed {source_name} bundle: {reason}")]
    MalformedInput {
        /// Which bundle was malformed.
        source_name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A file or directory could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A YAML document did not parse.
    #[error("YAML error in {path}: {source}")]
    Yaml {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration values are out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An external port (LLM, scorer) failed.
    #[error("Port error: {0}")]
    Port(String),
}

impl AlignError {
    /// Shorthand for a [`AlignError::MalformedInput`] on the named bundle.
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput { source_name: source_name.into(), reason: reason.into() }
    }
}

/// Result type for alignment operations
pub type Result<T> = std::result::Result<T, AlignError>;
