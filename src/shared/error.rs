//! Error types for the depth engine.

use crate::domain::validation::LevelValidationError;
use thiserror::Error;

/// Failures while turning a raw frame into a book change.
///
/// None of these are fatal. A parse failure drops the whole frame, an
/// invariant violation drops only the offending level.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Frame is not valid JSON or does not have the expected shape.
    #[error("malformed feed message: {0}")]
    Parse(#[from] serde_json::Error),

    /// One level of a parsed frame that the book must not hold.
    #[error("invariant violation: {0}")]
    InvariantViolation(#[from] LevelValidationError),

    /// Reported by the transport collaborator; the engine only resets.
    #[error("transport error: {0}")]
    Transport(String),
}

impl FeedError {
    /// Label used for the errors metric
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::Parse(_) => "parse",
            FeedError::InvariantViolation(_) => "invariant",
            FeedError::Transport(_) => "transport",
        }
    }
}

/// Rejected engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Format(#[from] serde_json::Error),
}
