//! Error types for the gridlearn crate

use thiserror::Error;

/// Main error type for the gridlearn crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unknown action index {index} (expected 0-4)")]
    UnknownAction { index: usize },

    #[error("invalid action '{input}'. Expected one of: {expected}")]
    ParseAction { input: String, expected: String },

    #[error("invalid reward policy '{input}'. Expected one of: {expected}")]
    ParseRewardPolicy { input: String, expected: String },

    #[error("invalid learning mode '{input}'. Expected one of: {expected}")]
    ParseLearningMode { input: String, expected: String },

    #[error("position ({x}, {z}) is outside the {length_x}x{length_z} grid")]
    PositionOutOfBounds {
        x: usize,
        z: usize,
        length_x: usize,
        length_z: usize,
    },

    #[error(
        "reward sequence around ({x}, {z}) does not fit in the {length_x}x{length_z} grid"
    )]
    SequenceOutOfBounds {
        x: usize,
        z: usize,
        length_x: usize,
        length_z: usize,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
