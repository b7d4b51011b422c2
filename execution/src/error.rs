//! FILENAME: execution/src/error.rs

use thiserror::Error;

/// Failure to accept an execution triple or configuration at the input boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing field in {context}: {message}")]
    MissingField { context: String, message: String },

    #[error("Wrong type in {context}: {message}")]
    WrongType { context: String, message: String },

    #[error("Dimensionality mismatch in {context}: expected {expected}, found {actual}")]
    DimensionalityMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Malformed {context}: {message}")]
    Malformed { context: String, message: String },
}

impl ValidationError {
    /// Classifies a serde_json error raised while decoding `context`.
    pub fn from_serde(context: &str, err: &serde_json::Error) -> Self {
        let message = err.to_string();
        let context = context.to_string();
        if message.starts_with("missing field") {
            ValidationError::MissingField { context, message }
        } else if message.starts_with("invalid type")
            || message.starts_with("unknown variant")
            || message.starts_with("data did not match any variant")
        {
            ValidationError::WrongType { context, message }
        } else {
            ValidationError::Malformed { context, message }
        }
    }
}

/// Fatal transform failure. Returned as `Err`, never swallowed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Missing data: {0}")]
    MissingData(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unsupported sort: {0}")]
    UnsupportedSort(String),

    #[error("Unknown visualization type: {0}")]
    UnknownVisualizationType(String),
}

pub type TransformResult<T> = Result<T, TransformError>;

/// Format-pattern parse failure. Always recovered by the formatter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Unterminated bracket at position {0}")]
    UnterminatedBracket(usize),

    #[error("Unterminated quoted literal at position {0}")]
    UnterminatedQuote(usize),

    #[error("Invalid color value: {0}")]
    InvalidColor(String),
}
