//! Error types for the review-sentiment crate

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading / writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Token pattern failed to compile
    #[error("Invalid token pattern: {0}")]
    Regex(#[from] regex::Error),

    /// Expected column is absent from the input table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A row has no label but labels are required
    #[error("Missing label at row {row}")]
    MissingLabel { row: usize },

    /// Fitting left no terms: every document was empty, only held one-char
    /// tokens, or document-frequency bounds pruned every term
    #[error("Empty vocabulary: documents contain no usable terms after filtering")]
    EmptyVocabulary,

    /// Transform / predict called before fit
    #[error("Model has not been fitted yet")]
    NotFitted,

    /// The positional split left no training rows
    #[error("Training split is empty")]
    EmptyTrainingSplit,

    /// The positional split left no test rows
    #[error("Test split is empty (corpus has no rows past the training boundary)")]
    EmptyTestSplit,

    /// Two sequences that must be aligned have different lengths
    #[error("Length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Feature matrix has a different column space than the fitted model
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Classifier needs at least two classes in the training labels
    #[error("At least 2 classes are required, got {0}")]
    InsufficientClasses(usize),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
