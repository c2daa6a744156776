//! Error types for the SOM engine.

use thiserror::Error;

/// The main error type for SOM operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SomError {
    /// A vector's width does not match the dataset or grid it is used with.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The width the dataset or grid holds.
        expected: usize,
        /// The width of the offending vector.
        actual: usize,
    },

    /// Width queried on a dataset with no vectors.
    #[error("Dataset contains no vectors")]
    EmptyDataset,

    /// The selector has nothing left to hand out.
    #[error("No data left")]
    NoDataLeft,

    /// The grid has no neurons to pick a best matching unit from.
    #[error("Grid contains no neurons")]
    EmptyGrid,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for SOM operations.
pub type Result<T> = std::result::Result<T, SomError>;
