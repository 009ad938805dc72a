//! Error types for the codaln library.

use thiserror::Error;

/// Errors that can occur during codaln operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// A validation constraint was violated.
    #[error("{0}")]
    Validation(String),

    /// A retained species is not a leaf of the source tree.
    /// The pipeline skips the affected gene rather than aborting the run.
    #[error("species '{0}' is not a leaf of the source tree")]
    MissingTreeLeaf(String),
}
