//! Error type for reading and writing matrices

use matrica_core::MatrixError;
use thiserror::Error;

/// Error type for matrix I/O
#[derive(Debug, Error)]
pub enum IoError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error("wrong magic number: expected one of {expected}, found \"{found}\"")]
    BadMagic { expected: String, found: String },

    #[error("unsupported maximum pixel value {0}; only 8 bit images are supported")]
    Depth(usize),
}

impl IoError {
    /// The wrapped matrix error, if this is one
    pub fn as_matrix_error(&self) -> Option<&MatrixError> {
        match self {
            IoError::Matrix(e) => Some(e),
            _ => None,
        }
    }
}
