//! Matrica - Dense numeric matrices
//!
//! Re-exports the engine (`Matrix` and its operators), the shared core types
//! and the I/O adapters under one crate.
//!
//! ```
//! use matrica::prelude::*;
//!
//! let a = Matrix::from_ints(3, 3, &[1, 2, 4, 2, 2, 3, 4, 3, 3]).unwrap();
//! let mut inv = a.clone();
//! inv.inverse().unwrap();
//! let mut id = Matrix::with_size(3, 3);
//! id.identity().unwrap();
//! assert!(a.dot(&inv).unwrap().near_equal(1e-9, &id).unwrap());
//! ```

pub mod logging;

pub use matrica_core::{
    codes, Axis, MatrixError, PrintConfig, RandomSource, Randomizer, Result, SymbolTable,
    DEFAULT_SYMBOL_START,
};
pub use matrica_matrix::{floyd_sample, pythag, Matrix, MatrixRepr, Rendered, Shape, Style};
pub use matrica_io as io;
pub use matrica_io::{ImageKind, IoError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Matrix, MatrixError, PrintConfig, RandomSource, Randomizer, Result, Style, SymbolTable};
}
