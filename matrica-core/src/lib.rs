//! Matrica Core - Shared types
//!
//! This crate provides the types the matrix engine and its adapters share:
//! - `MatrixError`: error taxonomy for every fallible operation
//! - `PrintConfig`: formatting options passed to printing calls
//! - `RandomSource` / `Randomizer`: explicitly initialized random draws
//! - `SymbolTable`: string to integer codes for labeled data

pub mod error;
mod config;
mod random;
mod symbols;

pub use error::{Axis, MatrixError, codes};
pub use config::PrintConfig;
pub use random::{RandomSource, Randomizer};
pub use symbols::{SymbolTable, DEFAULT_SYMBOL_START};

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, MatrixError>;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{MatrixError, PrintConfig, RandomSource, Randomizer, Result, SymbolTable};
}
