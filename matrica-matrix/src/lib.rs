//! Matrica Matrix - Dense matrix engine
//!
//! Provides the `Matrix` type and its operators:
//! - Ownership core (allocation, resizing, copy-on-write views)
//! - Elementwise, scalar and broadcast arithmetic, products
//! - Reductions and normalization
//! - Structural operators (extract, insert, transpose, joins, selection)
//! - Closure maps over cells, rows and columns
//! - Row sorting, top-k selection, sampling and shuffling
//! - Gauss-Jordan elimination, LU, and the symmetric eigen solver
//! - Text rendering and nalgebra conversion
//!
//! Every fallible operation returns `matrica_core::Result`.

mod types;
mod helpers;
mod construct;
mod ops;
mod vector_ops;
mod props;
mod norms;
mod structure;
mod views;
mod map;
mod order;
mod sample;
mod solve;
mod decompose;
mod display;
mod convert;

pub use types::{Matrix, MatrixRepr, Shape};
pub use helpers::check_random;
pub use sample::floyd_sample;
pub use decompose::pythag;
pub use display::{Rendered, Style};
