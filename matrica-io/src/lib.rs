//! Matrica IO - Reading and writing matrices
//!
//! - `text`: whitespace-separated text with an "R C" header, plus labeled
//!   variants that map string cells through a `SymbolTable`
//! - `image`: 8 bit PGM/PPM in ASCII and binary variants
//!
//! Readers take any `std::io::Read` and writers any `std::io::Write`; the
//! `load`/`save` helpers open files.

mod error;
mod tokenizer;
pub mod text;
pub mod image;

pub use error::IoError;
pub use tokenizer::Tokenizer;
pub use text::{
    load, read_labeled_rows, read_matrix, read_matrix_transposed, read_raw, read_strings, save,
    write_line, write_matrix,
};
pub use image::{byte_value, read_image, read_pgm, read_ppm, write_pgm, write_ppm, ImageKind};
