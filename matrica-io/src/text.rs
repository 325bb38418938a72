//! Plain-text matrix format
//!
//! A matrix is written as its row and column counts followed by the cells
//! in row-major order, all whitespace separated:
//!
//! ```text
//! 2 3
//! 1 2 3
//! 4 5 6
//! ```
//!
//! Labeled variants read a string token in place of some cells and store
//! its `SymbolTable` code.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use matrica_core::{PrintConfig, SymbolTable};
use matrica_matrix::Matrix;
use crate::error::IoError;
use crate::tokenizer::Tokenizer;

/// Significant digits written by `write_matrix`
const WRITE_DIGITS: usize = 15;

#[derive(Clone, Copy, PartialEq)]
enum Cells {
    Numbers,
    LabeledRows,
    Strings,
}

fn read_cells(
    tok: &mut Tokenizer,
    rows: usize,
    cols: usize,
    cells: Cells,
    mut symbols: Option<&mut SymbolTable>,
    op: &'static str,
) -> Result<Matrix, IoError> {
    // grow with the input so a lying header runs out of cells, not memory
    let mut data = Vec::new();
    for _ in 0..rows {
        let mut row = Vec::new();
        for c in 0..cols {
            let symbolic = cells == Cells::Strings || (cells == Cells::LabeledRows && c == 0);
            row.push(match symbols.as_deref_mut() {
                Some(table) if symbolic => table.add(&tok.word(op)?) as f64,
                _ => tok.f64(op)?,
            });
        }
        data.push(row);
    }
    let m = assemble(data, cols)?;
    tracing::debug!(rows, cols, op, "read matrix");
    Ok(m)
}

/// Defined matrix from fully read rows of `cols` cells each
pub(crate) fn assemble(data: Vec<Vec<f64>>, cols: usize) -> Result<Matrix, IoError> {
    if data.is_empty() {
        let mut m = Matrix::with_size(0, cols);
        m.set_defined()?;
        return Ok(m);
    }
    Ok(Matrix::from_rows(data)?)
}

fn read_header(tok: &mut Tokenizer, op: &'static str) -> Result<(usize, usize), IoError> {
    let rows = tok.usize(op, "row count")?;
    let cols = tok.usize(op, "column count")?;
    Ok((rows, cols))
}

/// Read a matrix with its "R C" header
pub fn read_matrix(reader: impl Read) -> Result<Matrix, IoError> {
    let mut tok = Tokenizer::from_reader(reader)?;
    let (rows, cols) = read_header(&mut tok, "read_matrix")?;
    read_cells(&mut tok, rows, cols, Cells::Numbers, None, "read_matrix")
}

/// Read a matrix with its header and return its transpose
pub fn read_matrix_transposed(reader: impl Read) -> Result<Matrix, IoError> {
    Ok(read_matrix(reader)?.transpose()?)
}

/// Read rows × cols cells with no header
pub fn read_raw(reader: impl Read, rows: usize, cols: usize) -> Result<Matrix, IoError> {
    let mut tok = Tokenizer::from_reader(reader)?;
    read_cells(&mut tok, rows, cols, Cells::Numbers, None, "read_raw")
}

/// Read a matrix whose rows each start with a label.
///
/// The header's column count includes the label column; column 0 of the
/// result holds each label's symbol code.
pub fn read_labeled_rows(reader: impl Read, symbols: &mut SymbolTable) -> Result<Matrix, IoError> {
    let mut tok = Tokenizer::from_reader(reader)?;
    let (rows, cols) = read_header(&mut tok, "read_labeled_rows")?;
    read_cells(&mut tok, rows, cols, Cells::LabeledRows, Some(symbols), "read_labeled_rows")
}

/// Read a matrix in which every cell is a string
pub fn read_strings(reader: impl Read, symbols: &mut SymbolTable) -> Result<Matrix, IoError> {
    let mut tok = Tokenizer::from_reader(reader)?;
    let (rows, cols) = read_header(&mut tok, "read_strings")?;
    read_cells(&mut tok, rows, cols, Cells::Strings, Some(symbols), "read_strings")
}

/// Write the header and cells in a form `read_matrix` reads back
pub fn write_matrix(m: &Matrix, mut w: impl Write) -> Result<(), IoError> {
    m.check_defined("write_matrix")?;
    writeln!(w, "{} {}", m.rows(), m.cols())?;
    for row in m.iter_rows() {
        for &x in row {
            write!(w, "{} ", format_g(x, WRITE_DIGITS))?;
        }
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}

/// Write row `r` with the configured real format, without a newline
pub fn write_line(m: &Matrix, r: usize, config: &PrintConfig, mut w: impl Write) -> Result<(), IoError> {
    m.check_defined("write_line")?;
    m.check_index(r, 0, "write_line")?;
    for &x in m.row(r) {
        w.write_all(config.real(x).as_bytes())?;
    }
    Ok(())
}

/// Read a matrix file
pub fn load(path: impl AsRef<Path>) -> Result<Matrix, IoError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "load");
    read_matrix(BufReader::new(File::open(path)?))
}

/// Write a matrix file, replacing any existing one
pub fn save(path: impl AsRef<Path>, m: &Matrix) -> Result<(), IoError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), name = m.name(), "save");
    write_matrix(m, BufWriter::new(File::create(path)?))
}

/// Shortest of fixed and scientific notation with `precision`
/// significant digits and no trailing zeros
pub fn format_g(x: f64, precision: usize) -> String {
    if x == 0.0 || !x.is_finite() {
        return format!("{}", x);
    }
    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, x);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((&sci, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, x)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrica_core::MatrixError;

    #[test]
    fn test_read_matrix() {
        let m = read_matrix("2 3\n1 2 3\n4 5.5 -6\n".as_bytes()).unwrap();
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.5, -6.0]]);
        assert!(m.is_defined());
    }

    #[test]
    fn test_read_errors() {
        let eof = read_matrix("2 2\n1 2 3".as_bytes()).unwrap_err();
        assert!(matches!(eof.as_matrix_error(), Some(MatrixError::UnexpectedEof { .. })));
        let bad = read_matrix("1 2\n1 x".as_bytes()).unwrap_err();
        assert!(matches!(bad.as_matrix_error(), Some(MatrixError::Parse { line: 2, .. })));
        assert!(read_matrix("-1 2".as_bytes()).is_err());
    }

    #[test]
    fn test_header_larger_than_input() {
        let err = read_matrix("4000000000 4000000000".as_bytes()).unwrap_err();
        assert!(matches!(err.as_matrix_error(), Some(MatrixError::UnexpectedEof { .. })));
        let err = read_matrix("1 18446744073709551615 1 2".as_bytes()).unwrap_err();
        assert!(matches!(err.as_matrix_error(), Some(MatrixError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_empty_shapes() {
        let m = read_matrix("0 3".as_bytes()).unwrap();
        assert_eq!((m.rows(), m.cols()), (0, 3));
        assert!(m.is_defined());
        let m = read_raw("".as_bytes(), 2, 0).unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 0));
    }

    #[test]
    fn test_transposed_and_raw() {
        let t = read_matrix_transposed("2 3 1 2 3 4 5 6".as_bytes()).unwrap();
        assert_eq!(t.to_rows(), vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
        let r = read_raw("7 8".as_bytes(), 2, 1).unwrap();
        assert_eq!(r.col(0).unwrap(), vec![7.0, 8.0]);
    }

    #[test]
    fn test_labeled_rows() {
        let mut symbols = SymbolTable::with_start(1000);
        let m = read_labeled_rows("3 3\nred 1 2\nblue 3 4\nred 5 6\n".as_bytes(), &mut symbols).unwrap();
        assert_eq!(m.col(0).unwrap(), vec![1000.0, 1001.0, 1000.0]);
        assert_eq!(m.row(2), &[1000.0, 5.0, 6.0]);
        assert_eq!(symbols.name(1001), Some("blue"));
    }

    #[test]
    fn test_read_strings() {
        let mut symbols = SymbolTable::new();
        let m = read_strings("2 2 a b b a".as_bytes(), &mut symbols).unwrap();
        assert_eq!(m.to_rows(), vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
        assert_eq!(symbols.len(), 2);
    }

    #[test]
    fn test_write_roundtrip() {
        let m = Matrix::from_slice(2, 2, &[0.1, -2.0, 1e-7, 123456.75]).unwrap();
        let mut out = Vec::new();
        write_matrix(&m, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "2 2\n0.1 -2 \n1e-07 123456.75 \n");
        assert_eq!(read_matrix(text.as_bytes()).unwrap(), m);
    }

    #[test]
    fn test_write_line() {
        let m = Matrix::from_ints(2, 2, &[1, 2, 3, 4]).unwrap();
        let mut out = Vec::new();
        write_line(&m, 1, &PrintConfig::default().with_real_format(4, 1), &mut out).unwrap();
        assert_eq!(out, b" 3.0  4.0 ");
        assert!(write_line(&m, 2, &PrintConfig::default(), &mut Vec::new()).is_err());
    }

    #[test]
    fn test_format_g() {
        assert_eq!(format_g(1.0 / 3.0, 15), "0.333333333333333");
        assert_eq!(format_g(2.5e20, 15), "2.5e+20");
        assert_eq!(format_g(-0.00012, 15), "-0.00012");
        assert_eq!(format_g(100.0, 3), "100");
        assert_eq!(format_g(1000.0, 3), "1e+03");
        assert_eq!(format_g(0.0, 15), "0");
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("matrica-text-{}.txt", std::process::id()));
        let m = Matrix::from_ints(1, 3, &[7, 8, 9]).unwrap();
        save(&path, &m).unwrap();
        assert_eq!(load(&path).unwrap(), m);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(load(&path), Err(IoError::Io(_))));
    }
}
