//! Closure-driven maps over cells, rows and columns
//!
//! In-place maps mutate the receiver and return it. `map_rows`,
//! `map_cols`, `cartesian_rows` and `series_sample_col` allocate a new
//! matrix for their result.

use matrica_core::{MatrixError, Result};
use crate::types::Matrix;

impl Matrix {
    /// Replace every cell x with f(x)
    pub fn map(&mut self, mut f: impl FnMut(f64) -> f64) -> Result<&mut Self> {
        self.check_defined("map")?;
        for r in 0..self.rows() {
            for x in self.row_mut(r) {
                *x = f(*x);
            }
        }
        Ok(self)
    }

    /// Replace every cell with f(r, c, x).
    ///
    /// Only allocation is required, so `f` may ignore x to initialise a
    /// fresh matrix; the result is marked defined.
    pub fn map_index(&mut self, mut f: impl FnMut(usize, usize, f64) -> f64) -> Result<&mut Self> {
        self.check_allocated("map_index")?;
        for r in 0..self.rows() {
            for (c, x) in self.row_mut(r).iter_mut().enumerate() {
                *x = f(r, c, *x);
            }
        }
        self.defined = true;
        Ok(self)
    }

    /// Replace the cells of column `c` with f(x)
    pub fn map_col_at(&mut self, c: usize, mut f: impl FnMut(f64) -> f64) -> Result<&mut Self> {
        self.check_defined("map_col_at")?;
        self.check_col_index(c, "map_col_at")?;
        for r in 0..self.rows() {
            let x = &mut self[(r, c)];
            *x = f(*x);
        }
        Ok(self)
    }

    /// Hand each row to `f`, which may rewrite it
    pub fn map_each_row(&mut self, mut f: impl FnMut(&mut [f64])) -> Result<&mut Self> {
        self.check_defined("map_each_row")?;
        for r in 0..self.rows() {
            f(self.row_mut(r));
        }
        Ok(self)
    }

    /// Like `map_each_row`, also passing the row index
    pub fn map_each_row_index(&mut self, mut f: impl FnMut(usize, &mut [f64])) -> Result<&mut Self> {
        self.check_defined("map_each_row_index")?;
        for r in 0..self.rows() {
            f(r, self.row_mut(r));
        }
        Ok(self)
    }

    /// Hand a copy of each column to `f`; the matrix is not changed
    pub fn map_each_col(&self, mut f: impl FnMut(&[f64])) -> Result<&Self> {
        self.check_defined("map_each_col")?;
        let mut buf = vec![0.0; self.rows()];
        for c in 0..self.cols() {
            for (b, row) in buf.iter_mut().zip(self.iter_rows()) {
                *b = row[c];
            }
            f(&buf);
        }
        Ok(self)
    }

    /// R×1 column of f(row)
    pub fn map_rows(&self, mut f: impl FnMut(&[f64]) -> f64) -> Result<Matrix> {
        self.check_defined("map_rows")?;
        let mut out = Matrix::with_size(self.rows(), 1);
        for r in 0..self.rows() {
            out[(r, 0)] = f(self.row(r));
        }
        out.defined = true;
        Ok(out)
    }

    /// 1×C row of f(column)
    pub fn map_cols(&self, mut f: impl FnMut(&[f64]) -> f64) -> Result<Matrix> {
        self.check_defined("map_cols")?;
        let mut out = Matrix::with_size(1, self.cols());
        let mut buf = vec![0.0; self.rows()];
        for c in 0..self.cols() {
            for (b, row) in buf.iter_mut().zip(self.iter_rows()) {
                *b = row[c];
            }
            out[(0, c)] = f(&buf);
        }
        out.defined = true;
        Ok(out)
    }

    /// R×R' grid with cell (i, j) = f(row i of self, row j of other)
    pub fn cartesian_rows(&self, other: &Matrix, mut f: impl FnMut(&[f64], &[f64]) -> f64) -> Result<Matrix> {
        self.check_defined("cartesian_rows")?;
        other.check_defined("cartesian_rows")?;
        self.check_cols_equal(other, "cartesian_rows")?;
        let mut out = Matrix::with_size(self.rows(), other.rows());
        for i in 0..self.rows() {
            let a = self.row(i);
            let cells: Vec<f64> = other.iter_rows().map(|b| f(a, b)).collect();
            out.row_mut(i).copy_from_slice(&cells);
        }
        out.defined = true;
        Ok(out)
    }

    /// Sliding windows over column `col` treated as a time series.
    ///
    /// Row r of the result holds col[r], col[r + stride], ...,
    /// col[r + num_steps·stride]: num_steps inputs followed by the target.
    pub fn series_sample_col(&self, col: usize, num_steps: usize, stride: usize) -> Result<Matrix> {
        self.check_defined("series_sample_col")?;
        self.check_col_index(col, "series_sample_col")?;
        // a zero stride would repeat one row num_steps + 1 times
        let span = num_steps
            .checked_mul(stride)
            .filter(|&span| stride > 0 && span < self.rows());
        let Some(span) = span else {
            return Err(MatrixError::shape(
                "series_sample_col",
                &self.name,
                format!(
                    "{} steps of stride {} do not fit in {} rows",
                    num_steps,
                    stride,
                    self.rows()
                ),
            ));
        };
        let mut out = Matrix::with_size(self.rows() - span, num_steps + 1);
        for r in 0..out.rows() {
            for c in 0..=num_steps {
                out[(r, c)] = self.row(r + c * stride)[col];
            }
        }
        out.defined = true;
        Ok(out)
    }
}
