//! Structural operators: extraction, insertion, transposition, joins and
//! row/column selection
//!
//! Everything here that returns a matrix returns a new owning matrix that
//! is independent of the receiver.

use std::sync::Arc;
use matrica_core::{Axis, MatrixError, Result};
use crate::types::{Matrix, Shape};

impl Matrix {
    /// Resolve a (min, size) pair where size 0 means "to the end"
    pub(crate) fn resolve_block(
        &self,
        min_r: usize,
        min_c: usize,
        size_r: usize,
        size_c: usize,
        op: &'static str,
    ) -> Result<(usize, usize)> {
        self.check_index(min_r, min_c, op)?;
        let (room_r, room_c) = (self.rows() - min_r, self.cols() - min_c);
        let size_r = if size_r == 0 { room_r } else { size_r };
        let size_c = if size_c == 0 { room_c } else { size_c };
        if size_r > room_r {
            let last = min_r.saturating_add(size_r - 1);
            return Err(MatrixError::bounds(op, &self.name, Axis::Row, last, self.rows()));
        }
        if size_c > room_c {
            let last = min_c.saturating_add(size_c - 1);
            return Err(MatrixError::bounds(op, &self.name, Axis::Col, last, self.cols()));
        }
        Ok((size_r, size_c))
    }

    /// Copy of the block at (min_r, min_c); a size of 0 extends to the edge
    pub fn extract(&self, min_r: usize, min_c: usize, size_r: usize, size_c: usize) -> Result<Matrix> {
        self.check_defined("extract")?;
        let (size_r, size_c) = self.resolve_block(min_r, min_c, size_r, size_c, "extract")?;
        let rows: Vec<Vec<f64>> = (min_r..min_r + size_r)
            .map(|r| self.row(r)[min_c..min_c + size_c].to_vec())
            .collect();
        Matrix::from_rows(rows)
    }

    /// Like `extract`, writing into an already allocated `out`
    pub fn extract_into(
        &self,
        min_r: usize,
        min_c: usize,
        size_r: usize,
        size_c: usize,
        out: &mut Matrix,
    ) -> Result<()> {
        self.check_defined("extract_into")?;
        let (size_r, size_c) = self.resolve_block(min_r, min_c, size_r, size_c, "extract_into")?;
        out.check_size(size_r, size_c, "extract_into")?;
        for r in 0..size_r {
            out.row_mut(r).copy_from_slice(&self.row(min_r + r)[min_c..min_c + size_c]);
        }
        out.defined = true;
        Ok(())
    }

    /// Every `step_r`-th row and `step_c`-th column starting at (min_r, min_c)
    pub fn extract_stride(&self, min_r: usize, min_c: usize, step_r: usize, step_c: usize) -> Result<Matrix> {
        self.check_defined("extract_stride")?;
        self.check_index(min_r, min_c, "extract_stride")?;
        if step_r == 0 || step_c == 0 {
            return Err(MatrixError::domain("extract_stride", "strides must be positive"));
        }
        let rows: Vec<Vec<f64>> = (min_r..self.rows())
            .step_by(step_r)
            .map(|r| self.row(r)[min_c..].iter().step_by(step_c).copied().collect())
            .collect();
        Matrix::from_rows(rows)
    }

    /// Copy `other` into self with its corner at (min_r, min_c).
    ///
    /// Cells of `other` that land outside self are skipped.
    pub fn insert(&mut self, other: &Matrix, min_r: usize, min_c: usize) -> Result<&mut Self> {
        other.check_defined("insert")?;
        self.check_index(min_r, min_c, "insert")?;
        let rows = other.rows().min(self.rows() - min_r);
        let cols = other.cols().min(self.cols() - min_c);
        if rows < other.rows() || cols < other.cols() {
            tracing::debug!(name = %self.name, rows, cols, "insert clipped");
        }
        for r in 0..rows {
            self.row_mut(min_r + r)[min_c..min_c + cols].copy_from_slice(&other.row(r)[..cols]);
        }
        Ok(self)
    }

    /// Overwrite row `r` with row vector `v`
    pub fn insert_row_vector(&mut self, r: usize, v: &Matrix) -> Result<&mut Self> {
        v.check_defined("insert_row_vector")?;
        v.check_row_vector("insert_row_vector")?;
        self.check_cols_equal(v, "insert_row_vector")?;
        self.check_index(r, 0, "insert_row_vector")?;
        self.row_mut(r).copy_from_slice(v.row(0));
        Ok(self)
    }

    // ============ Transpose ============

    pub fn transpose(&self) -> Result<Matrix> {
        self.check_defined("transpose")?;
        let mut out = Matrix::with_size(self.cols(), self.rows());
        for (r, row) in self.iter_rows().enumerate() {
            for (c, &x) in row.iter().enumerate() {
                out[(c, r)] = x;
            }
        }
        out.defined = true;
        Ok(out)
    }

    /// Transpose in place; non-square matrices get fresh storage
    pub fn transpose_self(&mut self) -> Result<&mut Self> {
        self.check_defined("transpose_self")?;
        if self.rows() == self.cols() {
            for r in 0..self.rows() {
                for c in r + 1..self.cols() {
                    let t = self[(r, c)];
                    self[(r, c)] = self[(c, r)];
                    self[(c, r)] = t;
                }
            }
        } else {
            let t = self.transpose()?;
            self.data = t.data;
            self.shape = t.shape;
            self.offset = 0;
            self.view = false;
        }
        Ok(self)
    }

    // ============ Joins ============

    /// Columns of other appended to the right; an undefined self yields a copy of other
    pub fn join_right(&self, other: &Matrix) -> Result<Matrix> {
        other.check_defined("join_right")?;
        if !self.is_defined() {
            return Ok(other.clone());
        }
        self.check_rows_equal(other, "join_right")?;
        let mut out = Matrix::new();
        out.data = self
            .iter_rows()
            .zip(other.iter_rows())
            .map(|(a, b)| Arc::new([a, b].concat()))
            .collect();
        out.shape = Shape::Full { rows: self.rows(), cols: self.cols() + other.cols() };
        out.defined = true;
        Ok(out)
    }

    /// Rows of other appended below; an undefined self yields a copy of other
    pub fn join_bottom(&self, other: &Matrix) -> Result<Matrix> {
        other.check_defined("join_bottom")?;
        if !self.is_defined() {
            return Ok(other.clone());
        }
        self.check_cols_equal(other, "join_bottom")?;
        let mut out = self.clone();
        out.data.extend(other.iter_rows().map(|r| Arc::new(r.to_vec())));
        out.shape = Shape::Full { rows: self.rows() + other.rows(), cols: self.cols() };
        Ok(out)
    }

    // ============ Selection ============

    /// New matrix built from the listed columns, in list order
    pub fn index_cols(&self, indices: &[usize]) -> Result<Matrix> {
        self.check_defined("index_cols")?;
        for &i in indices {
            self.check_col_index(i, "index_cols")?;
        }
        let mut out = Matrix::with_size(self.rows(), indices.len());
        for r in 0..self.rows() {
            let src = self.row(r);
            for (o, &i) in out.row_mut(r).iter_mut().zip(indices) {
                *o = src[i];
            }
        }
        out.defined = true;
        Ok(out)
    }

    /// Like `index_cols`, with the indices held in a row vector
    pub fn index_cols_by(&self, row_of_indices: &Matrix) -> Result<Matrix> {
        row_of_indices.check_defined("index_cols_by")?;
        row_of_indices.check_row_vector("index_cols_by")?;
        let mut indices = Vec::with_capacity(row_of_indices.cols());
        for &v in row_of_indices.row(0) {
            if v < 0.0 || v.fract() != 0.0 {
                return Err(MatrixError::domain("index_cols_by", format!("{} is not a column index", v)));
            }
            indices.push(v as usize);
        }
        self.index_cols(&indices)
    }

    /// Copies of the rows of self whose entry in column `match_col` of
    /// `list` equals `value`. The result may have zero rows.
    pub fn pick_rows(&self, value: f64, list: &Matrix, match_col: usize) -> Result<Matrix> {
        self.check_defined("pick_rows")?;
        list.check_defined("pick_rows")?;
        self.check_rows_equal(list, "pick_rows")?;
        list.check_col_index(match_col, "pick_rows")?;
        let data: Vec<_> = self
            .iter_rows()
            .zip(list.iter_rows())
            .filter(|(_, l)| l[match_col] == value)
            .map(|(r, _)| Arc::new(r.to_vec()))
            .collect();
        let mut out = Matrix::new();
        out.shape = Shape::Full { rows: data.len(), cols: self.cols() };
        out.data = data;
        out.defined = true;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nine() -> Matrix {
        Matrix::from_ints(3, 3, &[1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap()
    }

    #[test]
    fn test_extract() {
        let m = nine();
        let e = m.extract(0, 0, 2, 2).unwrap();
        assert_eq!(e.to_rows(), vec![vec![1.0, 2.0], vec![4.0, 5.0]]);
        let tail = m.extract(1, 1, 0, 0).unwrap();
        assert_eq!(tail.to_rows(), vec![vec![5.0, 6.0], vec![8.0, 9.0]]);
        assert!(matches!(m.extract(2, 2, 2, 1), Err(MatrixError::Bounds { .. })));
        assert!(m.extract(3, 0, 1, 1).is_err());
    }

    #[test]
    fn test_oversized_block_is_bounds_error() {
        let m = Matrix::filled(3, 3, 1.0);
        let err = m.extract(1, 0, usize::MAX, 1).unwrap_err();
        assert!(matches!(err, MatrixError::Bounds { axis: Axis::Row, limit: 3, .. }));
        let err = m.extract(0, 2, 1, usize::MAX).unwrap_err();
        assert!(matches!(err, MatrixError::Bounds { axis: Axis::Col, limit: 3, .. }));
        let mut out = Matrix::with_size(1, 1);
        assert!(matches!(m.extract_into(2, 2, usize::MAX, usize::MAX, &mut out), Err(MatrixError::Bounds { .. })));
        assert!(!out.is_defined());
    }

    #[test]
    fn test_extract_into_and_stride() {
        let m = nine();
        let mut out = Matrix::with_size(1, 3);
        m.extract_into(2, 0, 1, 0, &mut out).unwrap();
        assert_eq!(out.row(0), &[7.0, 8.0, 9.0]);
        assert!(out.is_defined());
        let s = m.extract_stride(0, 0, 2, 2).unwrap();
        assert_eq!(s.to_rows(), vec![vec![1.0, 3.0], vec![7.0, 9.0]]);
        let s = m.extract_stride(1, 1, 5, 1).unwrap();
        assert_eq!(s.to_rows(), vec![vec![5.0, 6.0]]);
    }

    #[test]
    fn test_insert_clips() {
        let mut m = Matrix::filled(3, 3, 0.0);
        m.insert(&Matrix::filled(2, 2, 1.0), 2, 2).unwrap();
        assert_eq!(m.sum().unwrap(), 1.0);
        assert_eq!(m[(2, 2)], 1.0);
        m.insert(&Matrix::filled(2, 2, 5.0), 0, 0).unwrap();
        assert_eq!(m.sum().unwrap(), 21.0);
        assert!(m.insert(&Matrix::filled(1, 1, 0.0), 3, 0).is_err());
    }

    #[test]
    fn test_insert_row_vector() {
        let mut m = nine();
        m.insert_row_vector(1, &Matrix::filled(1, 3, 0.0)).unwrap();
        assert_eq!(m.row(1), &[0.0, 0.0, 0.0]);
        assert!(m.insert_row_vector(0, &Matrix::filled(1, 2, 0.0)).is_err());
    }

    #[test]
    fn test_transpose() {
        let m = Matrix::from_ints(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
        let t = m.transpose().unwrap();
        assert_eq!(t.to_rows(), vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
        assert_eq!(t.transpose().unwrap(), m);

        let mut s = m.clone();
        s.transpose_self().unwrap();
        assert_eq!(s, t);
        let mut q = nine();
        q.transpose_self().unwrap();
        assert_eq!(q, nine().transpose().unwrap());
    }

    #[test]
    fn test_joins() {
        let a = Matrix::from_ints(2, 2, &[1, 2, 3, 4]).unwrap();
        let b = Matrix::from_ints(2, 1, &[5, 6]).unwrap();
        let j = a.join_right(&b).unwrap();
        assert_eq!(j.to_rows(), vec![vec![1.0, 2.0, 5.0], vec![3.0, 4.0, 6.0]]);
        let k = a.join_bottom(&Matrix::filled(1, 2, 0.0)).unwrap();
        assert_eq!(k.rows(), 3);
        assert_eq!(k.row(2), &[0.0, 0.0]);
        assert_eq!(a.row(1), &[3.0, 4.0]);
        assert!(a.join_bottom(&b).is_err());
        assert_eq!(Matrix::new().join_right(&b).unwrap(), b);
    }

    #[test]
    fn test_index_cols() {
        let m = nine();
        let picked = m.index_cols(&[2, 0, 2]).unwrap();
        assert_eq!(picked.row(0), &[3.0, 1.0, 3.0]);
        let by = Matrix::from_ints(1, 1, &[1]).unwrap();
        assert_eq!(m.index_cols_by(&by).unwrap().col(0).unwrap(), vec![2.0, 5.0, 8.0]);
        assert!(m.index_cols(&[3]).is_err());
        assert!(m.index_cols_by(&Matrix::from_slice(1, 1, &[0.5]).unwrap()).is_err());
    }

    #[test]
    fn test_pick_rows() {
        let m = nine();
        let labels = Matrix::from_ints(3, 2, &[0, 1, 9, 0, 0, 1]).unwrap();
        let p = m.pick_rows(1.0, &labels, 1).unwrap();
        assert_eq!(p.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![7.0, 8.0, 9.0]]);
        let none = m.pick_rows(42.0, &labels, 0).unwrap();
        assert_eq!(none.rows(), 0);
        assert_eq!(none.cols(), 3);
    }
}
