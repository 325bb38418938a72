//! Views: matrices whose rows share storage with another matrix
//!
//! A view holds clones of the source's row handles plus a column offset.
//! Writing through either side unshares the touched row, so the view and
//! its source never observe each other's later writes.

use std::sync::Arc;
use matrica_core::Result;
use crate::types::{Matrix, Row, Shape};

impl Matrix {
    fn view_of(&self, name: String, data: Vec<Row>, offset: usize, cols: usize) -> Matrix {
        let mut out = Matrix::named(&name);
        out.shape = Shape::Full { rows: data.len(), cols };
        out.data = data;
        out.offset = offset;
        out.defined = true;
        out.view = true;
        tracing::trace!(source = %self.name, rows = out.rows(), cols, "view");
        out
    }

    /// View of the block at (min_r, min_c); a size of 0 extends to the edge
    pub fn sub_matrix(&self, min_r: usize, min_c: usize, size_r: usize, size_c: usize) -> Result<Matrix> {
        self.check_defined("sub_matrix")?;
        let (size_r, size_c) = self.resolve_block(min_r, min_c, size_r, size_c, "sub_matrix")?;
        let data = self.data[min_r..min_r + size_r].to_vec();
        Ok(self.view_of(self.name.clone(), data, self.offset + min_c, size_c))
    }

    fn sub_matrix_where(&self, c: usize, op: &'static str, keep: impl Fn(f64) -> bool) -> Result<Matrix> {
        self.check_defined(op)?;
        self.check_col_index(c, op)?;
        let data: Vec<Row> = (0..self.rows())
            .filter(|&r| keep(self.row(r)[c]))
            .map(|r| Arc::clone(&self.data[r]))
            .collect();
        Ok(self.view_of(format!("sub{}", self.name), data, self.offset, self.cols()))
    }

    /// View of the rows whose column `c` equals `value`
    pub fn sub_matrix_eq(&self, c: usize, value: f64) -> Result<Matrix> {
        self.sub_matrix_where(c, "sub_matrix_eq", |x| x == value)
    }

    /// View of the rows whose column `c` differs from `value`
    pub fn sub_matrix_neq(&self, c: usize, value: f64) -> Result<Matrix> {
        self.sub_matrix_where(c, "sub_matrix_neq", |x| x != value)
    }

    /// View of the rows r for which `list[r][0] == value`.
    ///
    /// `list` is a column vector with one entry per row of self.
    pub fn sub_matrix_pick_rows(&self, value: f64, list: &Matrix) -> Result<Matrix> {
        self.check_defined("sub_matrix_pick_rows")?;
        list.check_defined("sub_matrix_pick_rows")?;
        list.check_col_vector("sub_matrix_pick_rows")?;
        self.check_rows_equal(list, "sub_matrix_pick_rows")?;
        let data: Vec<Row> = (0..self.rows())
            .filter(|&r| list.row(r)[0] == value)
            .map(|r| Arc::clone(&self.data[r]))
            .collect();
        Ok(self.view_of(self.name.clone(), data, self.offset, self.cols()))
    }

    /// Turn a view into an owning matrix with private row buffers
    pub fn materialize(&mut self) -> &mut Self {
        if self.view {
            self.data = self.iter_rows().map(|r| Arc::new(r.to_vec())).collect();
            self.offset = 0;
            self.view = false;
        }
        self
    }
}
