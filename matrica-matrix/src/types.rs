//! Core matrix type: storage, allocation and resizing
//!
//! Rows are reference-counted buffers. A view shares row buffers with the
//! matrix it was taken from and sees it through a column offset; the first
//! write to a shared row through either matrix copies that row, so a view can
//! outlive or diverge from its source without aliasing hazards.

use std::ops::{Index, IndexMut};
use std::sync::Arc;
use matrica_core::{Axis, MatrixError, Result};
use serde::{Deserialize, Serialize};

pub(crate) type Row = Arc<Vec<f64>>;

/// Allocation state of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// No storage; the state of an empty or named matrix
    Unallocated,
    /// Only the row index exists; used while assembling a view
    RowIndex { rows: usize },
    /// Row index plus one buffer per row
    Full { rows: usize, cols: usize },
}

/// Dense matrix of f64 cells
#[derive(Debug)]
pub struct Matrix {
    pub(crate) name: String,
    pub(crate) shape: Shape,
    pub(crate) data: Vec<Row>,
    pub(crate) offset: usize,
    pub(crate) defined: bool,
    pub(crate) view: bool,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new()
    }
}

impl Matrix {
    // ============ Construction ============

    /// Unallocated, unnamed matrix
    pub fn new() -> Self {
        Self {
            name: String::new(),
            shape: Shape::Unallocated,
            data: Vec::new(),
            offset: 0,
            defined: false,
            view: false,
        }
    }

    /// Unallocated matrix carrying a display name
    pub fn named(name: &str) -> Self {
        Self::new().with_name(name)
    }

    /// Allocated but undefined matrix
    pub fn with_size(rows: usize, cols: usize) -> Self {
        let mut m = Self::new();
        m.data = (0..rows).map(|_| Arc::new(vec![0.0; cols])).collect();
        m.shape = Shape::Full { rows, cols };
        m
    }

    /// Matrix with every cell set to `value`
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        let mut m = Self::new();
        m.data = (0..rows).map(|_| Arc::new(vec![value; cols])).collect();
        m.shape = Shape::Full { rows, cols };
        m.defined = true;
        m
    }

    /// Matrix from row-major data
    pub fn from_slice(rows: usize, cols: usize, values: &[f64]) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(MatrixError::shape(
                "from_slice",
                "",
                format!("{} values cannot fill {}×{}", values.len(), rows, cols),
            ));
        }
        let mut m = Self::with_size(rows, cols);
        if cols > 0 {
            for (r, chunk) in values.chunks(cols).enumerate() {
                m.row_mut(r).copy_from_slice(chunk);
            }
        }
        m.defined = true;
        Ok(m)
    }

    /// Matrix from row-major integer data
    pub fn from_ints(rows: usize, cols: usize, values: &[i64]) -> Result<Self> {
        let values: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        Self::from_slice(rows, cols, &values)
    }

    /// Matrix from a list of equal-length rows
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(MatrixError::shape("from_rows", "", "empty data"));
        }
        let cols = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::shape(
                    "from_rows",
                    "",
                    format!("row {} has {} columns, expected {}", i, row.len(), cols),
                ));
            }
        }
        let mut m = Self::new();
        m.shape = Shape::Full { rows: rows.len(), cols };
        m.data = rows.into_iter().map(Arc::new).collect();
        m.defined = true;
        Ok(m)
    }

    /// Builder: set the display name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    // ============ Allocation ============

    /// Allocate storage, discarding any current contents.
    ///
    /// Negative rows and columns leave the matrix unallocated. Non-negative rows
    /// with negative columns allocate only the row index, the state a view is
    /// built from. Negative rows with non-negative columns are rejected.
    pub fn allocate(&mut self, rows: i64, cols: i64) -> Result<()> {
        if rows < 0 && cols >= 0 {
            return Err(MatrixError::shape(
                "allocate",
                &self.name,
                format!("illegal allocation {} x {}", rows, cols),
            ));
        }
        self.deallocate();
        if rows < 0 {
            return Ok(());
        }
        let r = rows as usize;
        if cols < 0 {
            self.data = Vec::with_capacity(r);
            self.shape = Shape::RowIndex { rows: r };
            self.view = true;
        } else {
            let c = cols as usize;
            self.data = (0..r).map(|_| Arc::new(vec![0.0; c])).collect();
            self.shape = Shape::Full { rows: r, cols: c };
        }
        tracing::debug!(name = %self.name, rows, cols, "allocate");
        Ok(())
    }

    /// Release storage and return to the unallocated state.
    ///
    /// Returns whether anything was released.
    pub fn deallocate(&mut self) -> bool {
        if self.shape == Shape::Unallocated {
            return false;
        }
        tracing::debug!(name = %self.name, view = self.view, "deallocate");
        self.data = Vec::new();
        self.shape = Shape::Unallocated;
        self.offset = 0;
        self.defined = false;
        self.view = false;
        true
    }

    /// Allocate to the given size unless already that size.
    ///
    /// A supplied name replaces the current one.
    pub fn reallocate(&mut self, rows: i64, cols: i64, name: Option<&str>) -> Result<()> {
        if let Some(n) = name {
            self.name = n.to_string();
        }
        if self.dims() == (rows, cols) {
            return Ok(());
        }
        tracing::debug!(name = %self.name, rows, cols, "reallocate");
        self.allocate(rows, cols)
    }

    /// Make self a copy of `other`, keeping the current name
    pub fn assign(&mut self, other: &Matrix) -> Result<&mut Self> {
        other.check_defined("assign")?;
        self.deallocate();
        self.data = other.iter_rows().map(|r| Arc::new(r.to_vec())).collect();
        self.shape = other.shape;
        self.defined = true;
        Ok(self)
    }

    // ============ Resizing ============

    /// Add columns filled with `fill`; new width must be larger
    pub fn widen(&mut self, new_cols: usize, fill: f64) -> Result<&mut Self> {
        self.check_defined("widen")?;
        let cols = self.cols();
        if new_cols <= cols {
            return Err(MatrixError::shape(
                "widen",
                &self.name,
                format!("new width {} is not larger than old width {}", new_cols, cols),
            ));
        }
        // Always fresh buffers, so cells cut off by an earlier narrow never reappear
        let fresh: Vec<Row> = self
            .iter_rows()
            .map(|r| {
                let mut row = Vec::with_capacity(new_cols);
                row.extend_from_slice(r);
                row.resize(new_cols, fill);
                Arc::new(row)
            })
            .collect();
        self.data = fresh;
        self.offset = 0;
        self.shape = Shape::Full { rows: self.rows(), cols: new_cols };
        Ok(self)
    }

    /// Add rows filled with `fill`; new length must be larger
    pub fn lengthen(&mut self, new_rows: usize, fill: f64) -> Result<&mut Self> {
        self.check_defined("lengthen")?;
        let rows = self.rows();
        if new_rows <= rows {
            return Err(MatrixError::shape(
                "lengthen",
                &self.name,
                format!("new length {} is not larger than old length {}", new_rows, rows),
            ));
        }
        self.compact();
        let cols = self.cols();
        self.data.extend((rows..new_rows).map(|_| Arc::new(vec![fill; cols])));
        self.shape = Shape::Full { rows: new_rows, cols };
        Ok(self)
    }

    /// Drop trailing columns, keeping `new_cols` (1..=cols)
    pub fn narrow(&mut self, new_cols: usize) -> Result<&mut Self> {
        self.check_defined("narrow")?;
        if new_cols == 0 {
            return Err(MatrixError::bounds("narrow", &self.name, Axis::Col, 0, self.cols()));
        }
        self.check_col_index(new_cols - 1, "narrow")?;
        self.shape = Shape::Full { rows: self.rows(), cols: new_cols };
        Ok(self)
    }

    /// Drop trailing rows, keeping `new_rows` (1..=rows)
    pub fn shorten(&mut self, new_rows: usize) -> Result<&mut Self> {
        self.check_defined("shorten")?;
        if new_rows == 0 {
            return Err(MatrixError::bounds("shorten", &self.name, Axis::Row, 0, self.rows()));
        }
        self.check_row_index(new_rows - 1, "shorten")?;
        self.data.truncate(new_rows);
        self.shape = Shape::Full { rows: new_rows, cols: self.cols() };
        Ok(self)
    }

    /// Rebuild rows so each buffer holds exactly the visible cells
    pub(crate) fn compact(&mut self) {
        let cols = self.cols();
        let off = self.offset;
        if off == 0 && self.data.iter().all(|r| r.len() == cols) {
            return;
        }
        for row in self.data.iter_mut() {
            *row = Arc::new(row[off..off + cols].to_vec());
        }
        self.offset = 0;
    }

    // ============ State ============

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Dimensions with -1 marking an absent extent
    pub fn dims(&self) -> (i64, i64) {
        match self.shape {
            Shape::Unallocated => (-1, -1),
            Shape::RowIndex { rows } => (rows as i64, -1),
            Shape::Full { rows, cols } => (rows as i64, cols as i64),
        }
    }

    /// Number of rows (0 when unallocated)
    pub fn rows(&self) -> usize {
        match self.shape {
            Shape::Unallocated => 0,
            Shape::RowIndex { rows } | Shape::Full { rows, .. } => rows,
        }
    }

    /// Number of columns (0 unless fully allocated)
    pub fn cols(&self) -> usize {
        match self.shape {
            Shape::Full { cols, .. } => cols,
            _ => 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn is_allocated(&self) -> bool {
        matches!(self.shape, Shape::Full { .. })
    }

    pub fn is_defined(&self) -> bool {
        self.defined && self.is_allocated()
    }

    /// Declare every cell written; fails unless allocated
    pub fn set_defined(&mut self) -> Result<()> {
        self.check_allocated("set_defined")?;
        self.defined = true;
        Ok(())
    }

    /// True when the rows were taken from another matrix and still may share storage
    pub fn is_view(&self) -> bool {
        self.view
    }

    pub fn is_row_vector(&self) -> bool {
        self.is_allocated() && self.rows() == 1
    }

    pub fn is_col_vector(&self) -> bool {
        self.is_allocated() && self.cols() == 1
    }

    pub fn is_square(&self) -> bool {
        self.is_allocated() && self.rows() == self.cols()
    }

    // ============ Element access ============

    pub fn get(&self, r: usize, c: usize) -> Result<f64> {
        self.check_index(r, c, "get")?;
        Ok(self[(r, c)])
    }

    pub fn set(&mut self, r: usize, c: usize, value: f64) -> Result<()> {
        self.check_index(r, c, "set")?;
        self[(r, c)] = value;
        Ok(())
    }

    pub fn inc(&mut self, r: usize, c: usize, value: f64) -> Result<()> {
        self.check_index(r, c, "inc")?;
        self[(r, c)] += value;
        Ok(())
    }

    pub fn dec(&mut self, r: usize, c: usize, value: f64) -> Result<()> {
        self.check_index(r, c, "dec")?;
        self[(r, c)] -= value;
        Ok(())
    }

    /// Visible cells of row `r`; panics when out of range
    pub fn row(&self, r: usize) -> &[f64] {
        let cols = self.cols();
        &self.data[r][self.offset..self.offset + cols]
    }

    /// Writable cells of row `r`, unsharing the row buffer first
    pub fn row_mut(&mut self, r: usize) -> &mut [f64] {
        let off = self.offset;
        let cols = self.cols();
        &mut Arc::make_mut(&mut self.data[r])[off..off + cols]
    }

    /// Copy of column `c`
    pub fn col(&self, c: usize) -> Result<Vec<f64>> {
        self.check_col_index(c, "col")?;
        Ok(self.iter_rows().map(|r| r[c]).collect())
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.data.len()).map(move |r| self.row(r))
    }

    /// All cells as owned rows
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    /// Copy of row `r` as a 1×C matrix
    pub fn row_matrix(&self, r: usize) -> Result<Matrix> {
        self.check_defined("row_matrix")?;
        self.check_row_index(r, "row_matrix")?;
        Matrix::from_rows(vec![self.row(r).to_vec()])
    }
}

impl Clone for Matrix {
    /// Always a full, owning copy
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            shape: self.shape,
            data: self.iter_rows().map(|r| Arc::new(r.to_vec())).collect(),
            offset: 0,
            defined: self.defined,
            view: false,
        }
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other).unwrap_or(false)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.row(r)[c]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        &mut self.row_mut(r)[c]
    }
}

/// Serialized form of a matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixRepr {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl From<&Matrix> for MatrixRepr {
    fn from(m: &Matrix) -> Self {
        Self {
            name: m.name.clone(),
            rows: m.rows(),
            cols: m.cols(),
            data: m.to_rows(),
        }
    }
}

impl TryFrom<MatrixRepr> for Matrix {
    type Error = MatrixError;

    fn try_from(repr: MatrixRepr) -> Result<Self> {
        if repr.data.len() != repr.rows {
            return Err(MatrixError::shape(
                "deserialize",
                &repr.name,
                format!("{} rows declared, {} present", repr.rows, repr.data.len()),
            ));
        }
        if let Some(i) = repr.data.iter().position(|r| r.len() != repr.cols) {
            return Err(MatrixError::shape(
                "deserialize",
                &repr.name,
                format!("row {} does not have {} columns", i, repr.cols),
            ));
        }
        let mut m = Matrix::with_size(repr.rows, repr.cols).with_name(&repr.name);
        m.data = repr.data.into_iter().map(Arc::new).collect();
        m.defined = true;
        Ok(m)
    }
}

impl Serialize for Matrix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        MatrixRepr::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Matrix {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = MatrixRepr::deserialize(deserializer)?;
        Matrix::try_from(repr).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_states() {
        let mut m = Matrix::named("a");
        assert_eq!(m.dims(), (-1, -1));
        assert!(!m.deallocate());

        m.allocate(3, -1).unwrap();
        assert_eq!(m.shape(), Shape::RowIndex { rows: 3 });
        assert!(!m.is_allocated());

        m.allocate(2, 3).unwrap();
        assert_eq!(m.dims(), (2, 3));
        assert!(!m.is_defined());
        assert!(m.deallocate());
        assert_eq!(m.dims(), (-1, -1));

        assert!(m.allocate(-1, 4).is_err());
    }

    #[test]
    fn test_reallocate_keeps_name() {
        let mut m = Matrix::filled(2, 2, 1.0).with_name("w");
        m.reallocate(2, 2, None).unwrap();
        assert!(m.is_defined());
        m.reallocate(3, 1, None).unwrap();
        assert_eq!(m.name(), "w");
        assert!(!m.is_defined());
        m.reallocate(3, 1, Some("v")).unwrap();
        assert_eq!(m.name(), "v");
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
        assert!(Matrix::from_rows(vec![]).is_err());
        assert!(Matrix::from_slice(2, 2, &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_widen_lengthen() {
        let mut m = Matrix::from_ints(2, 2, &[1, 2, 3, 4]).unwrap();
        m.widen(3, 9.0).unwrap();
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0, 9.0], vec![3.0, 4.0, 9.0]]);
        m.lengthen(3, 0.0).unwrap();
        assert_eq!(m.row(2), &[0.0, 0.0, 0.0]);
        assert!(m.widen(3, 0.0).is_err());
        assert!(m.lengthen(2, 0.0).is_err());
    }

    #[test]
    fn test_narrow_then_widen_uses_fill() {
        let mut m = Matrix::from_ints(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
        m.narrow(1).unwrap();
        assert_eq!(m.cols(), 1);
        m.widen(3, -1.0).unwrap();
        assert_eq!(m.to_rows(), vec![vec![1.0, -1.0, -1.0], vec![4.0, -1.0, -1.0]]);
    }

    #[test]
    fn test_shorten_then_lengthen_uses_fill() {
        let mut m = Matrix::from_ints(3, 1, &[1, 2, 3]).unwrap();
        m.shorten(1).unwrap();
        m.lengthen(3, 0.5).unwrap();
        assert_eq!(m.col(0).unwrap(), vec![1.0, 0.5, 0.5]);
        assert!(m.shorten(0).is_err());
        assert!(m.shorten(4).is_err());
        assert!(m.narrow(2).is_err());
    }

    #[test]
    fn test_assign_copies() {
        let src = Matrix::from_ints(1, 2, &[5, 6]).unwrap();
        let mut dst = Matrix::named("dst");
        dst.assign(&src).unwrap();
        assert_eq!(dst.name(), "dst");
        assert_eq!(dst.row(0), &[5.0, 6.0]);
        assert!(dst.assign(&Matrix::with_size(1, 1)).is_err());
    }

    #[test]
    fn test_element_access() {
        let mut m = Matrix::filled(2, 2, 0.0);
        m.set(0, 1, 2.0).unwrap();
        m.inc(0, 1, 1.0).unwrap();
        m.dec(1, 0, 4.0).unwrap();
        assert_eq!(m.get(0, 1).unwrap(), 3.0);
        assert_eq!(m[(1, 0)], -4.0);
        assert!(m.get(2, 0).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let m = Matrix::from_ints(2, 2, &[1, 2, 3, 4]).unwrap().with_name("m");
        let text = serde_json::to_string(&m).unwrap();
        let back: Matrix = serde_json::from_str(&text).unwrap();
        assert_eq!(back, m);
        assert_eq!(back.name(), "m");
        let bad = r#"{"rows":2,"cols":2,"data":[[1,2],[3]]}"#;
        assert!(serde_json::from_str::<Matrix>(bad).is_err());
    }
}
