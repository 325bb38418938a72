//! Broadcast arithmetic between a matrix and a row or column vector

use matrica_core::{MatrixError, Result};
use crate::types::Matrix;

impl Matrix {
    fn broadcast_row(
        &mut self,
        v: &Matrix,
        op: &'static str,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<&mut Self> {
        self.check_defined(op)?;
        v.check_defined(op)?;
        v.check_row_vector(op)?;
        self.check_cols_equal(v, op)?;
        let src = v.row(0);
        for r in 0..self.rows() {
            for (x, &y) in self.row_mut(r).iter_mut().zip(src) {
                *x = f(*x, y);
            }
        }
        Ok(self)
    }

    fn broadcast_col(
        &mut self,
        v: &Matrix,
        op: &'static str,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<&mut Self> {
        self.check_defined(op)?;
        v.check_defined(op)?;
        v.check_col_vector(op)?;
        self.check_rows_equal(v, op)?;
        for r in 0..self.rows() {
            let y = v.row(r)[0];
            for x in self.row_mut(r) {
                *x = f(*x, y);
            }
        }
        Ok(self)
    }

    /// Add row vector `v` to every row
    pub fn add_row_vector(&mut self, v: &Matrix) -> Result<&mut Self> {
        self.broadcast_row(v, "add_row_vector", |x, y| x + y)
    }

    pub fn sub_row_vector(&mut self, v: &Matrix) -> Result<&mut Self> {
        self.broadcast_row(v, "sub_row_vector", |x, y| x - y)
    }

    pub fn mul_row_vector(&mut self, v: &Matrix) -> Result<&mut Self> {
        self.broadcast_row(v, "mul_row_vector", |x, y| x * y)
    }

    /// Divide every row by row vector `v`; a zero in `v` is an error
    pub fn div_row_vector(&mut self, v: &Matrix) -> Result<&mut Self> {
        v.check_defined("div_row_vector")?;
        v.check_row_vector("div_row_vector")?;
        if v.row(0).contains(&0.0) {
            return Err(MatrixError::div_zero("div_row_vector", &v.name));
        }
        self.broadcast_row(v, "div_row_vector", |x, y| x / y)
    }

    /// Add column vector `v` to every column
    pub fn add_col_vector(&mut self, v: &Matrix) -> Result<&mut Self> {
        self.broadcast_col(v, "add_col_vector", |x, y| x + y)
    }

    pub fn sub_col_vector(&mut self, v: &Matrix) -> Result<&mut Self> {
        self.broadcast_col(v, "sub_col_vector", |x, y| x - y)
    }

    pub fn mul_col_vector(&mut self, v: &Matrix) -> Result<&mut Self> {
        self.broadcast_col(v, "mul_col_vector", |x, y| x * y)
    }

    /// Divide every column by column vector `v`; a zero in `v` is an error
    pub fn div_col_vector(&mut self, v: &Matrix) -> Result<&mut Self> {
        v.check_defined("div_col_vector")?;
        if v.iter_rows().any(|row| row.first() == Some(&0.0)) {
            return Err(MatrixError::div_zero("div_col_vector", &v.name));
        }
        self.broadcast_col(v, "div_col_vector", |x, y| x / y)
    }

    /// Add row vector `v` to row `r` only
    pub fn add_row_vector_at(&mut self, r: usize, v: &Matrix) -> Result<&mut Self> {
        self.check_defined("add_row_vector_at")?;
        v.check_defined("add_row_vector_at")?;
        v.check_row_vector("add_row_vector_at")?;
        self.check_cols_equal(v, "add_row_vector_at")?;
        self.check_row_index(r, "add_row_vector_at")?;
        let src = v.row(0);
        for (x, &y) in self.row_mut(r).iter_mut().zip(src) {
            *x += y;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Matrix {
        Matrix::from_ints(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap()
    }

    #[test]
    fn test_row_broadcast() {
        let v = Matrix::from_ints(1, 3, &[10, 20, 30]).unwrap();
        let mut a = grid();
        a.add_row_vector(&v).unwrap();
        assert_eq!(a.to_rows(), vec![vec![11.0, 22.0, 33.0], vec![14.0, 25.0, 36.0]]);
        a.sub_row_vector(&v).unwrap().mul_row_vector(&v).unwrap();
        assert_eq!(a.row(1), &[40.0, 100.0, 180.0]);
        a.div_row_vector(&v).unwrap();
        assert_eq!(a, grid());
    }

    #[test]
    fn test_col_broadcast() {
        let v = Matrix::from_ints(2, 1, &[2, -1]).unwrap();
        let mut a = grid();
        a.mul_col_vector(&v).unwrap();
        assert_eq!(a.to_rows(), vec![vec![2.0, 4.0, 6.0], vec![-4.0, -5.0, -6.0]]);
        a.div_col_vector(&v).unwrap().add_col_vector(&v).unwrap();
        assert_eq!(a.row(0), &[3.0, 4.0, 5.0]);
        a.sub_col_vector(&v).unwrap();
        assert_eq!(a, grid());
    }

    #[test]
    fn test_broadcast_shape_errors() {
        let mut a = grid();
        assert!(a.add_row_vector(&Matrix::filled(1, 2, 1.0)).is_err());
        assert!(a.add_col_vector(&Matrix::filled(3, 1, 1.0)).is_err());
        assert!(a.add_row_vector(&Matrix::filled(2, 3, 1.0)).is_err());
    }

    #[test]
    fn test_broadcast_divide_by_zero() {
        let mut a = grid();
        let zr = Matrix::from_ints(1, 3, &[1, 0, 1]).unwrap();
        let zc = Matrix::from_ints(2, 1, &[0, 1]).unwrap();
        assert!(matches!(a.div_row_vector(&zr), Err(MatrixError::DivideByZero { .. })));
        assert!(matches!(a.div_col_vector(&zc), Err(MatrixError::DivideByZero { .. })));
        assert_eq!(a, grid());
    }

    #[test]
    fn test_add_row_vector_at() {
        let mut a = grid();
        let v = Matrix::filled(1, 3, 1.0);
        a.add_row_vector_at(1, &v).unwrap();
        assert_eq!(a.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(a.row(1), &[5.0, 6.0, 7.0]);
        assert!(a.add_row_vector_at(2, &v).is_err());
    }
}
