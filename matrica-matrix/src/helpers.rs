//! Precondition checks shared by matrix operations
//!
//! Each check returns the error the operation should report, naming the
//! operation and the matrix.

use matrica_core::{Axis, MatrixError, RandomSource, Result};
use crate::types::{Matrix, Shape};

impl Matrix {
    /// Check that row storage exists
    pub fn check_allocated(&self, op: &'static str) -> Result<()> {
        match self.shape {
            Shape::Full { .. } => Ok(()),
            _ => Err(MatrixError::not_allocated(op, &self.name)),
        }
    }

    /// Check that storage exists and every cell has been written
    pub fn check_defined(&self, op: &'static str) -> Result<()> {
        self.check_allocated(op)?;
        if !self.defined {
            return Err(MatrixError::undefined(op, &self.name));
        }
        Ok(())
    }

    pub fn check_square(&self, op: &'static str) -> Result<()> {
        if self.rows() != self.cols() {
            return Err(MatrixError::shape(
                op,
                &self.name,
                format!("requires square matrix, got {}×{}", self.rows(), self.cols()),
            ));
        }
        Ok(())
    }

    pub fn check_size(&self, rows: usize, cols: usize, op: &'static str) -> Result<()> {
        if self.rows() != rows || self.cols() != cols {
            return Err(MatrixError::shape(
                op,
                &self.name,
                format!("expected {}×{}, got {}×{}", rows, cols, self.rows(), self.cols()),
            ));
        }
        Ok(())
    }

    /// Check that the matrix has at least one cell
    pub fn check_usable(&self, op: &'static str) -> Result<()> {
        if self.rows() == 0 || self.cols() == 0 {
            return Err(MatrixError::shape(op, &self.name, "matrix has no cells"));
        }
        Ok(())
    }

    pub fn check_row_index(&self, r: usize, op: &'static str) -> Result<()> {
        if r >= self.rows() {
            return Err(MatrixError::bounds(op, &self.name, Axis::Row, r, self.rows()));
        }
        Ok(())
    }

    pub fn check_col_index(&self, c: usize, op: &'static str) -> Result<()> {
        if c >= self.cols() {
            return Err(MatrixError::bounds(op, &self.name, Axis::Col, c, self.cols()));
        }
        Ok(())
    }

    pub fn check_index(&self, r: usize, c: usize, op: &'static str) -> Result<()> {
        self.check_allocated(op)?;
        self.check_row_index(r, op)?;
        self.check_col_index(c, op)
    }

    pub fn check_rows_equal(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.rows() != other.rows() {
            return Err(MatrixError::shape(
                op,
                &self.name,
                format!("row counts differ: {} vs {}", self.rows(), other.rows()),
            ));
        }
        Ok(())
    }

    pub fn check_cols_equal(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.cols() != other.cols() {
            return Err(MatrixError::shape(
                op,
                &self.name,
                format!("column counts differ: {} vs {}", self.cols(), other.cols()),
            ));
        }
        Ok(())
    }

    pub fn check_same_size(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.rows() != other.rows() || self.cols() != other.cols() {
            return Err(MatrixError::shape(
                op,
                &self.name,
                format!(
                    "matrices must have same dimensions: {}×{} vs {}×{}",
                    self.rows(),
                    self.cols(),
                    other.rows(),
                    other.cols()
                ),
            ));
        }
        Ok(())
    }

    /// Check that `self · other` is defined
    pub fn check_other_rhs(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.cols() != other.rows() {
            return Err(MatrixError::shape(
                op,
                &self.name,
                format!(
                    "incompatible dimensions {}×{} and {}×{}",
                    self.rows(),
                    self.cols(),
                    other.rows(),
                    other.cols()
                ),
            ));
        }
        Ok(())
    }

    pub fn check_row_vector(&self, op: &'static str) -> Result<()> {
        if self.rows() != 1 {
            return Err(MatrixError::shape(
                op,
                &self.name,
                format!("requires a row vector, got {}×{}", self.rows(), self.cols()),
            ));
        }
        Ok(())
    }

    pub fn check_col_vector(&self, op: &'static str) -> Result<()> {
        if self.cols() != 1 {
            return Err(MatrixError::shape(
                op,
                &self.name,
                format!("requires a column vector, got {}×{}", self.rows(), self.cols()),
            ));
        }
        Ok(())
    }

    pub fn check_row_power2(&self, op: &'static str) -> Result<()> {
        if !self.rows().is_power_of_two() {
            return Err(MatrixError::shape(
                op,
                &self.name,
                format!("row count {} is not a power of two", self.rows()),
            ));
        }
        Ok(())
    }

    pub fn check_col_power2(&self, op: &'static str) -> Result<()> {
        if !self.cols().is_power_of_two() {
            return Err(MatrixError::shape(
                op,
                &self.name,
                format!("column count {} is not a power of two", self.cols()),
            ));
        }
        Ok(())
    }

    /// Check that every cell holds an integer
    pub fn check_integral(&self, op: &'static str) -> Result<()> {
        for (r, row) in self.iter_rows().enumerate() {
            if let Some(c) = row.iter().position(|v| v.fract() != 0.0) {
                return Err(MatrixError::shape(
                    op,
                    &self.name,
                    format!("cell ({}, {}) = {} is not an integer", r, c, row[c]),
                ));
            }
        }
        Ok(())
    }
}

/// Check that a random source may be drawn from
pub fn check_random(rng: &impl RandomSource, op: &'static str) -> Result<()> {
    if !rng.is_initialized() {
        return Err(MatrixError::RandomUninitialized { op });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrica_core::Randomizer;

    #[test]
    fn test_defined_vs_allocated() {
        let m = Matrix::with_size(2, 2);
        assert!(m.check_allocated("t").is_ok());
        assert!(matches!(m.check_defined("t"), Err(MatrixError::Undefined { .. })));
        assert!(matches!(
            Matrix::new().check_defined("t"),
            Err(MatrixError::NotAllocated { .. })
        ));
    }

    #[test]
    fn test_shape_checks() {
        let a = Matrix::filled(2, 3, 0.0);
        let b = Matrix::filled(3, 1, 0.0);
        assert!(a.check_other_rhs(&b, "dot").is_ok());
        assert!(b.check_other_rhs(&a, "dot").is_err());
        assert!(a.check_square("inverse").is_err());
        assert!(b.check_col_vector("t").is_ok());
        assert!(a.check_row_vector("t").is_err());
        assert!(a.check_same_size(&b, "add").is_err());
        assert!(a.check_size(2, 3, "t").is_ok());
    }

    #[test]
    fn test_power_of_two() {
        let m = Matrix::filled(4, 3, 0.0);
        assert!(m.check_row_power2("fft").is_ok());
        assert!(m.check_col_power2("fft").is_err());
    }

    #[test]
    fn test_index_errors_name_matrix() {
        let m = Matrix::filled(2, 2, 0.0).with_name("grid");
        let err = m.check_index(0, 5, "get").unwrap_err();
        assert_eq!(err.to_string(), "get (grid): column index 5 out of range 0..2");
    }

    #[test]
    fn test_integral_and_random() {
        let m = Matrix::from_slice(1, 2, &[1.0, 2.5]).unwrap();
        assert!(m.check_integral("print_int").is_err());
        assert!(check_random(&Randomizer::new(), "shuffle").is_err());
        assert!(check_random(&Randomizer::seeded(1, 1), "shuffle").is_ok());
    }
}
