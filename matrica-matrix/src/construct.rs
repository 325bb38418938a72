//! Initializers: constants, ranges and random fills
//!
//! Whole-matrix initializers mark the matrix defined. The single row and
//! column range initializers also mark it defined, since they are commonly
//! used to fill a fresh matrix one line at a time.

use matrica_core::{MatrixError, RandomSource, Result};
use crate::helpers::check_random;
use crate::types::Matrix;

impl Matrix {
    // ============ Constants ============

    pub fn constant(&mut self, x: f64) -> Result<&mut Self> {
        self.check_allocated("constant")?;
        self.check_usable("constant")?;
        for r in 0..self.rows() {
            self.row_mut(r).fill(x);
        }
        self.defined = true;
        Ok(self)
    }

    pub fn zero(&mut self) -> Result<&mut Self> {
        self.constant(0.0)
    }

    /// Zero everywhere except 1 on the diagonal
    pub fn identity(&mut self) -> Result<&mut Self> {
        self.check_allocated("identity")?;
        self.check_square("identity")?;
        self.constant(0.0)?;
        self.constant_diagonal(1.0)
    }

    /// Set the main diagonal; does not change whether the matrix is defined
    pub fn constant_diagonal(&mut self, x: f64) -> Result<&mut Self> {
        self.check_allocated("constant_diagonal")?;
        for i in 0..self.rows().min(self.cols()) {
            self[(i, i)] = x;
        }
        Ok(self)
    }

    pub fn constant_col(&mut self, c: usize, x: f64) -> Result<&mut Self> {
        self.check_allocated("constant_col")?;
        self.check_col_index(c, "constant_col")?;
        for r in 0..self.rows() {
            self[(r, c)] = x;
        }
        self.defined = true;
        Ok(self)
    }

    /// Column `c` becomes start, start + step, ...
    pub fn constant_col_range(&mut self, c: usize, start: f64, step: f64) -> Result<&mut Self> {
        self.check_allocated("constant_col_range")?;
        self.check_col_index(c, "constant_col_range")?;
        let mut v = start;
        for r in 0..self.rows() {
            self[(r, c)] = v;
            v += step;
        }
        self.defined = true;
        Ok(self)
    }

    /// Row `r` becomes start, start + step, ...
    pub fn constant_row_range(&mut self, r: usize, start: f64, step: f64) -> Result<&mut Self> {
        self.check_allocated("constant_row_range")?;
        self.check_row_index(r, "constant_row_range")?;
        let mut v = start;
        for x in self.row_mut(r) {
            *x = v;
            v += step;
        }
        self.defined = true;
        Ok(self)
    }

    /// Cell (r, c) becomes a·r + b·c + k
    pub fn init_linear(&mut self, a: f64, b: f64, k: f64) -> Result<&mut Self> {
        self.check_allocated("init_linear")?;
        for r in 0..self.rows() {
            for (c, x) in self.row_mut(r).iter_mut().enumerate() {
                *x = a * r as f64 + b * c as f64 + k;
            }
        }
        self.defined = true;
        Ok(self)
    }

    // ============ Random fills ============

    /// Uniform reals in [min, max)
    pub fn rand_uniform(&mut self, rng: &mut impl RandomSource, min: f64, max: f64) -> Result<&mut Self> {
        check_random(rng, "rand_uniform")?;
        self.check_allocated("rand_uniform")?;
        for r in 0..self.rows() {
            for x in self.row_mut(r) {
                *x = rng.uniform01()? * (max - min) + min;
            }
        }
        self.defined = true;
        Ok(self)
    }

    /// Uniform integers in [min, max)
    pub fn rand_int(&mut self, rng: &mut impl RandomSource, min: i64, max: i64) -> Result<&mut Self> {
        check_random(rng, "rand_int")?;
        self.check_allocated("rand_int")?;
        let span = max
            .checked_sub(min)
            .filter(|&span| span > 0)
            .and_then(|span| usize::try_from(span).ok())
            .ok_or_else(|| MatrixError::domain("rand_int", format!("no integers in [{}, {})", min, max)))?;
        for r in 0..self.rows() {
            for x in self.row_mut(r) {
                *x = (rng.uniform_int(span)? as i64 + min) as f64;
            }
        }
        self.defined = true;
        Ok(self)
    }

    /// Uniform reals in [min, max) for column `c` only; definedness unchanged
    pub fn rand_col(&mut self, rng: &mut impl RandomSource, c: usize, min: f64, max: f64) -> Result<&mut Self> {
        check_random(rng, "rand_col")?;
        self.check_allocated("rand_col")?;
        self.check_col_index(c, "rand_col")?;
        for r in 0..self.rows() {
            self[(r, c)] = rng.uniform01()? * (max - min) + min;
        }
        Ok(self)
    }

    /// Gaussian values with the given mean and standard deviation
    pub fn rand_norm(&mut self, rng: &mut impl RandomSource, mean: f64, stddev: f64) -> Result<&mut Self> {
        check_random(rng, "rand_norm")?;
        self.check_allocated("rand_norm")?;
        for r in 0..self.rows() {
            for x in self.row_mut(r) {
                *x = rng.normal(stddev)? + mean;
            }
        }
        self.defined = true;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrica_core::Randomizer;

    #[test]
    fn test_identity() {
        let mut m = Matrix::with_size(3, 3);
        m.identity().unwrap();
        assert!(m.is_defined());
        assert_eq!(m.sum().unwrap(), 3.0);
        assert_eq!(m[(1, 1)], 1.0);
        assert!(Matrix::with_size(2, 3).identity().is_err());
    }

    #[test]
    fn test_diagonal_keeps_definedness() {
        let mut m = Matrix::with_size(2, 3);
        m.constant_diagonal(5.0).unwrap();
        assert!(!m.is_defined());
        assert_eq!(m[(1, 1)], 5.0);
    }

    #[test]
    fn test_ranges() {
        let mut m = Matrix::with_size(3, 2);
        m.constant_col_range(1, 10.0, 5.0).unwrap();
        assert!(m.is_defined());
        assert_eq!(m.col(1).unwrap(), vec![10.0, 15.0, 20.0]);
        m.constant_row_range(0, 0.0, -1.0).unwrap();
        assert_eq!(m.row(0), &[0.0, -1.0]);
        m.constant_col(0, 7.0).unwrap();
        assert_eq!(m.col(0).unwrap(), vec![7.0, 7.0, 7.0]);
        assert!(m.constant_col(2, 0.0).is_err());
    }

    #[test]
    fn test_init_linear() {
        let mut m = Matrix::with_size(2, 3);
        m.init_linear(10.0, 1.0, 0.5).unwrap();
        assert_eq!(m.to_rows(), vec![vec![0.5, 1.5, 2.5], vec![10.5, 11.5, 12.5]]);
    }

    #[test]
    fn test_constant_needs_cells() {
        assert!(Matrix::new().zero().is_err());
        assert!(Matrix::with_size(0, 3).constant(1.0).is_err());
    }

    #[test]
    fn test_random_fills() {
        let mut rng = Randomizer::seeded(42, 7);
        let mut m = Matrix::with_size(20, 5);
        m.rand_uniform(&mut rng, -2.0, 3.0).unwrap();
        assert!(m.min().unwrap() >= -2.0 && m.max().unwrap() < 3.0);
        m.rand_int(&mut rng, 1, 4).unwrap();
        assert!(m.iter_rows().flatten().all(|&v| v == 1.0 || v == 2.0 || v == 3.0));
        m.rand_col(&mut rng, 2, 100.0, 101.0).unwrap();
        assert!(m.col(2).unwrap().iter().all(|&v| v >= 100.0));
        m.rand_norm(&mut rng, 50.0, 0.001).unwrap();
        assert!((m.mean().unwrap() - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_rand_int_extreme_bounds() {
        let mut rng = Randomizer::seeded(1, 2);
        let mut m = Matrix::with_size(2, 2);
        let err = m.rand_int(&mut rng, i64::MIN, i64::MAX).unwrap_err();
        assert!(matches!(err, MatrixError::Domain { op: "rand_int", .. }));
        assert!(matches!(m.rand_int(&mut rng, 5, 5), Err(MatrixError::Domain { .. })));
        assert!(!m.is_defined());

        m.rand_int(&mut rng, i64::MAX - 2, i64::MAX).unwrap();
        assert!(m.iter_rows().flatten().all(|&v| v >= (i64::MAX - 2) as f64));
        m.rand_int(&mut rng, -3, -1).unwrap();
        assert!(m.iter_rows().flatten().all(|&v| v == -3.0 || v == -2.0));
    }

    #[test]
    fn test_random_requires_init() {
        let mut rng = Randomizer::new();
        let mut m = Matrix::with_size(2, 2);
        assert!(matches!(
            m.rand_uniform(&mut rng, 0.0, 1.0),
            Err(MatrixError::RandomUninitialized { .. })
        ));
        assert!(!m.is_defined());
    }
}
