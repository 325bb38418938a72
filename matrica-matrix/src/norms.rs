//! Normalization of rows, columns and whole matrices

use matrica_core::{MatrixError, Result};
use crate::types::Matrix;

impl Matrix {
    /// Scale every row to unit Euclidean length
    pub fn normalize_row_vectors(&mut self) -> Result<&mut Self> {
        self.check_defined("normalize_row_vectors")?;
        let lengths: Vec<f64> = self
            .iter_rows()
            .map(|row| row.iter().map(|x| x * x).sum::<f64>())
            .collect();
        if let Some(row) = lengths.iter().position(|&s| s == 0.0) {
            return Err(MatrixError::ZeroLength {
                op: "normalize_row_vectors",
                name: self.name.clone(),
                row,
            });
        }
        for (r, s) in lengths.into_iter().enumerate() {
            let scale = 1.0 / s.sqrt();
            for x in self.row_mut(r) {
                *x *= scale;
            }
        }
        Ok(self)
    }

    /// Map the range [min, max] of all cells onto [0, new_max]
    pub fn normalize(&mut self, new_max: f64) -> Result<&mut Self> {
        let min = self.min()?;
        let max = self.max()?;
        let span = max - min;
        if span == 0.0 {
            return Err(MatrixError::Constant { op: "normalize", name: self.name.clone() });
        }
        let scale = new_max / span;
        self.apply("normalize", |x| (x - min) * scale)
    }

    /// Map each column onto [0, 1] and return the 2×C record of
    /// column minima (row 0) and maxima (row 1).
    ///
    /// Constant columns are recorded but left unchanged.
    pub fn normalize_cols(&mut self) -> Result<Matrix> {
        self.check_defined("normalize_cols")?;
        self.check_usable("normalize_cols")?;
        let cols = self.cols();
        let mut min_max = Matrix::with_size(2, cols).with_name(&format!("minMax for {}", self.name));
        for c in 0..cols {
            min_max[(0, c)] = self.min_col(c)?;
            min_max[(1, c)] = self.max_col(c)?;
        }
        min_max.defined = true;
        self.normalize_cols_with(&min_max)?;
        Ok(min_max)
    }

    /// Map each column using a record produced by `normalize_cols`
    pub fn normalize_cols_with(&mut self, min_max: &Matrix) -> Result<&mut Self> {
        self.rescale_cols(min_max, "normalize_cols_with", |x, min, max| (x - min) / (max - min))
    }

    /// Undo `normalize_cols` using its record
    pub fn unnormalize_cols(&mut self, min_max: &Matrix) -> Result<&mut Self> {
        self.rescale_cols(min_max, "unnormalize_cols", |x, min, max| x * (max - min) + min)
    }

    fn rescale_cols(
        &mut self,
        min_max: &Matrix,
        op: &'static str,
        f: impl Fn(f64, f64, f64) -> f64,
    ) -> Result<&mut Self> {
        self.check_defined(op)?;
        min_max.check_defined(op)?;
        min_max.check_size(2, self.cols(), op)?;
        let (mins, maxs) = (min_max.row(0), min_max.row(1));
        for r in 0..self.rows() {
            for (c, x) in self.row_mut(r).iter_mut().enumerate() {
                if mins[c] != maxs[c] {
                    *x = f(*x, mins[c], maxs[c]);
                }
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_row_vectors() {
        let mut m = Matrix::from_ints(2, 2, &[3, 4, 0, -2]).unwrap();
        m.normalize_row_vectors().unwrap();
        assert!(m.near_equal(1e-12, &Matrix::from_slice(2, 2, &[0.6, 0.8, 0.0, -1.0]).unwrap()).unwrap());
    }

    #[test]
    fn test_zero_row_is_error() {
        let mut m = Matrix::from_ints(2, 2, &[1, 1, 0, 0]).unwrap().with_name("x");
        let err = m.normalize_row_vectors().unwrap_err();
        assert!(matches!(err, MatrixError::ZeroLength { row: 1, .. }));
        assert_eq!(m[(0, 0)], 1.0);
    }

    #[test]
    fn test_normalize_whole() {
        let mut m = Matrix::from_ints(1, 3, &[2, 4, 6]).unwrap();
        m.normalize(10.0).unwrap();
        assert_eq!(m.row(0), &[0.0, 5.0, 10.0]);
        assert!(matches!(
            Matrix::filled(2, 2, 3.0).normalize(1.0),
            Err(MatrixError::Constant { .. })
        ));
    }

    #[test]
    fn test_normalize_cols_roundtrip() {
        let original = Matrix::from_ints(3, 2, &[0, 5, 5, 5, 10, 5]).unwrap();
        let mut m = original.clone();
        let min_max = m.normalize_cols().unwrap();
        assert_eq!(min_max.to_rows(), vec![vec![0.0, 5.0], vec![10.0, 5.0]]);
        assert_eq!(m.col(0).unwrap(), vec![0.0, 0.5, 1.0]);
        assert_eq!(m.col(1).unwrap(), vec![5.0, 5.0, 5.0]);

        let mut test = Matrix::from_ints(1, 2, &[20, 7]).unwrap();
        test.normalize_cols_with(&min_max).unwrap();
        assert_eq!(test.row(0), &[2.0, 7.0]);

        m.unnormalize_cols(&min_max).unwrap();
        assert_eq!(m, original);
        assert!(m.unnormalize_cols(&Matrix::filled(2, 3, 0.0)).is_err());
    }
}
