//! Conversion to and from nalgebra's dynamic matrices

use nalgebra::DMatrix;
use matrica_core::Result;
use crate::types::Matrix;

impl Matrix {
    /// Copy an nalgebra matrix into a defined matrix
    pub fn from_dmatrix(data: &DMatrix<f64>) -> Self {
        let mut m = Matrix::with_size(data.nrows(), data.ncols());
        for r in 0..data.nrows() {
            for (c, x) in m.row_mut(r).iter_mut().enumerate() {
                *x = data[(r, c)];
            }
        }
        m.defined = true;
        m
    }

    /// Copy into an nalgebra matrix; the cells must be defined
    pub fn to_dmatrix(&self) -> Result<DMatrix<f64>> {
        self.check_defined("to_dmatrix")?;
        Ok(DMatrix::from_fn(self.rows(), self.cols(), |r, c| self[(r, c)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_dmatrix() {
        let m = Matrix::from_ints(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
        let d = m.to_dmatrix().unwrap();
        assert_eq!(d[(1, 0)], 4.0);
        assert_eq!(d.ncols(), 3);
        assert_eq!(Matrix::from_dmatrix(&d), m);
        assert!(Matrix::with_size(1, 1).to_dmatrix().is_err());
    }

    #[test]
    fn test_inverse_agrees_with_nalgebra() {
        let m = Matrix::from_ints(3, 3, &[1, 2, 4, 2, 2, 3, 4, 3, 3]).unwrap();
        let reference = m.to_dmatrix().unwrap().try_inverse().unwrap();
        let mut inv = m.clone();
        inv.inverse().unwrap();
        assert!(inv.near_equal(1e-9, &Matrix::from_dmatrix(&reference)).unwrap());
    }
}
