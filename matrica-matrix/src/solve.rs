//! Gauss-Jordan elimination with full pivoting
//!
//! `gauss_jordan` reduces a square matrix and an optional right-hand side
//! together: on success the receiver holds its inverse and the right-hand
//! side holds one solution vector per column. On failure neither is
//! changed.

use std::sync::Arc;
use matrica_core::{MatrixError, Result};
use crate::types::Matrix;

impl Matrix {
    /// Invert self in place, solving for `rhs` at the same time
    pub fn gauss_jordan(&mut self, rhs: Option<&mut Matrix>) -> Result<()> {
        self.check_defined("gauss_jordan")?;
        self.check_square("gauss_jordan")?;
        let n = self.rows();
        let mut a = self.to_rows();
        let mut b = match &rhs {
            Some(m) => {
                m.check_defined("gauss_jordan")?;
                self.check_rows_equal(m, "gauss_jordan")?;
                m.to_rows()
            }
            None => vec![Vec::new(); n],
        };

        let mut ipiv = vec![0u32; n];
        let mut indxr = vec![0usize; n];
        let mut indxc = vec![0usize; n];

        for i in 0..n {
            let mut big = 0.0;
            let (mut irow, mut icol) = (0, 0);
            for j in 0..n {
                if ipiv[j] == 1 {
                    continue;
                }
                for k in 0..n {
                    match ipiv[k] {
                        0 => {
                            if a[j][k].abs() >= big {
                                big = a[j][k].abs();
                                irow = j;
                                icol = k;
                            }
                        }
                        1 => {}
                        _ => return Err(MatrixError::Singular { op: "gauss_jordan" }),
                    }
                }
            }
            ipiv[icol] += 1;

            if irow != icol {
                a.swap(irow, icol);
                b.swap(irow, icol);
            }
            indxr[i] = irow;
            indxc[i] = icol;
            if a[icol][icol] == 0.0 {
                tracing::debug!(name = %self.name, step = i, "zero pivot");
                return Err(MatrixError::Singular { op: "gauss_jordan" });
            }

            let pivinv = 1.0 / a[icol][icol];
            a[icol][icol] = 1.0;
            a[icol].iter_mut().for_each(|x| *x *= pivinv);
            b[icol].iter_mut().for_each(|x| *x *= pivinv);

            let (pivot_a, pivot_b) = (a[icol].clone(), b[icol].clone());
            for ll in 0..n {
                if ll != icol {
                    let dum = a[ll][icol];
                    a[ll][icol] = 0.0;
                    for (x, p) in a[ll].iter_mut().zip(&pivot_a) {
                        *x -= p * dum;
                    }
                    for (x, p) in b[ll].iter_mut().zip(&pivot_b) {
                        *x -= p * dum;
                    }
                }
            }
        }

        // undo the implied column interchanges, last first
        for l in (0..n).rev() {
            if indxr[l] != indxc[l] {
                for row in a.iter_mut() {
                    row.swap(indxr[l], indxc[l]);
                }
            }
        }

        self.replace_rows(a);
        if let Some(m) = rhs {
            m.replace_rows(b);
        }
        Ok(())
    }

    /// Replace self by its inverse
    pub fn inverse(&mut self) -> Result<&mut Self> {
        self.gauss_jordan(None)?;
        Ok(self)
    }

    /// Solve self · X = b for every column of `b`.
    ///
    /// `b` receives the solutions and self is replaced by its inverse.
    pub fn solve(&mut self, b: &mut Matrix) -> Result<&mut Self> {
        self.gauss_jordan(Some(b))?;
        Ok(self)
    }

    /// Swap in freshly computed rows of the current shape
    pub(crate) fn replace_rows(&mut self, rows: Vec<Vec<f64>>) {
        self.data = rows.into_iter().map(Arc::new).collect();
        self.offset = 0;
        self.view = false;
        self.defined = true;
    }
}
