//! LU decomposition and the symmetric eigen solver
//!
//! The eigen solver runs in two phases: a Householder reduction to
//! tridiagonal form, then QL iteration with implicit shifts. Both phases
//! accumulate their orthogonal transforms into the receiver.

use std::sync::Arc;
use matrica_core::{MatrixError, Result};
use crate::types::Matrix;

/// Iteration count on one eigenvalue that triggers a warning
const QL_WARN_ITERATIONS: usize = 30;
/// Iteration count on one eigenvalue after which QL gives up
const QL_MAX_ITERATIONS: usize = 1000;

/// sqrt(a² + b²) without destructive underflow or overflow
pub fn pythag(a: f64, b: f64) -> f64 {
    let (absa, absb) = (a.abs(), b.abs());
    if absa > absb {
        absa * (1.0 + (absb / absa) * (absb / absa)).sqrt()
    } else if absb == 0.0 {
        0.0
    } else {
        absb * (1.0 + (absa / absb) * (absa / absb)).sqrt()
    }
}

/// |a| carrying the sign of b
fn sign(a: f64, b: f64) -> f64 {
    if b >= 0.0 {
        a.abs()
    } else {
        -a.abs()
    }
}

impl Matrix {
    // ============ LU ============

    /// Doolittle LU decomposition in place.
    ///
    /// Multipliers are stored below the diagonal and U on and above it.
    /// A zero diagonal is replaced by swapping in a later row with a
    /// nonzero entry in that column; the returned vector lists, for each
    /// row position, the original row now found there.
    pub fn lu(&mut self) -> Result<Vec<usize>> {
        self.check_defined("lu")?;
        self.check_square("lu")?;
        let n = self.rows();
        let mut perm: Vec<usize> = (0..n).collect();
        for r in 0..n {
            if r + 1 < n && self[(r, r)] == 0.0 {
                let j = (r + 1..n)
                    .find(|&j| self[(j, r)] != 0.0)
                    .ok_or(MatrixError::Singular { op: "lu" })?;
                self.data.swap(r, j);
                perm.swap(r, j);
            }
            let pivot_row = self.row(r).to_vec();
            for rr in r + 1..n {
                let row = self.row_mut(rr);
                let l = row[r] / pivot_row[r];
                for c in r..n {
                    row[c] -= l * pivot_row[c];
                }
                row[r] = l;
            }
        }
        tracing::trace!(name = %self.name, ?perm, "lu");
        Ok(perm)
    }

    /// Determinant from the LU factors of a copy; 0 when singular
    pub fn determinant(&self) -> Result<f64> {
        self.check_defined("determinant")?;
        self.check_square("determinant")?;
        let mut work = self.clone();
        let perm = match work.lu() {
            Ok(p) => p,
            Err(MatrixError::Singular { .. }) => return Ok(0.0),
            Err(e) => return Err(e),
        };
        let mut det: f64 = (0..work.rows()).map(|i| work[(i, i)]).product();
        if permutation_is_odd(&perm) {
            det = -det;
        }
        Ok(det)
    }

    // ============ Eigen system ============

    /// Householder reduction of a symmetric matrix to tridiagonal form.
    ///
    /// Returns the diagonal and the off-diagonal (with e[0] = 0). The
    /// receiver is replaced by the orthogonal transform. Symmetry is not
    /// verified.
    pub fn tridiagonalize(&mut self) -> Result<(Vec<f64>, Vec<f64>)> {
        self.check_defined("tridiagonalize")?;
        self.check_square("tridiagonalize")?;
        let n = self.rows();
        let mut a = self.to_rows();
        let mut d = vec![0.0; n];
        let mut e = vec![0.0; n];

        for i in (1..n).rev() {
            let l = i - 1;
            let mut h = 0.0;
            if l > 0 {
                let scale: f64 = a[i][..=l].iter().map(|x| x.abs()).sum();
                if scale == 0.0 {
                    e[i] = a[i][l];
                } else {
                    for k in 0..=l {
                        a[i][k] /= scale;
                        h += a[i][k] * a[i][k];
                    }
                    let mut f = a[i][l];
                    let mut g = if f >= 0.0 { -h.sqrt() } else { h.sqrt() };
                    e[i] = scale * g;
                    h -= f * g;
                    a[i][l] = f - g;
                    f = 0.0;
                    for j in 0..=l {
                        a[j][i] = a[i][j] / h;
                        g = 0.0;
                        for k in 0..=j {
                            g += a[j][k] * a[i][k];
                        }
                        for k in j + 1..=l {
                            g += a[k][j] * a[i][k];
                        }
                        e[j] = g / h;
                        f += e[j] * a[i][j];
                    }
                    let hh = f / (h + h);
                    for j in 0..=l {
                        let f = a[i][j];
                        let g = e[j] - hh * f;
                        e[j] = g;
                        for k in 0..=j {
                            a[j][k] -= f * e[k] + g * a[i][k];
                        }
                    }
                }
            } else {
                e[i] = a[i][l];
            }
            d[i] = h;
        }

        if n > 0 {
            d[0] = 0.0;
            e[0] = 0.0;
        }
        for i in 0..n {
            if d[i] != 0.0 {
                for j in 0..i {
                    let g: f64 = (0..i).map(|k| a[i][k] * a[k][j]).sum();
                    for k in 0..i {
                        a[k][j] -= g * a[k][i];
                    }
                }
            }
            d[i] = a[i][i];
            a[i][i] = 1.0;
            for j in 0..i {
                a[j][i] = 0.0;
                a[i][j] = 0.0;
            }
        }

        self.replace_rows(a);
        Ok((d, e))
    }

    /// QL iteration with implicit shifts on the tridiagonal (d, e).
    ///
    /// On return d holds the eigenvalues and column k of the receiver the
    /// eigenvector for d[k]. The receiver must hold the identity (for a
    /// tridiagonal input) or the transform from `tridiagonalize`.
    pub fn ql_implicit(&mut self, d: &mut [f64], e: &mut [f64]) -> Result<()> {
        self.check_defined("ql_implicit")?;
        self.check_square("ql_implicit")?;
        let n = self.rows();
        if d.len() != n || e.len() != n {
            return Err(MatrixError::shape(
                "ql_implicit",
                &self.name,
                format!("diagonals of length {} and {} for order {}", d.len(), e.len(), n),
            ));
        }
        if n == 0 {
            return Ok(());
        }
        let mut z = self.to_rows();

        e.copy_within(1.., 0);
        e[n - 1] = 0.0;

        for l in 0..n {
            let mut iter = 0;
            loop {
                let mut m = l;
                while m < n - 1 {
                    let dd = d[m].abs() + d[m + 1].abs();
                    if e[m].abs() + dd == dd {
                        break;
                    }
                    m += 1;
                }
                if m == l {
                    break;
                }

                iter += 1;
                if iter == QL_WARN_ITERATIONS {
                    tracing::warn!(name = %self.name, eigenvalue = l, "slow QL convergence");
                }
                if iter > QL_MAX_ITERATIONS {
                    return Err(MatrixError::NoConvergence { op: "ql_implicit", iterations: QL_MAX_ITERATIONS });
                }

                let mut g = (d[l + 1] - d[l]) / (2.0 * e[l]);
                let mut r = pythag(g, 1.0);
                g = d[m] - d[l] + e[l] / (g + sign(r, g));
                let (mut s, mut c, mut p) = (1.0, 1.0, 0.0);
                let mut underflow = false;
                for i in (l..m).rev() {
                    let f = s * e[i];
                    let b = c * e[i];
                    r = pythag(f, g);
                    e[i + 1] = r;
                    if r == 0.0 {
                        d[i + 1] -= p;
                        e[m] = 0.0;
                        underflow = true;
                        break;
                    }
                    s = f / r;
                    c = g / r;
                    g = d[i + 1] - p;
                    r = (d[i] - g) * s + 2.0 * c * b;
                    p = s * r;
                    d[i + 1] = g + p;
                    g = c * r - b;
                    for row in z.iter_mut() {
                        let t = row[i + 1];
                        row[i + 1] = s * row[i] + c * t;
                        row[i] = c * row[i] - s * t;
                    }
                }
                if underflow {
                    continue;
                }
                d[l] -= p;
                e[l] = g;
                e[m] = 0.0;
            }
        }

        self.replace_rows(z);
        Ok(())
    }

    /// Eigenvalues and eigenvectors of a symmetric matrix.
    ///
    /// The receiver is replaced by the unit eigenvectors, one per row,
    /// ordered by decreasing eigenvalue magnitude. Returns the eigenvalues
    /// in the same order as a 1×n row vector.
    pub fn eigen_system(&mut self) -> Result<Matrix> {
        self.check_defined("eigen_system")?;
        self.check_square("eigen_system")?;
        self.check_usable("eigen_system")?;
        let (mut d, mut e) = self.tridiagonalize()?;
        self.ql_implicit(&mut d, &mut e)?;
        self.transpose_self()?;

        // insertion sort by decreasing magnitude, carrying rows along
        for i in 1..d.len() {
            let (value, row) = (d[i], Arc::clone(&self.data[i]));
            let mut j = i;
            while j > 0 && d[j - 1].abs() < value.abs() {
                d[j] = d[j - 1];
                self.data[j] = Arc::clone(&self.data[j - 1]);
                j -= 1;
            }
            d[j] = value;
            self.data[j] = row;
        }

        Ok(Matrix::from_rows(vec![d])?.with_name("eigenvalues"))
    }
}

fn permutation_is_odd(perm: &[usize]) -> bool {
    let mut seen = vec![false; perm.len()];
    let mut swaps = 0;
    for start in 0..perm.len() {
        let mut len = 0;
        let mut i = start;
        while !seen[i] {
            seen[i] = true;
            i = perm[i];
            len += 1;
        }
        if len > 0 {
            swaps += len - 1;
        }
    }
    swaps % 2 == 1
}
