//! Elementwise arithmetic, scalar arithmetic, products and comparisons
//!
//! Mutating operations work in place on the receiver and return it for
//! chaining. Products allocate and return a new matrix.

use matrica_core::{MatrixError, Result};
use crate::types::Matrix;

impl Matrix {
    // ============ Elementwise ============

    fn combine(
        &mut self,
        other: &Matrix,
        op: &'static str,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<&mut Self> {
        self.check_defined(op)?;
        other.check_defined(op)?;
        self.check_same_size(other, op)?;
        for r in 0..self.rows() {
            let src = other.row(r);
            for (x, &y) in self.row_mut(r).iter_mut().zip(src) {
                *x = f(*x, y);
            }
        }
        Ok(self)
    }

    pub(crate) fn apply(&mut self, op: &'static str, f: impl Fn(f64) -> f64) -> Result<&mut Self> {
        self.check_defined(op)?;
        for r in 0..self.rows() {
            for x in self.row_mut(r) {
                *x = f(*x);
            }
        }
        Ok(self)
    }

    /// self += other
    pub fn add(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.combine(other, "add", |x, y| x + y)
    }

    /// self -= other
    pub fn sub(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.combine(other, "sub", |x, y| x - y)
    }

    /// Elementwise self *= other
    pub fn mul(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.combine(other, "mul", |x, y| x * y)
    }

    /// Elementwise self /= other; any zero cell in other is an error
    pub fn div(&mut self, other: &Matrix) -> Result<&mut Self> {
        other.check_defined("div")?;
        if other.iter_rows().any(|row| row.contains(&0.0)) {
            return Err(MatrixError::div_zero("div", &other.name));
        }
        self.combine(other, "div", |x, y| x / y)
    }

    pub fn abs(&mut self) -> Result<&mut Self> {
        self.apply("abs", f64::abs)
    }

    /// Add 1 to every cell of row `r`
    pub fn row_inc(&mut self, r: usize) -> Result<&mut Self> {
        self.check_defined("row_inc")?;
        self.check_row_index(r, "row_inc")?;
        for x in self.row_mut(r) {
            *x += 1.0;
        }
        Ok(self)
    }

    /// Exchange the contents of two equally sized matrices
    pub fn swap(&mut self, other: &mut Matrix) -> Result<&mut Self> {
        self.check_defined("swap")?;
        other.check_defined("swap")?;
        self.check_same_size(other, "swap")?;
        for r in 0..self.rows() {
            self.row_mut(r).swap_with_slice(other.row_mut(r));
        }
        Ok(self)
    }

    // ============ Scalar ============

    pub fn scalar_add(&mut self, x: f64) -> Result<&mut Self> {
        self.apply("scalar_add", |v| v + x)
    }

    pub fn scalar_mul(&mut self, x: f64) -> Result<&mut Self> {
        self.apply("scalar_mul", |v| v * x)
    }

    pub fn scalar_div(&mut self, x: f64) -> Result<&mut Self> {
        if x == 0.0 {
            return Err(MatrixError::div_zero("scalar_div", &self.name));
        }
        self.apply("scalar_div", |v| v / x)
    }

    /// Each cell becomes x - cell; `scalar_pre_sub(0.0)` negates
    pub fn scalar_pre_sub(&mut self, x: f64) -> Result<&mut Self> {
        self.apply("scalar_pre_sub", |v| x - v)
    }

    /// Each cell becomes cell - x
    pub fn scalar_post_sub(&mut self, x: f64) -> Result<&mut Self> {
        self.apply("scalar_post_sub", |v| v - x)
    }

    // ============ Products ============

    /// Matrix product self · other
    pub fn dot(&self, other: &Matrix) -> Result<Matrix> {
        self.check_defined("dot")?;
        other.check_defined("dot")?;
        self.check_other_rhs(other, "dot")?;
        let mut out = Matrix::filled(self.rows(), other.cols(), 0.0);
        for r in 0..self.rows() {
            let out_row = out.row_mut(r);
            for (i, &a) in self.row(r).iter().enumerate() {
                for (o, &b) in out_row.iter_mut().zip(other.row(i)) {
                    *o += a * b;
                }
            }
        }
        Ok(out)
    }

    /// Matrix product self · otherᵗ
    pub fn dot_t(&self, other: &Matrix) -> Result<Matrix> {
        self.check_defined("dot_t")?;
        other.check_defined("dot_t")?;
        self.check_cols_equal(other, "dot_t")?;
        let mut out = Matrix::with_size(self.rows(), other.rows());
        for r in 0..self.rows() {
            let a = self.row(r);
            let out_row = out.row_mut(r);
            for (c, o) in out_row.iter_mut().enumerate() {
                *o = dot_slices(a, other.row(c));
            }
        }
        out.defined = true;
        Ok(out)
    }

    /// Matrix product selfᵗ · other
    pub fn t_dot(&self, other: &Matrix) -> Result<Matrix> {
        self.check_defined("t_dot")?;
        other.check_defined("t_dot")?;
        self.check_rows_equal(other, "t_dot")?;
        let mut out = Matrix::filled(self.cols(), other.cols(), 0.0);
        for i in 0..self.rows() {
            let b = other.row(i);
            for (r, &a) in self.row(i).iter().enumerate() {
                for (o, &y) in out.row_mut(r).iter_mut().zip(b) {
                    *o += a * y;
                }
            }
        }
        Ok(out)
    }

    /// Scalar product of two row vectors
    pub fn dot_row_vector(&self, other: &Matrix) -> Result<f64> {
        self.check_defined("dot_row_vector")?;
        other.check_defined("dot_row_vector")?;
        self.check_row_vector("dot_row_vector")?;
        other.check_row_vector("dot_row_vector")?;
        self.check_cols_equal(other, "dot_row_vector")?;
        Ok(dot_slices(self.row(0), other.row(0)))
    }

    /// Scalar product of two column vectors
    pub fn dot_col_vector(&self, other: &Matrix) -> Result<f64> {
        self.check_defined("dot_col_vector")?;
        other.check_defined("dot_col_vector")?;
        self.check_col_vector("dot_col_vector")?;
        other.check_col_vector("dot_col_vector")?;
        self.check_rows_equal(other, "dot_col_vector")?;
        Ok(self.iter_rows().zip(other.iter_rows()).map(|(a, b)| a[0] * b[0]).sum())
    }

    /// Row `r` of self dotted with column `c` of other
    pub fn dot_at(&self, r: usize, c: usize, other: &Matrix) -> Result<f64> {
        self.check_defined("dot_at")?;
        other.check_defined("dot_at")?;
        self.check_other_rhs(other, "dot_at")?;
        self.check_row_index(r, "dot_at")?;
        other.check_col_index(c, "dot_at")?;
        Ok(self.row(r).iter().enumerate().map(|(i, &a)| a * other.row(i)[c]).sum())
    }

    /// Squared distance between row `r` of self and column `c` of other
    pub fn dist2_at(&self, r: usize, c: usize, other: &Matrix) -> Result<f64> {
        self.check_defined("dist2_at")?;
        other.check_defined("dist2_at")?;
        self.check_other_rhs(other, "dist2_at")?;
        self.check_row_index(r, "dist2_at")?;
        other.check_col_index(c, "dist2_at")?;
        Ok(self
            .row(r)
            .iter()
            .enumerate()
            .map(|(i, &a)| {
                let d = a - other.row(i)[c];
                d * d
            })
            .sum())
    }

    // ============ Comparison ============

    /// Exact equality of every cell
    pub fn equal(&self, other: &Matrix) -> Result<bool> {
        self.check_defined("equal")?;
        other.check_defined("equal")?;
        self.check_same_size(other, "equal")?;
        Ok(self.iter_rows().zip(other.iter_rows()).all(|(a, b)| a == b))
    }

    /// Every cell within `epsilon` of the matching cell of other
    pub fn near_equal(&self, epsilon: f64, other: &Matrix) -> Result<bool> {
        self.check_defined("near_equal")?;
        other.check_defined("near_equal")?;
        self.check_same_size(other, "near_equal")?;
        Ok(self
            .iter_rows()
            .zip(other.iter_rows())
            .all(|(a, b)| a.iter().zip(b).all(|(x, y)| (x - y).abs() <= epsilon)))
    }

    /// Lexicographic comparison of rows i and j, left to right
    pub fn is_less_rows(&self, i: usize, j: usize) -> bool {
        let (a, b) = (self.row(i), self.row(j));
        for (x, y) in a.iter().zip(b) {
            if x < y {
                return true;
            }
            if x > y {
                return false;
            }
        }
        false
    }

    /// Exchange rows i and j by swapping their buffers
    pub fn swap_rows(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_row_index(i, "swap_rows")?;
        self.check_row_index(j, "swap_rows")?;
        self.data.swap(i, j);
        Ok(())
    }
}

pub(crate) fn dot_slices(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
