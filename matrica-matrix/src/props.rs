//! Reductions and summary statistics
//!
//! Variances and covariances are population statistics: they divide by the
//! number of values, not by one less. Means are subtracted in a separate pass.

use matrica_core::Result;
use crate::types::Matrix;

impl Matrix {
    fn cells(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter_rows().flat_map(|r| r.iter().copied())
    }

    fn col_iter(&self, c: usize) -> impl Iterator<Item = f64> + '_ {
        self.iter_rows().map(move |r| r[c])
    }

    fn check_stats(&self, op: &'static str) -> Result<()> {
        self.check_defined(op)?;
        self.check_usable(op)
    }

    fn check_col_stats(&self, c: usize, op: &'static str) -> Result<()> {
        self.check_stats(op)?;
        self.check_col_index(c, op)
    }

    // ============ Whole matrix ============

    pub fn sum(&self) -> Result<f64> {
        self.check_defined("sum")?;
        Ok(self.cells().sum())
    }

    /// Sum of squares of every cell
    pub fn sum_squares(&self) -> Result<f64> {
        self.check_defined("sum_squares")?;
        Ok(self.cells().map(|x| x * x).sum())
    }

    pub fn trace(&self) -> Result<f64> {
        self.check_defined("trace")?;
        self.check_square("trace")?;
        Ok((0..self.rows()).map(|i| self[(i, i)]).sum())
    }

    pub fn mean(&self) -> Result<f64> {
        self.check_stats("mean")?;
        Ok(self.cells().sum::<f64>() / (self.rows() * self.cols()) as f64)
    }

    pub fn var(&self) -> Result<f64> {
        self.check_stats("var")?;
        let n = (self.rows() * self.cols()) as f64;
        let mean = self.cells().sum::<f64>() / n;
        Ok(self.cells().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n)
    }

    pub fn stddev(&self) -> Result<f64> {
        Ok(self.var()?.sqrt())
    }

    /// Covariance of the cells of two equally sized matrices
    pub fn cov(&self, other: &Matrix) -> Result<f64> {
        self.check_stats("cov")?;
        other.check_defined("cov")?;
        self.check_same_size(other, "cov")?;
        let n = (self.rows() * self.cols()) as f64;
        let mean = self.cells().sum::<f64>() / n;
        let mean_o = other.cells().sum::<f64>() / n;
        let sum: f64 = self
            .cells()
            .zip(other.cells())
            .map(|(x, y)| (x - mean) * (y - mean_o))
            .sum();
        Ok(sum / n)
    }

    pub fn max(&self) -> Result<f64> {
        self.check_stats("max")?;
        Ok(self.cells().fold(f64::NEG_INFINITY, f64::max))
    }

    pub fn min(&self) -> Result<f64> {
        self.check_stats("min")?;
        Ok(self.cells().fold(f64::INFINITY, f64::min))
    }

    /// Position of the first largest cell in row-major order
    pub fn arg_max(&self) -> Result<(usize, usize)> {
        self.check_stats("arg_max")?;
        Ok(self.arg_best(|x, best| x > best))
    }

    /// Position of the first smallest cell in row-major order
    pub fn arg_min(&self) -> Result<(usize, usize)> {
        self.check_stats("arg_min")?;
        Ok(self.arg_best(|x, best| x < best))
    }

    fn arg_best(&self, better: impl Fn(f64, f64) -> bool) -> (usize, usize) {
        let mut best = self[(0, 0)];
        let mut at = (0, 0);
        for (r, row) in self.iter_rows().enumerate() {
            for (c, &x) in row.iter().enumerate() {
                if better(x, best) {
                    best = x;
                    at = (r, c);
                }
            }
        }
        at
    }

    /// Number of cells greater than the matching cell of other
    pub fn count_greater(&self, other: &Matrix) -> Result<usize> {
        self.check_defined("count_greater")?;
        other.check_defined("count_greater")?;
        self.check_same_size(other, "count_greater")?;
        Ok(self.cells().zip(other.cells()).filter(|(x, y)| x > y).count())
    }

    pub fn count_greater_than(&self, value: f64) -> Result<usize> {
        self.check_defined("count_greater_than")?;
        Ok(self.cells().filter(|&x| x > value).count())
    }

    /// Squared Euclidean distance between two equally sized matrices
    pub fn dist2(&self, other: &Matrix) -> Result<f64> {
        self.check_defined("dist2")?;
        other.check_defined("dist2")?;
        self.check_same_size(other, "dist2")?;
        Ok(self.cells().zip(other.cells()).map(|(x, y)| (x - y) * (x - y)).sum())
    }

    pub fn dist(&self, other: &Matrix) -> Result<f64> {
        Ok(self.dist2(other)?.sqrt())
    }

    // ============ Per row ============

    fn per_row(&self, op: &'static str, f: impl Fn(&[f64]) -> f64) -> Result<Matrix> {
        self.check_stats(op)?;
        let values: Vec<f64> = self.iter_rows().map(f).collect();
        Matrix::from_slice(values.len(), 1, &values)
    }

    /// Column index of each row's first maximum, as an R×1 matrix
    pub fn arg_max_row(&self) -> Result<Matrix> {
        self.per_row("arg_max_row", |row| first_best(row, |x, b| x > b) as f64)
    }

    /// Column index of each row's first minimum, as an R×1 matrix
    pub fn arg_min_row(&self) -> Result<Matrix> {
        self.per_row("arg_min_row", |row| first_best(row, |x, b| x < b) as f64)
    }

    /// Minimum of each row, as an R×1 matrix
    pub fn min_row(&self) -> Result<Matrix> {
        self.per_row("min_row", |row| row.iter().copied().fold(f64::INFINITY, f64::min))
    }

    /// Euclidean length of each row, as an R×1 matrix
    pub fn dist_row(&self) -> Result<Matrix> {
        self.per_row("dist_row", |row| row.iter().map(|x| x * x).sum::<f64>().sqrt())
    }

    /// Squared length of each row, as an R×1 matrix
    pub fn dist2_row(&self) -> Result<Matrix> {
        self.per_row("dist2_row", |row| row.iter().map(|x| x * x).sum())
    }

    // ============ Per column ============

    pub fn min_col(&self, c: usize) -> Result<f64> {
        self.check_col_stats(c, "min_col")?;
        Ok(self.col_iter(c).fold(f64::INFINITY, f64::min))
    }

    pub fn max_col(&self, c: usize) -> Result<f64> {
        self.check_col_stats(c, "max_col")?;
        Ok(self.col_iter(c).fold(f64::NEG_INFINITY, f64::max))
    }

    pub fn mean_col(&self, c: usize) -> Result<f64> {
        self.check_col_stats(c, "mean_col")?;
        Ok(self.col_iter(c).sum::<f64>() / self.rows() as f64)
    }

    /// Population standard deviation of column `c`
    pub fn stddev_col(&self, c: usize) -> Result<f64> {
        self.check_col_stats(c, "stddev_col")?;
        Ok(col_stddev(&self.col_iter(c).collect::<Vec<_>>()))
    }

    pub fn count_eq_col(&self, c: usize, value: f64) -> Result<usize> {
        self.check_defined("count_eq_col")?;
        self.check_col_index(c, "count_eq_col")?;
        Ok(self.col_iter(c).filter(|&x| x == value).count())
    }

    pub fn count_neq_col(&self, c: usize, value: f64) -> Result<usize> {
        self.check_defined("count_neq_col")?;
        self.check_col_index(c, "count_neq_col")?;
        Ok(self.col_iter(c).filter(|&x| x != value).count())
    }

    /// Mean of every column, as a 1×C matrix
    pub fn mean_row_vectors(&self) -> Result<Matrix> {
        self.check_stats("mean_row_vectors")?;
        let n = self.rows() as f64;
        let values: Vec<f64> = (0..self.cols()).map(|c| self.col_iter(c).sum::<f64>() / n).collect();
        Matrix::from_slice(1, values.len(), &values)
    }

    /// Population standard deviation of every column, as a 1×C matrix
    pub fn stddev_row_vectors(&self) -> Result<Matrix> {
        self.check_stats("stddev_row_vectors")?;
        let values: Vec<f64> = (0..self.cols())
            .map(|c| col_stddev(&self.col_iter(c).collect::<Vec<_>>()))
            .collect();
        Matrix::from_slice(1, values.len(), &values)
    }

    // ============ Covariance matrices ============

    fn col_means(&self) -> Vec<f64> {
        let n = self.rows() as f64;
        (0..self.cols()).map(|c| self.col_iter(c).sum::<f64>() / n).collect()
    }

    /// C×C covariance between columns, dividing by the row count
    pub fn cov_matrix(&self) -> Result<Matrix> {
        self.check_stats("cov_matrix")?;
        let mean = self.col_means();
        let cols = self.cols();
        let inv = 1.0 / self.rows() as f64;
        let mut out = Matrix::with_size(cols, cols);
        for a in 0..cols {
            for b in a..cols {
                let sum: f64 = self
                    .iter_rows()
                    .map(|row| (row[a] - mean[a]) * (row[b] - mean[b]))
                    .sum();
                out[(a, b)] = sum * inv;
                out[(b, a)] = sum * inv;
            }
        }
        out.defined = true;
        Ok(out)
    }

    /// C×C' covariance between the columns of self and those of other
    pub fn cov_matrix_with(&self, other: &Matrix) -> Result<Matrix> {
        self.check_stats("cov_matrix_with")?;
        other.check_stats("cov_matrix_with")?;
        self.check_rows_equal(other, "cov_matrix_with")?;
        let mean = self.col_means();
        let mean_o = other.col_means();
        let inv = 1.0 / self.rows() as f64;
        let mut out = Matrix::with_size(self.cols(), other.cols());
        for a in 0..self.cols() {
            for b in 0..other.cols() {
                let sum: f64 = self
                    .iter_rows()
                    .zip(other.iter_rows())
                    .map(|(x, y)| (x[a] - mean[a]) * (y[b] - mean_o[b]))
                    .sum();
                out[(a, b)] = sum * inv;
            }
        }
        out.defined = true;
        Ok(out)
    }
}

fn first_best(row: &[f64], better: impl Fn(f64, f64) -> bool) -> usize {
    let mut at = 0;
    for (c, &x) in row.iter().enumerate() {
        if better(x, row[at]) {
            at = c;
        }
    }
    at
}

fn col_stddev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n).sqrt()
}
