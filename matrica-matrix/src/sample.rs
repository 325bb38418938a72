//! Random sampling of rows and columns, and shuffling
//!
//! The receiver's shape fixes the sample size. Sampling without
//! replacement uses Floyd's algorithm, whose result is close to sorted;
//! shuffle afterwards when a random order matters.

use matrica_core::{MatrixError, RandomSource, Result};
use crate::helpers::check_random;
use crate::types::Matrix;

/// Draw `s` distinct indices from 0..n with Floyd's algorithm
pub fn floyd_sample(n: usize, s: usize, rng: &mut impl RandomSource) -> Result<Vec<usize>> {
    check_random(rng, "floyd_sample")?;
    if s > n {
        return Err(MatrixError::domain(
            "floyd_sample",
            format!("cannot draw {} distinct items from {}", s, n),
        ));
    }
    let mut picked = Vec::with_capacity(s);
    for j in n - s..n {
        let t = rng.uniform_int(j + 1)?;
        picked.push(if picked.contains(&t) { j } else { t });
    }
    Ok(picked)
}

impl Matrix {
    /// Fill self with rows of `data` drawn with replacement
    pub fn sample(&mut self, data: &Matrix, rng: &mut impl RandomSource) -> Result<&mut Self> {
        check_random(rng, "sample")?;
        self.check_allocated("sample")?;
        data.check_defined("sample")?;
        data.check_usable("sample")?;
        self.check_cols_equal(data, "sample")?;
        for r in 0..self.rows() {
            let src = rng.uniform_int(data.rows())?;
            self.row_mut(r).copy_from_slice(data.row(src));
        }
        self.defined = true;
        Ok(self)
    }

    /// Fill self with distinct rows of `data`
    pub fn sample_without_rows(&mut self, data: &Matrix, rng: &mut impl RandomSource) -> Result<&mut Self> {
        check_random(rng, "sample_without_rows")?;
        self.check_allocated("sample_without_rows")?;
        data.check_defined("sample_without_rows")?;
        self.check_cols_equal(data, "sample_without_rows")?;
        let picked = floyd_sample(data.rows(), self.rows(), rng)?;
        for (r, &src) in picked.iter().enumerate() {
            self.row_mut(r).copy_from_slice(data.row(src));
        }
        self.defined = true;
        Ok(self)
    }

    /// Fill self with distinct columns of `data`
    pub fn sample_without_cols(&mut self, data: &Matrix, rng: &mut impl RandomSource) -> Result<&mut Self> {
        check_random(rng, "sample_without_cols")?;
        self.check_allocated("sample_without_cols")?;
        data.check_defined("sample_without_cols")?;
        self.check_rows_equal(data, "sample_without_cols")?;
        let picked = floyd_sample(data.cols(), self.cols(), rng)?;
        for r in 0..self.rows() {
            let src = data.row(r);
            for (x, &c) in self.row_mut(r).iter_mut().zip(&picked) {
                *x = src[c];
            }
        }
        self.defined = true;
        Ok(self)
    }

    /// Randomly permute the rows in place
    pub fn shuffle(&mut self, rng: &mut impl RandomSource) -> Result<&mut Self> {
        check_random(rng, "shuffle")?;
        self.check_defined("shuffle")?;
        let n = self.rows();
        for r in 0..n.saturating_sub(1) {
            let rr = r + rng.uniform_int(n - r)?;
            self.data.swap(r, rr);
        }
        Ok(self)
    }
}
