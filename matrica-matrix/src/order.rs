//! Row ordering: full sorts and top-k partial sorts
//!
//! Sorting moves row handles, never cells. Rows compare either
//! lexicographically over all columns or by a single key column.

use matrica_core::{Axis, MatrixError, Result};
use crate::types::Matrix;

/// Below this many rows a sort falls back to selection sort
const SORT_THRESHOLD: usize = 32;
/// Selection fallback size for top-k selection
const MAX_K_THRESHOLD: usize = 4;

type RowLess = fn(&Matrix, usize, usize, usize) -> bool;

fn less_rows(m: &Matrix, i: usize, j: usize, _key: usize) -> bool {
    m.is_less_rows(i, j)
}

fn less_key(m: &Matrix, i: usize, j: usize, key: usize) -> bool {
    m.row(i)[key] < m.row(j)[key]
}

/// Rows lower..=upper compared with `less`
struct Sorter<'a> {
    m: &'a mut Matrix,
    less: RowLess,
    key: usize,
}

impl Sorter<'_> {
    fn is_less(&self, i: usize, j: usize) -> bool {
        (self.less)(&*self.m, i, j, self.key)
    }

    fn select_sort(&mut self, lower: usize, upper: usize) {
        for l in lower..upper {
            let mut best = l;
            for u in l + 1..=upper {
                if self.is_less(u, best) {
                    best = u;
                }
            }
            if best != l {
                self.m.data.swap(l, best);
            }
        }
    }

    /// Partition around the last row; returns the pivot's final position
    fn partition(&mut self, lower: usize, upper: usize) -> usize {
        let mut save = lower;
        for ptr in lower..upper {
            if self.is_less(ptr, upper) {
                self.m.data.swap(save, ptr);
                save += 1;
            }
        }
        self.m.data.swap(upper, save);
        save
    }

    fn quick_sort(&mut self, lower: usize, upper: usize) {
        if upper - lower < SORT_THRESHOLD {
            self.select_sort(lower, upper);
            return;
        }
        let save = self.partition(lower, upper);
        if save > lower + 1 {
            self.quick_sort(lower, save - 1);
        }
        if upper > save + 1 {
            self.quick_sort(save + 1, upper);
        }
    }

    /// Sort only as much as needed for rows k.. to hold their final values
    fn quick_select(&mut self, k: usize, lower: usize, upper: usize) {
        if upper < k {
            return;
        }
        if upper - lower < MAX_K_THRESHOLD {
            self.select_sort(lower, upper);
            return;
        }
        let save = self.partition(lower, upper);
        if save > lower + 1 {
            self.quick_select(k, lower, save - 1);
        }
        if upper > save + 1 {
            self.quick_select(k, save + 1, upper);
        }
    }
}

impl Matrix {
    fn sorter(&mut self, less: RowLess, key: usize) -> Sorter<'_> {
        Sorter { m: self, less, key }
    }

    fn check_sort_range(&self, lo: usize, hi: usize, op: &'static str) -> Result<()> {
        self.check_row_index(lo, op)?;
        self.check_row_index(hi, op)
    }

    /// Sort all rows into ascending lexicographic order
    pub fn sort_rows(&mut self) -> Result<&mut Self> {
        self.check_defined("sort_rows")?;
        if self.rows() > 1 {
            let upper = self.rows() - 1;
            self.sorter(less_rows, 0).quick_sort(0, upper);
        }
        Ok(self)
    }

    /// Sort rows lo..=hi, leaving the others in place
    pub fn sort_rows_range(&mut self, lo: usize, hi: usize) -> Result<&mut Self> {
        self.check_defined("sort_rows_range")?;
        self.check_sort_range(lo, hi, "sort_rows_range")?;
        if hi > lo {
            self.sorter(less_rows, 0).quick_sort(lo, hi);
        }
        Ok(self)
    }

    /// Sort all rows by the value in column `c`
    pub fn sort_rows_by_col(&mut self, c: usize) -> Result<&mut Self> {
        self.check_defined("sort_rows_by_col")?;
        self.check_col_index(c, "sort_rows_by_col")?;
        if self.rows() > 1 {
            let upper = self.rows() - 1;
            self.sorter(less_key, c).quick_sort(0, upper);
        }
        Ok(self)
    }

    pub fn sort_rows_by_col_range(&mut self, c: usize, lo: usize, hi: usize) -> Result<&mut Self> {
        self.check_defined("sort_rows_by_col_range")?;
        self.check_col_index(c, "sort_rows_by_col_range")?;
        self.check_sort_range(lo, hi, "sort_rows_by_col_range")?;
        if hi > lo {
            self.sorter(less_key, c).quick_sort(lo, hi);
        }
        Ok(self)
    }

    fn check_k(&self, k: usize, op: &'static str) -> Result<()> {
        if k > self.rows() {
            return Err(MatrixError::bounds(op, &self.name, Axis::Row, k, self.rows() + 1));
        }
        Ok(())
    }

    /// Move the k largest rows, in ascending order, into the last k
    /// positions; the rest are left in no particular order
    pub fn max_k_rows(&mut self, k: usize) -> Result<&mut Self> {
        self.check_defined("max_k_rows")?;
        self.check_k(k, "max_k_rows")?;
        if self.rows() > 1 && k > 0 {
            let (rows, upper) = (self.rows(), self.rows() - 1);
            self.sorter(less_rows, 0).quick_select(rows - k, 0, upper);
        }
        Ok(self)
    }

    /// Like `max_k_rows` with column `c` as the key
    pub fn max_k_rows_by_col(&mut self, c: usize, k: usize) -> Result<&mut Self> {
        self.check_defined("max_k_rows_by_col")?;
        self.check_col_index(c, "max_k_rows_by_col")?;
        self.check_k(k, "max_k_rows_by_col")?;
        if self.rows() > 1 && k > 0 {
            let (rows, upper) = (self.rows(), self.rows() - 1);
            self.sorter(less_key, c).quick_select(rows - k, 0, upper);
        }
        Ok(self)
    }
}
