//! Sample counts per cell.

use crate::error::{Result, StatsError};

/// Number of samples that fell into each of a fixed number of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellHistogram {
    counts: Vec<u64>,
}

impl CellHistogram {
    /// An empty histogram with `cell_count` bins.
    pub fn new(cell_count: usize) -> Self {
        Self {
            counts: vec![0; cell_count],
        }
    }

    /// Count every 0-based index in `cells`.
    pub fn from_indices(cell_count: usize, cells: &[usize]) -> Result<Self> {
        let mut hist = Self::new(cell_count);
        for &c in cells {
            hist.add(c)?;
        }
        Ok(hist)
    }

    pub fn from_counts(counts: Vec<u64>) -> Self {
        Self { counts }
    }

    #[inline]
    pub fn add(&mut self, cell: usize) -> Result<()> {
        let cell_count = self.counts.len();
        let count = self
            .counts
            .get_mut(cell)
            .ok_or_else(|| StatsError::cell_out_of_range(cell, cell_count))?;
        *count += 1;
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total samples over all cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Cells that received at least one sample.
    pub fn occupied(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Add another histogram's counts into this one.
    pub fn merge(&mut self, other: &CellHistogram) -> Result<()> {
        if other.cell_count() != self.cell_count() {
            return Err(StatsError::IncompatibleBins {
                left: self.cell_count(),
                right: other.cell_count(),
            });
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        Ok(())
    }

    /// Counts as `f64`, the element type of the output file.
    pub fn to_f64(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }
}
