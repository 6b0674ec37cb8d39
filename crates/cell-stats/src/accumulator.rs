//! Running mean and population standard deviation per cell.
//!
//! Each cell keeps a count, a running mean and the sum of squared
//! deviations (Welford). Two accumulators combine with the pairwise update
//! of Chan, Golub and LeVeque, so partial results from separate files can be
//! merged in any order.

use seaice_common::FILL_VALUE;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};
use crate::histogram::CellHistogram;

/// Streaming per-cell statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct CellAccumulator {
    count: Vec<u64>,
    mean: Vec<f64>,
    m2: Vec<f64>,
}

impl CellAccumulator {
    pub fn new(cell_count: usize) -> Self {
        Self {
            count: vec![0; cell_count],
            mean: vec![0.0; cell_count],
            m2: vec![0.0; cell_count],
        }
    }

    pub fn cell_count(&self) -> usize {
        self.count.len()
    }

    /// Add one observation to `cell` (0-based).
    #[inline]
    pub fn add(&mut self, cell: usize, value: f64) -> Result<()> {
        if cell >= self.count.len() {
            return Err(StatsError::cell_out_of_range(cell, self.count.len()));
        }
        let n = self.count[cell] + 1;
        let delta = value - self.mean[cell];
        self.mean[cell] += delta / n as f64;
        self.m2[cell] += delta * (value - self.mean[cell]);
        self.count[cell] = n;
        Ok(())
    }

    /// Add paired observations.
    pub fn extend(&mut self, cells: &[usize], values: &[f64]) -> Result<()> {
        if cells.len() != values.len() {
            return Err(StatsError::length_mismatch(
                "cells/values",
                cells.len(),
                values.len(),
            ));
        }
        if let Some(&c) = cells.iter().find(|&&c| c >= self.count.len()) {
            return Err(StatsError::cell_out_of_range(c, self.count.len()));
        }
        for (&c, &v) in cells.iter().zip(values) {
            self.add(c, v)?;
        }
        Ok(())
    }

    /// Fold another accumulator over the same cells into this one.
    pub fn merge(&mut self, other: &CellAccumulator) -> Result<()> {
        if other.cell_count() != self.cell_count() {
            return Err(StatsError::IncompatibleBins {
                left: self.cell_count(),
                right: other.cell_count(),
            });
        }

        for i in 0..self.count.len() {
            let nb = other.count[i];
            if nb == 0 {
                continue;
            }
            let na = self.count[i];
            if na == 0 {
                self.count[i] = nb;
                self.mean[i] = other.mean[i];
                self.m2[i] = other.m2[i];
                continue;
            }

            let n = na + nb;
            let (na_f, nb_f, n_f) = (na as f64, nb as f64, n as f64);
            let delta = other.mean[i] - self.mean[i];
            self.mean[i] += delta * nb_f / n_f;
            self.m2[i] += other.m2[i] + delta * delta * na_f * nb_f / n_f;
            self.count[i] = n;
        }
        Ok(())
    }

    /// Observation counts as a histogram.
    pub fn histogram(&self) -> CellHistogram {
        CellHistogram::from_counts(self.count.clone())
    }

    pub fn counts(&self) -> &[u64] {
        &self.count
    }

    /// Total observations over all cells.
    pub fn total(&self) -> u64 {
        self.count.iter().sum()
    }

    /// Final per-cell statistics. Empty cells get [`FILL_VALUE`].
    pub fn finish(&self) -> CellSummary {
        let mut mean = Vec::with_capacity(self.cell_count());
        let mut std = Vec::with_capacity(self.cell_count());

        for i in 0..self.cell_count() {
            let n = self.count[i];
            if n == 0 {
                mean.push(FILL_VALUE);
                std.push(FILL_VALUE);
            } else {
                mean.push(self.mean[i]);
                // population variance (divide by n)
                std.push((self.m2[i].max(0.0) / n as f64).sqrt());
            }
        }

        CellSummary {
            count: self.count.clone(),
            mean,
            std,
        }
    }
}

/// Count, mean and population standard deviation for every cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSummary {
    pub count: Vec<u64>,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl CellSummary {
    pub fn cell_count(&self) -> usize {
        self.count.len()
    }

    /// Counts as `f64`, the element type of the output file.
    pub fn count_f64(&self) -> Vec<f64> {
        self.count.iter().map(|&c| c as f64).collect()
    }

    /// Cells with at least one observation.
    pub fn occupied(&self) -> usize {
        self.count.iter().filter(|&&c| c > 0).count()
    }
}
