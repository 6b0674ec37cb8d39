//! Error types for per-cell statistics.

use seaice_common::SeaIceError;
use thiserror::Error;

/// Errors that can occur while aggregating per-cell statistics.
#[derive(Error, Debug)]
pub enum StatsError {
    /// Paired arrays (values and indices, or model fields) differ in length.
    #[error("length mismatch for {what}: {left} vs {right}")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    /// Two accumulators over different cell counts were combined.
    #[error("cannot merge statistics over {left} cells with statistics over {right} cells")]
    IncompatibleBins { left: usize, right: usize },

    /// Index or shape error from the shared domain types.
    #[error(transparent)]
    Domain(#[from] SeaIceError),
}

impl StatsError {
    pub fn length_mismatch(what: &'static str, left: usize, right: usize) -> Self {
        Self::LengthMismatch { what, left, right }
    }

    pub(crate) fn cell_out_of_range(cell: usize, cell_count: usize) -> Self {
        Self::Domain(SeaIceError::CellIndexOutOfRange {
            index: cell as i64,
            cell_count,
        })
    }
}

/// Result type for statistics operations.
pub type Result<T> = std::result::Result<T, StatsError>;
