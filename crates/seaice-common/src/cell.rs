//! Cell indexing conventions and the fill value used in output files.

use serde::{Deserialize, Serialize};

use crate::error::{SeaIceError, SeaIceResult};

/// Fill value written for cells without data.
pub const FILL_VALUE: f64 = -99999.0;

/// Returns true if a value is missing: non-finite or equal to [`FILL_VALUE`].
#[inline]
pub fn is_fill(value: f64) -> bool {
    !value.is_finite() || value == FILL_VALUE
}

/// Numbering convention of the cell indices stored in a data source.
///
/// Some preprocessed track files count cells from one, others from zero.
/// The base is chosen per source in the pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CellIndexBase {
    /// Indices already address the mesh arrays directly.
    Zero,
    /// Indices start at 1 and are shifted down before binning.
    #[default]
    One,
}

impl CellIndexBase {
    /// Offset subtracted from raw indices.
    pub fn offset(self) -> i64 {
        match self {
            CellIndexBase::Zero => 0,
            CellIndexBase::One => 1,
        }
    }

    /// Convert a raw index from a file into a 0-based mesh index.
    ///
    /// Fails when the shifted index does not address one of `cell_count` cells.
    pub fn resolve(self, raw: i64, cell_count: usize) -> SeaIceResult<usize> {
        let index = raw - self.offset();
        if index < 0 || index as u64 >= cell_count as u64 {
            return Err(SeaIceError::CellIndexOutOfRange { index, cell_count });
        }
        Ok(index as usize)
    }

    /// Convert a whole slice of raw indices.
    pub fn resolve_all(self, raw: &[i64], cell_count: usize) -> SeaIceResult<Vec<usize>> {
        raw.iter().map(|&r| self.resolve(r, cell_count)).collect()
    }
}
