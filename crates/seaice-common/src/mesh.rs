//! Unstructured mesh geometry and per-cell fields.

use serde::{Deserialize, Serialize};

use crate::error::{SeaIceError, SeaIceResult};
use crate::hemisphere::{hemisphere_indices, Hemisphere, HemisphereSummary};

/// Cell centres of an unstructured spherical mesh, in degrees.
///
/// Cell `i` is the same geographic point in every per-cell array of
/// matching length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub lat_deg: Vec<f64>,
    pub lon_deg: Vec<f64>,
}

impl Mesh {
    /// Create a mesh from latitude/longitude arrays in degrees.
    pub fn new(lat_deg: Vec<f64>, lon_deg: Vec<f64>) -> SeaIceResult<Self> {
        if lat_deg.len() != lon_deg.len() {
            return Err(SeaIceError::MeshShape {
                lat: lat_deg.len(),
                lon: lon_deg.len(),
            });
        }
        Ok(Self { lat_deg, lon_deg })
    }

    /// Create a mesh from latitude/longitude arrays in radians, as stored in
    /// MPAS mesh files.
    pub fn from_radians(lat_rad: &[f64], lon_rad: &[f64]) -> SeaIceResult<Self> {
        Self::new(
            lat_rad.iter().map(|v| v.to_degrees()).collect(),
            lon_rad.iter().map(|v| v.to_degrees()).collect(),
        )
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.lat_deg.len()
    }

    /// Check that a per-cell array can be indexed with this mesh.
    pub fn validate_field_len(&self, len: usize) -> SeaIceResult<()> {
        if len != self.cell_count() {
            return Err(SeaIceError::CellCountMismatch {
                expected: self.cell_count(),
                actual: len,
            });
        }
        Ok(())
    }

    /// Cells poleward of `threshold` in `hemisphere`.
    pub fn hemisphere_indices(&self, hemisphere: Hemisphere, threshold: f64) -> Vec<usize> {
        hemisphere_indices(&self.lat_deg, hemisphere, threshold)
    }

    /// Summarise a field over one hemisphere after checking its length.
    pub fn summarize(
        &self,
        field: &CellField,
        hemisphere: Hemisphere,
        threshold: f64,
        color_range: (f64, f64),
    ) -> SeaIceResult<HemisphereSummary> {
        self.validate_field_len(field.len())?;
        HemisphereSummary::compute(&self.lat_deg, &field.values, hemisphere, threshold, color_range)
    }
}

/// One per-cell scalar field at a single time slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellField {
    pub name: String,
    pub values: Vec<f64>,
}

impl CellField {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
