//! Hemisphere selection by latitude threshold.

use serde::{Deserialize, Serialize};

use crate::cell::is_fill;
use crate::error::{SeaIceError, SeaIceResult};

/// Polar hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Both hemispheres, north first.
    pub const BOTH: [Hemisphere; 2] = [Hemisphere::North, Hemisphere::South];

    /// Whether a latitude (degrees) lies poleward of `threshold` in this hemisphere.
    ///
    /// The comparison is strict: a cell exactly at the threshold is excluded.
    #[inline]
    pub fn contains(self, lat_deg: f64, threshold: f64) -> bool {
        match self {
            Hemisphere::North => lat_deg > threshold,
            Hemisphere::South => lat_deg < -threshold,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Hemisphere::North => "north",
            Hemisphere::South => "south",
        }
    }
}

impl std::fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Indices of the cells poleward of `threshold` degrees.
///
/// `threshold` is expected in `0 <= threshold < 90`. Other values are not
/// rejected here; configuration validation keeps them out of the pipeline.
pub fn hemisphere_indices(lat_deg: &[f64], hemisphere: Hemisphere, threshold: f64) -> Vec<usize> {
    lat_deg
        .iter()
        .enumerate()
        .filter(|(_, &lat)| hemisphere.contains(lat, threshold))
        .map(|(i, _)| i)
        .collect()
}

/// Keep every `factor`-th element, starting with the first.
pub fn downsample<T: Copy>(values: &[T], factor: usize) -> SeaIceResult<Vec<T>> {
    if factor == 0 {
        return Err(SeaIceError::invalid_parameter(
            "downsample_factor",
            "must be at least 1",
        ));
    }
    Ok(values.iter().step_by(factor).copied().collect())
}

/// Summary of a per-cell field restricted to one hemisphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HemisphereSummary {
    pub hemisphere: Hemisphere,
    /// Cells poleward of the threshold.
    pub cells: usize,
    /// Cells among those with a usable value.
    pub valid: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    /// Valid values that fall outside the colour-scale bounds.
    pub outside_color_range: usize,
}

impl HemisphereSummary {
    /// Summarise `values` over the cells of `hemisphere`.
    ///
    /// `lat_deg` and `values` must have the same length.
    pub fn compute(
        lat_deg: &[f64],
        values: &[f64],
        hemisphere: Hemisphere,
        threshold: f64,
        color_range: (f64, f64),
    ) -> SeaIceResult<Self> {
        if lat_deg.len() != values.len() {
            return Err(SeaIceError::CellCountMismatch {
                expected: lat_deg.len(),
                actual: values.len(),
            });
        }

        let indices = hemisphere_indices(lat_deg, hemisphere, threshold);
        let (vmin, vmax) = color_range;

        let mut valid = 0usize;
        let mut sum = 0.0f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut outside = 0usize;

        for &i in &indices {
            let v = values[i];
            if is_fill(v) {
                continue;
            }
            valid += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
            if v < vmin || v > vmax {
                outside += 1;
            }
        }

        let (min, max, mean) = if valid > 0 {
            (Some(min), Some(max), Some(sum / valid as f64))
        } else {
            (None, None, None)
        };

        Ok(Self {
            hemisphere,
            cells: indices.len(),
            valid,
            min,
            max,
            mean,
            outside_color_range: outside,
        })
    }
}
