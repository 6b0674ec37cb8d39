//! Freeboard derived from model ice and snow volumes.
//!
//! ```text
//! h_i = V_i / A
//! h_s = V_s / A
//! fb  = h_i (rho_w - rho_i) / rho_w + h_s (rho_w - rho_s) / rho_w
//! ```
//!
//! Cells without ice (`A <= 0`) or with missing inputs yield [`FILL_VALUE`].

use seaice_common::physics::{DENSITY_ICE, DENSITY_SNOW, DENSITY_WATER};
use seaice_common::{is_fill, FILL_VALUE};

use crate::error::{Result, StatsError};

/// Freeboard contribution factor of ice thickness.
pub const ICE_FACTOR: f64 = (DENSITY_WATER - DENSITY_ICE) / DENSITY_WATER;

/// Freeboard contribution factor of snow thickness.
pub const SNOW_FACTOR: f64 = (DENSITY_WATER - DENSITY_SNOW) / DENSITY_WATER;

/// Freeboard from ice and snow thickness (m).
#[inline]
pub fn freeboard_from_thickness(ice_thickness: f64, snow_thickness: f64) -> f64 {
    ice_thickness * ICE_FACTOR + snow_thickness * SNOW_FACTOR
}

/// Freeboard of one cell from grid-cell averaged volumes and ice area.
pub fn cell_freeboard(ice_volume: f64, ice_area: f64, snow_volume: f64) -> f64 {
    if is_fill(ice_volume) || is_fill(ice_area) || is_fill(snow_volume) || ice_area <= 0.0 {
        return FILL_VALUE;
    }
    let fb = freeboard_from_thickness(ice_volume / ice_area, snow_volume / ice_area);
    if fb.is_finite() {
        fb
    } else {
        FILL_VALUE
    }
}

/// Freeboard for every cell of one time slice.
pub fn model_freeboard(ice_volume: &[f64], ice_area: &[f64], snow_volume: &[f64]) -> Result<Vec<f64>> {
    if ice_volume.len() != ice_area.len() {
        return Err(StatsError::length_mismatch(
            "iceVolume/iceArea",
            ice_volume.len(),
            ice_area.len(),
        ));
    }
    if snow_volume.len() != ice_area.len() {
        return Err(StatsError::length_mismatch(
            "snowVolume/iceArea",
            snow_volume.len(),
            ice_area.len(),
        ));
    }

    let out: Vec<f64> = ice_volume
        .iter()
        .zip(ice_area)
        .zip(snow_volume)
        .map(|((&vi, &a), &vs)| cell_freeboard(vi, a, vs))
        .collect();

    let ice_free = out.iter().filter(|&&v| v == FILL_VALUE).count();
    tracing::debug!(cells = out.len(), ice_free, "Computed model freeboard");

    Ok(out)
}
