//! Physical constants for freeboard estimation (kg/m³).

/// Density of sea water.
pub const DENSITY_WATER: f64 = 1026.0;

/// Density of sea ice.
pub const DENSITY_ICE: f64 = 917.0;

/// Density of snow on sea ice.
pub const DENSITY_SNOW: f64 = 330.0;
