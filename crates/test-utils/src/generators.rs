//! Test data generators for synthetic meshes, model fields and satellite tracks.
//!
//! These generators create predictable, verifiable data so that per-cell
//! statistics can be checked by hand.

/// Creates a regular latitude/longitude lattice standing in for an MPAS mesh.
///
/// Latitudes run from -89 to 89 degrees in `n_lat` rows and longitudes from
/// -180 (inclusive) eastwards in `n_lon` columns. Cell `row * n_lon + col`
/// sits at row `row`, column `col`.
///
/// # Returns
///
/// `(lat_deg, lon_deg)`, each of length `n_lat * n_lon`.
///
/// # Example
///
/// ```
/// use test_utils::create_polar_mesh;
///
/// let (lat, lon) = create_polar_mesh(3, 4);
/// assert_eq!(lat.len(), 12);
/// assert_eq!(lat[0], -89.0);
/// assert_eq!(lat[11], 89.0);
/// assert_eq!(lon[1], -90.0);
/// ```
pub fn create_polar_mesh(n_lat: usize, n_lon: usize) -> (Vec<f64>, Vec<f64>) {
    let mut lat = Vec::with_capacity(n_lat * n_lon);
    let mut lon = Vec::with_capacity(n_lat * n_lon);
    let dlat = if n_lat > 1 { 178.0 / (n_lat - 1) as f64 } else { 0.0 };
    let dlon = 360.0 / n_lon.max(1) as f64;
    for row in 0..n_lat {
        for col in 0..n_lon {
            lat.push(-89.0 + row as f64 * dlat);
            lon.push(-180.0 + col as f64 * dlon);
        }
    }
    (lat, lon)
}

/// Same as [`create_polar_mesh`] but in radians, as stored in mesh files.
pub fn create_polar_mesh_radians(n_lat: usize, n_lon: usize) -> (Vec<f64>, Vec<f64>) {
    let (lat, lon) = create_polar_mesh(n_lat, n_lon);
    (
        lat.into_iter().map(f64::to_radians).collect(),
        lon.into_iter().map(f64::to_radians).collect(),
    )
}

/// Model fields for a single day: `(ice_volume, ice_area, snow_volume)`.
///
/// Ice area cycles through 0.0, 0.25, 0.5, 0.75, 1.0 so that every fifth
/// cell is ice free. Volumes are `area * 2.0` (ice) and `area * 0.3` (snow),
/// giving 2 m ice and 0.3 m snow wherever ice exists.
pub fn create_model_fields(cells: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let area: Vec<f64> = (0..cells).map(|i| (i % 5) as f64 * 0.25).collect();
    let ice_volume = area.iter().map(|a| a * 2.0).collect();
    let snow_volume = area.iter().map(|a| a * 0.3).collect();
    (ice_volume, area, snow_volume)
}

/// A synthetic satellite track: photon readings and the cells they map to.
#[derive(Debug, Clone)]
pub struct SyntheticTrack {
    /// Freeboard readings (m).
    pub values: Vec<f64>,
    /// 0-based cell index of each reading.
    pub cells: Vec<i64>,
}

/// Creates a reproducible track of `len` readings over `cell_count` cells.
///
/// Readings are between 0.0 and 1.0 m. Indices are 0-based; add one for
/// sources that count cells from one.
pub fn create_track(len: usize, cell_count: usize, seed: u32) -> SyntheticTrack {
    let mut values = Vec::with_capacity(len);
    let mut cells = Vec::with_capacity(len);
    for i in 0..len {
        let hash = simple_hash(i as u32, cell_count as u32, seed);
        cells.push((hash as usize % cell_count.max(1)) as i64);
        values.push((hash % 1000) as f64 / 1000.0);
    }
    SyntheticTrack { values, cells }
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
