//! MPAS mesh loading.

use std::path::Path;

use seaice_common::Mesh;
use tracing::info;

use crate::error::NetCdfResult;
use crate::native::{open, read_all, require_variable};

/// Latitude variable of an MPAS mesh (radians).
pub const LAT_CELL: &str = "latCell";
/// Longitude variable of an MPAS mesh (radians).
pub const LON_CELL: &str = "lonCell";

/// Load cell-centre coordinates from a mesh file and convert them to degrees.
pub fn load_mesh(path: &Path) -> NetCdfResult<Mesh> {
    let file = open(path)?;
    let lat = read_all(&require_variable(&file, LAT_CELL, path)?)?;
    let lon = read_all(&require_variable(&file, LON_CELL, path)?)?;
    let mesh = Mesh::from_radians(&lat, &lon)?;

    info!(
        path = %path.display(),
        cells = mesh.cell_count(),
        "Loaded mesh"
    );
    Ok(mesh)
}
