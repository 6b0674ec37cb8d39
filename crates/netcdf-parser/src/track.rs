//! Preprocessed ICESat track files.
//!
//! Each file covers a few hours of one orbit already mapped onto the model
//! mesh. Variables are either 1-D or `(1, n)`; only the first row is used.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use seaice_common::{hours_since_epoch_to_datetime, is_fill, SatelliteFileStamp};
use tracing::{debug, warn};

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{get_f64_attr, open, read_row, require_variable, to_indices};

/// Variable names inside a track file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackVariables {
    pub freeboard: String,
    /// Photon-level cell index.
    pub cell: String,
    /// Pass-level cell index.
    pub pass_cell: String,
    pub latitude: String,
    /// Hours since 2000-01-01 00:00:00.
    pub time: String,
}

impl Default for TrackVariables {
    fn default() -> Self {
        Self {
            freeboard: "freeboard".to_string(),
            cell: "cell".to_string(),
            pass_cell: "modcell".to_string(),
            latitude: "latitude".to_string(),
            time: "time".to_string(),
        }
    }
}

/// Readings of one track file with raw (unshifted) cell indices.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteTrack {
    pub path: PathBuf,
    /// Season and timestamp parsed from the file name, when it follows the
    /// `icesat_E3SM_<season>_<YYYY>_<MM>_<DD>_<HH>.nc` pattern.
    pub stamp: Option<SatelliteFileStamp>,
    pub freeboard: Vec<f64>,
    pub cells: Vec<i64>,
    pub pass_cells: Vec<i64>,
    /// Per-reading latitude (degrees), aligned with `freeboard`.
    pub latitude: Option<Vec<f64>>,
    /// First entry of the `time` variable.
    pub start_time: Option<DateTime<Utc>>,
    /// Readings discarded as missing.
    pub dropped: usize,
}

impl SatelliteTrack {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn observation_count(&self) -> usize {
        self.freeboard.len()
    }
}

/// Load one track file.
///
/// Readings that are non-finite, equal to the variable's `_FillValue`, or
/// equal to the workspace fill value are dropped along with their cell index
/// and latitude.
pub fn load_track(path: &Path, vars: &TrackVariables) -> NetCdfResult<SatelliteTrack> {
    let file = open(path)?;

    let fb_var = require_variable(&file, &vars.freeboard, path)?;
    let file_fill = get_f64_attr(&fb_var, "_FillValue");
    let raw_fb = read_row(&fb_var, 0)?;
    let raw_cells = to_indices(
        &read_row(&require_variable(&file, &vars.cell, path)?, 0)?,
        &vars.cell,
    )?;
    if raw_cells.len() != raw_fb.len() {
        return Err(NetCdfError::InvalidFormat(format!(
            "{}: {} has {} values but {} has {}",
            path.display(),
            vars.freeboard,
            raw_fb.len(),
            vars.cell,
            raw_cells.len()
        )));
    }
    let pass_cells = to_indices(
        &read_row(&require_variable(&file, &vars.pass_cell, path)?, 0)?,
        &vars.pass_cell,
    )?;

    let raw_lat = read_optional_row(&file, &vars.latitude, raw_fb.len());

    let keep: Vec<bool> = raw_fb
        .iter()
        .map(|&v| v.is_finite() && !is_fill(v) && file_fill.map_or(true, |f| v != f))
        .collect();
    let dropped = keep.iter().filter(|&&k| !k).count();

    let freeboard = select(&raw_fb, &keep);
    let cells = select(&raw_cells, &keep);
    let latitude = raw_lat.map(|v| select(&v, &keep));

    let start_time = file
        .variable(&vars.time)
        .and_then(|v| read_row(&v, 0).ok())
        .and_then(|t| t.first().copied())
        .and_then(hours_since_epoch_to_datetime);

    let stamp = path
        .file_name()
        .and_then(|n| SatelliteFileStamp::parse(&n.to_string_lossy()).ok());

    if dropped > 0 {
        debug!(path = %path.display(), dropped, "Dropped missing freeboard readings");
    }
    debug!(
        path = %path.display(),
        observations = freeboard.len(),
        passes = pass_cells.len(),
        "Loaded track"
    );

    Ok(SatelliteTrack {
        path: path.to_path_buf(),
        stamp,
        freeboard,
        cells,
        pass_cells,
        latitude,
        start_time,
        dropped,
    })
}

/// Read a coordinate row that is only kept when it lines up with the
/// readings.
fn read_optional_row(file: &netcdf::File, name: &str, expected: usize) -> Option<Vec<f64>> {
    let values = read_row(&file.variable(name)?, 0).ok()?;
    if values.len() == expected {
        Some(values)
    } else {
        warn!(
            variable = name,
            len = values.len(),
            expected,
            "Ignoring coordinate with unexpected length"
        );
        None
    }
}

fn select<T: Copy>(values: &[T], keep: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(keep)
        .filter_map(|(&v, &k)| k.then_some(v))
        .collect()
}
