//! Writing the per-cell comparison statistics file.
//!
//! The file is NETCDF4_CLASSIC with a single dimension `nCells`. Every
//! variable is `f64` on `nCells` with a `long_name` and `valid_range`; mean,
//! standard deviation and effective sample size variables also carry
//! `_FillValue`.

use std::path::Path;

use chrono::Local;
use seaice_common::FILL_VALUE;
use tracing::info;

use crate::error::{NetCdfError, NetCdfResult};

/// Name of the only dimension of the statistics file.
pub const CELL_DIMENSION: &str = "nCells";

/// Layout of one output variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsVariable {
    pub name: &'static str,
    pub long_name: &'static str,
    pub valid_min: f64,
    pub valid_max: f64,
    pub has_fill: bool,
}

/// The eight variables of the statistics file, in file order.
pub const STATS_VARIABLES: [StatsVariable; 8] = [
    StatsVariable {
        name: "effmf",
        long_name: "model freeboard effective sample size",
        valid_min: 0.0,
        valid_max: 29.88248,
        has_fill: true,
    },
    StatsVariable {
        name: "effof",
        long_name: "observed freeboard effective sample size",
        valid_min: 0.2787585,
        valid_max: 22321.38,
        has_fill: true,
    },
    StatsVariable {
        name: "meanmf",
        long_name: "model freeboard mean",
        valid_min: 0.01583931,
        valid_max: 0.9041953,
        has_fill: true,
    },
    StatsVariable {
        name: "meanof",
        long_name: "observed freeboard mean",
        valid_min: 0.1046828,
        valid_max: 1.14699,
        has_fill: true,
    },
    StatsVariable {
        name: "samplemf",
        long_name: "model freeboard sample count",
        valid_min: 0.0,
        valid_max: 296.0,
        has_fill: false,
    },
    StatsVariable {
        name: "sampleof",
        long_name: "observed freeboard sample count",
        valid_min: 0.0,
        valid_max: 46893.0,
        has_fill: false,
    },
    StatsVariable {
        name: "stdmf",
        long_name: "model freeboard standard deviation",
        valid_min: 0.005416268,
        valid_max: 0.2506092,
        has_fill: true,
    },
    StatsVariable {
        name: "stdof",
        long_name: "observed freeboard standard deviation",
        valid_min: 0.01656876,
        valid_max: 0.9629242,
        has_fill: true,
    },
];

/// Look up the layout of a statistics variable by name.
pub fn stats_variable(name: &str) -> Option<&'static StatsVariable> {
    STATS_VARIABLES.iter().find(|v| v.name == name)
}

/// Global attributes of the statistics file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttributes {
    pub title: String,
    pub source: String,
    pub history: String,
    pub institution: String,
}

impl FileAttributes {
    /// Attributes with a `history` entry stamped with the current local time.
    pub fn new(
        title: impl Into<String>,
        source: impl Into<String>,
        institution: impl Into<String>,
        user: &str,
    ) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
            history: history_entry(&Local::now().naive_local(), user),
            institution: institution.into(),
        }
    }
}

/// `<dd-Month-YYYY HH:MM:SS>: File created by <user>`
pub fn history_entry(when: &chrono::NaiveDateTime, user: &str) -> String {
    format!("{}: File created by {}", when.format("%d-%B-%Y %H:%M:%S"), user)
}

/// Write the statistics file.
///
/// `variables` must name every entry of [`STATS_VARIABLES`] exactly once,
/// each with `cell_count` values. An existing file at `path` is replaced.
pub fn write_stats_file(
    path: &Path,
    attributes: &FileAttributes,
    cell_count: usize,
    variables: &[(&str, &[f64])],
) -> NetCdfResult<()> {
    for layout in &STATS_VARIABLES {
        let matches = variables.iter().filter(|(n, _)| *n == layout.name).count();
        if matches != 1 {
            return Err(NetCdfError::MissingData(format!(
                "statistics variable {} supplied {} times",
                layout.name, matches
            )));
        }
    }
    for (name, values) in variables {
        if stats_variable(name).is_none() {
            return Err(NetCdfError::InvalidFormat(format!(
                "unknown statistics variable {}",
                name
            )));
        }
        if values.len() != cell_count {
            return Err(NetCdfError::Domain(
                seaice_common::SeaIceError::CellCountMismatch {
                    expected: cell_count,
                    actual: values.len(),
                },
            ));
        }
    }

    let mut file = netcdf::create_with(path, netcdf::Options::NETCDF4 | netcdf::Options::CLASSIC)?;
    file.add_dimension(CELL_DIMENSION, cell_count)?;

    file.add_attribute("title", attributes.title.as_str())?;
    file.add_attribute("source", attributes.source.as_str())?;
    file.add_attribute("history", attributes.history.as_str())?;
    file.add_attribute("institution", attributes.institution.as_str())?;

    for layout in &STATS_VARIABLES {
        let values = variables
            .iter()
            .find(|(n, _)| *n == layout.name)
            .map(|(_, v)| *v)
            .ok_or_else(|| NetCdfError::MissingData(layout.name.to_string()))?;

        let mut var = file.add_variable::<f64>(layout.name, &[CELL_DIMENSION])?;
        var.put_attribute("long_name", layout.long_name)?;
        var.put_attribute("valid_range", vec![layout.valid_min, layout.valid_max])?;
        if layout.has_fill {
            var.put_attribute("_FillValue", FILL_VALUE)?;
        }
        var.put_values(values, ..)?;
    }

    info!(path = %path.display(), cells = cell_count, "Wrote statistics file");
    Ok(())
}
