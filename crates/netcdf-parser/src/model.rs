//! MPAS-Seaice daily time-series output.
//!
//! Variables such as `timeDaily_avg_iceAreaCell` are stored as
//! `(Time, nCells)`; the start of each daily average is kept in the
//! character array `xtime_startDaily`.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use seaice_common::time::parse_mpas_xtime;
use seaice_common::CellField;
use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{list_variables, open, read_char_rows, read_row, require_variable, VariableInfo};

/// Default start-time variable of daily statistics files.
pub const START_TIME_VARIABLE: &str = "xtime_startDaily";

/// An open model output file.
pub struct ModelOutput {
    path: PathBuf,
    file: netcdf::File,
}

impl ModelOutput {
    pub fn open(path: &Path) -> NetCdfResult<Self> {
        let file = open(path)?;
        debug!(path = %path.display(), "Opened model output");
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Every variable with its dimensions.
    pub fn variables(&self) -> Vec<VariableInfo> {
        list_variables(&self.file)
    }

    /// Number of time slices (days) of `variable`.
    pub fn time_count(&self, variable: &str) -> NetCdfResult<usize> {
        let var = require_variable(&self.file, variable, &self.path)?;
        let dims = var.dimensions();
        match dims.len() {
            1 => Ok(1),
            2 => Ok(dims[0].len()),
            n => Err(NetCdfError::InvalidFormat(format!(
                "{} has {} dimensions, expected (Time, nCells)",
                variable, n
            ))),
        }
    }

    /// One time slice of `variable`, one value per cell.
    pub fn read_time_slice(&self, variable: &str, time_index: usize) -> NetCdfResult<CellField> {
        let var = require_variable(&self.file, variable, &self.path)?;
        let values = read_row(&var, time_index)?;
        debug!(
            variable,
            time_index,
            cells = values.len(),
            "Read model time slice"
        );
        Ok(CellField::new(variable, values))
    }

    /// Raw start-time strings, one per time slice.
    pub fn start_times(&self, variable: &str) -> NetCdfResult<Vec<String>> {
        let var = require_variable(&self.file, variable, &self.path)?;
        read_char_rows(&var)
    }

    /// Start times parsed as MPAS timestamps.
    pub fn start_datetimes(&self, variable: &str) -> NetCdfResult<Vec<NaiveDateTime>> {
        self.start_times(variable)?
            .iter()
            .map(|s| parse_mpas_xtime(s).map_err(NetCdfError::from))
            .collect()
    }
}
