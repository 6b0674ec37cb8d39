//! ICESat orbital synchronizer files.
//!
//! A synchronizer lists every preprocessed track file by its time, calendar
//! fields and orbit cluster. It is used to pick the track files for a season
//! or year without listing the satellite directory.

use std::path::Path;

use seaice_common::{SatelliteFileStamp, SeaIceError};
use tracing::info;

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{open, read_all, require_variable, to_indices};

const COLUMNS: [&str; 6] = ["time", "year", "month", "day", "hour", "cluster"];

/// One track file described by the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncEntry {
    /// Hours since 2000-01-01.
    pub time: f64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub cluster: i64,
}

impl SyncEntry {
    /// File stamp of the track for `season`.
    pub fn stamp(&self, season: &str) -> SatelliteFileStamp {
        SatelliteFileStamp::new(season, self.year, self.month, self.day, self.hour)
    }
}

/// All entries of a synchronizer file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Synchronizer {
    pub entries: Vec<SyncEntry>,
}

impl Synchronizer {
    pub fn load(path: &Path) -> NetCdfResult<Self> {
        let file = open(path)?;
        let mut columns = Vec::with_capacity(COLUMNS.len());
        for name in COLUMNS {
            columns.push(read_all(&require_variable(&file, name, path)?)?);
        }
        let sync = Self::from_columns(
            &columns[0],
            &columns[1],
            &columns[2],
            &columns[3],
            &columns[4],
            &columns[5],
        )?;
        info!(path = %path.display(), entries = sync.entries.len(), "Loaded synchronizer");
        Ok(sync)
    }

    /// Build from parallel columns as stored in the file.
    pub fn from_columns(
        time: &[f64],
        year: &[f64],
        month: &[f64],
        day: &[f64],
        hour: &[f64],
        cluster: &[f64],
    ) -> NetCdfResult<Self> {
        let n = time.len();
        for (name, col) in COLUMNS[1..].iter().zip([year, month, day, hour, cluster]) {
            if col.len() != n {
                return Err(NetCdfError::InvalidFormat(format!(
                    "synchronizer column {} has {} entries, expected {}",
                    name,
                    col.len(),
                    n
                )));
            }
        }

        let year = to_indices(year, "year")?;
        let month = to_indices(month, "month")?;
        let day = to_indices(day, "day")?;
        let hour = to_indices(hour, "hour")?;
        let cluster = to_indices(cluster, "cluster")?;

        let entries = (0..n)
            .map(|i| {
                Ok(SyncEntry {
                    time: time[i],
                    year: narrow("year", year[i])?,
                    month: narrow("month", month[i])?,
                    day: narrow("day", day[i])?,
                    hour: narrow("hour", hour[i])?,
                    cluster: cluster[i],
                })
            })
            .collect::<NetCdfResult<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Entries matching an optional cluster and year.
    pub fn select(&self, cluster: Option<i64>, year: Option<i32>) -> Vec<&SyncEntry> {
        self.entries
            .iter()
            .filter(|e| cluster.map_or(true, |c| e.cluster == c))
            .filter(|e| year.map_or(true, |y| e.year == y))
            .collect()
    }

    /// Track file names of the selected entries for `season`.
    pub fn file_names(&self, season: &str, cluster: Option<i64>, year: Option<i32>) -> Vec<String> {
        self.select(cluster, year)
            .into_iter()
            .map(|e| e.stamp(season).file_name())
            .collect()
    }
}

fn narrow<T: TryFrom<i64>>(what: &str, value: i64) -> NetCdfResult<T> {
    T::try_from(value).map_err(|_| {
        NetCdfError::Domain(SeaIceError::invalid_parameter(
            what,
            format!("{} does not fit a calendar field", value),
        ))
    })
}
