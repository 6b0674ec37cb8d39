//! Time handling for model output and satellite track files.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SeaIceError, SeaIceResult};

const TRACK_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2000, 1, 1) {
    Some(date) => date,
    None => panic!("track epoch is not a valid date"),
};

/// Reference epoch of the track `time` variable (hours since).
pub fn track_epoch() -> DateTime<Utc> {
    TRACK_EPOCH.and_time(NaiveTime::MIN).and_utc()
}

/// Convert proleptic-gregorian "hours since 2000-01-01" to a timestamp.
///
/// Returns `None` for non-finite inputs or values outside chrono's range.
pub fn hours_since_epoch_to_datetime(hours: f64) -> Option<DateTime<Utc>> {
    if !hours.is_finite() {
        return None;
    }
    // i64::MAX rounds up to 2^63 as f64, so the bound is exclusive
    let millis = (hours * 3_600_000.0).round();
    if millis.abs() >= i64::MAX as f64 {
        return None;
    }
    TimeDelta::try_milliseconds(millis as i64)
        .and_then(|delta| track_epoch().checked_add_signed(delta))
}

/// Parse an MPAS `xtime` string such as `0001-01-01_00:00:00`.
pub fn parse_mpas_xtime(s: &str) -> SeaIceResult<NaiveDateTime> {
    let trimmed = s.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d_%H:%M:%S")
        .map_err(|_| SeaIceError::InvalidTime(trimmed.to_string()))
}

/// Season, date and hour encoded in a preprocessed ICESat track file name,
/// e.g. `icesat_E3SM_spring_2008_02_22_14.nc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SatelliteFileStamp {
    pub season: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

const FILE_PREFIX: &str = "icesat_E3SM_";

impl SatelliteFileStamp {
    pub fn new(season: impl Into<String>, year: i32, month: u32, day: u32, hour: u32) -> Self {
        Self {
            season: season.into(),
            year,
            month,
            day,
            hour,
        }
    }

    /// Parse a track file name (directory components are ignored).
    pub fn parse(file_name: &str) -> SeaIceResult<Self> {
        let name = std::path::Path::new(file_name)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);
        let invalid = || SeaIceError::InvalidFileName(name.to_string());

        let stem = name
            .strip_prefix(FILE_PREFIX)
            .and_then(|s| s.strip_suffix(".nc"))
            .ok_or_else(invalid)?;

        // season_YYYY_MM_DD_HH; the season itself never contains '_'
        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() != 5 || parts[0].is_empty() {
            return Err(invalid());
        }

        let year = parts[1].parse::<i32>().map_err(|_| invalid())?;
        let month = parts[2].parse::<u32>().map_err(|_| invalid())?;
        let day = parts[3].parse::<u32>().map_err(|_| invalid())?;
        let hour = parts[4].parse::<u32>().map_err(|_| invalid())?;

        let stamp = Self::new(parts[0], year, month, day, hour);
        stamp.datetime().ok_or_else(invalid)?;
        Ok(stamp)
    }

    /// File name following the preprocessing naming scheme.
    pub fn file_name(&self) -> String {
        format!(
            "{}{}_{}_{:02}_{:02}_{:02}.nc",
            FILE_PREFIX, self.season, self.year, self.month, self.day, self.hour
        )
    }

    /// Timestamp of the track, or `None` for an impossible date.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day)?;
        let naive = date.and_hms_opt(self.hour, 0, 0)?;
        Some(Utc.from_utc_datetime(&naive))
    }
}

impl std::fmt::Display for SatelliteFileStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:04}-{:02}-{:02} {:02}:00",
            self.season, self.year, self.month, self.day, self.hour
        )
    }
}
