//! Common test fixtures for sea-ice processing tests.

/// Variable names used by MPAS-Seaice daily time-series output.
pub mod model_vars {
    pub const ICE_AREA: &str = "timeDaily_avg_iceAreaCell";
    pub const ICE_VOLUME: &str = "timeDaily_avg_iceVolumeCell";
    pub const SNOW_VOLUME: &str = "timeDaily_avg_snowVolumeCell";
    pub const START_TIME: &str = "xtime_startDaily";
}

/// Preprocessed ICESat track file names.
pub mod track_files {
    pub const SPRING_2008_02_22_14: &str = "icesat_E3SM_spring_2008_02_22_14.nc";
}

/// A small hand-checked aggregation case over 4 cells.
///
/// Cell 0: readings 1.0, 3.0 -> mean 2.0, population std 1.0.
/// Cell 1: no readings.
/// Cell 2: readings 0.5, 0.5, 0.5 -> mean 0.5, std 0.0.
/// Cell 3: reading 4.0 -> mean 4.0, std 0.0.
pub mod hand_checked {
    pub const CELL_COUNT: usize = 4;
    pub const VALUES: [f64; 6] = [1.0, 0.5, 3.0, 0.5, 4.0, 0.5];
    pub const CELLS: [i64; 6] = [0, 2, 0, 2, 3, 2];
    pub const COUNTS: [u64; 4] = [2, 0, 3, 1];
    pub const MEANS: [f64; 4] = [2.0, -99999.0, 0.5, 4.0];
    pub const STDS: [f64; 4] = [1.0, -99999.0, 0.0, 0.0];
}
