//! Pipeline configuration.
//!
//! Every path, variable name and threshold the comparison needs lives in one
//! [`PipelineConfig`]. It is read from YAML (see [`crate::config_loader`]) or
//! assembled from defaults, and environment variables override either source.

use std::env;
use std::path::PathBuf;

use netcdf_parser::TrackVariables;
use seaice_common::CellIndexBase;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration values that cannot drive a run.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("lat_limit must be in [0, 90), got {0}")]
    LatLimit(f64),

    #[error("render.vmin ({vmin}) must be less than render.vmax ({vmax})")]
    ColorRange { vmin: f64, vmax: f64 },

    #[error("render.dot_size must be positive, got {0}")]
    DotSize(f64),

    #[error("selection.downsample_factor must be at least 1")]
    DownsampleFactor,

    #[error("output.cell_count must be positive when set")]
    CellCount,

    #[error("selection.season cannot be empty")]
    EmptySeason,

    #[error("Invalid value for {var}: {value}")]
    Env { var: &'static str, value: String },
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub selection: SelectionConfig,
    pub indexing: IndexingConfig,
    pub variables: VariablesConfig,
    pub render: RenderConfig,
    pub output: OutputConfig,
}

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub mesh_file: PathBuf,
    pub model_file: PathBuf,
    /// Directory searched recursively for track files.
    pub satellite_dir: PathBuf,
    /// When set, track files are chosen through the synchronizer instead of
    /// listing `satellite_dir`.
    pub synchronizer_file: Option<PathBuf>,
    pub output_file: PathBuf,
    pub image_file: Option<PathBuf>,
    pub animation_file: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            mesh_file: PathBuf::from("mesh_files/seaice.EC30to60E2r2.210210.nc"),
            model_file: PathBuf::from("output_files/timeSeriesStatsDaily.nc"),
            satellite_dir: PathBuf::from("satellite_data_preprocessed/one_day"),
            synchronizer_file: None,
            output_file: PathBuf::from("new.nc"),
            image_file: None,
            animation_file: None,
        }
    }
}

/// What to look at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Model variable reported by `summary`.
    pub variable: String,
    /// Hemisphere threshold in degrees latitude.
    pub lat_limit: f64,
    /// Day (leading-dimension index) of the model file.
    pub time_index: usize,
    pub downsample_factor: usize,
    /// Season component of track file names.
    pub season: String,
    pub cluster: Option<i64>,
    pub year: Option<i32>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            variable: "timeDaily_avg_iceAreaCell".to_string(),
            lat_limit: 50.0,
            time_index: 0,
            downsample_factor: 1,
            season: "spring".to_string(),
            cluster: None,
            year: None,
        }
    }
}

/// Base of the cell indices stored in track files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    pub observation_base: CellIndexBase,
    pub pass_base: CellIndexBase,
}

/// Variable names in model and track files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariablesConfig {
    pub ice_area: String,
    pub ice_volume: String,
    pub snow_volume: String,
    pub start_time: String,
    pub freeboard: String,
    pub cell: String,
    pub pass_cell: String,
    pub latitude: String,
    pub time: String,
}

impl Default for VariablesConfig {
    fn default() -> Self {
        let track = TrackVariables::default();
        Self {
            ice_area: "timeDaily_avg_iceAreaCell".to_string(),
            ice_volume: "timeDaily_avg_iceVolumeCell".to_string(),
            snow_volume: "timeDaily_avg_snowVolumeCell".to_string(),
            start_time: netcdf_parser::START_TIME_VARIABLE.to_string(),
            freeboard: track.freeboard,
            cell: track.cell,
            pass_cell: track.pass_cell,
            latitude: track.latitude,
            time: track.time,
        }
    }
}

impl VariablesConfig {
    pub fn track_variables(&self) -> TrackVariables {
        TrackVariables {
            freeboard: self.freeboard.clone(),
            cell: self.cell.clone(),
            pass_cell: self.pass_cell.clone(),
            latitude: self.latitude.clone(),
            time: self.time.clone(),
        }
    }
}

/// Map rendering options. Validated only; no image is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub dot_size: f64,
    pub vmin: f64,
    pub vmax: f64,
    pub colorbar: bool,
    pub ocean: bool,
    pub land: bool,
    pub grid: bool,
    pub coastlines: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dot_size: 7.0,
            vmin: 0.0,
            vmax: 1.0,
            colorbar: true,
            ocean: true,
            land: true,
            grid: true,
            coastlines: true,
        }
    }
}

impl RenderConfig {
    pub fn color_range(&self) -> (f64, f64) {
        (self.vmin, self.vmax)
    }
}

/// Statistics file metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub title: String,
    pub source: String,
    pub institution: String,
    /// Number of cells in the output file; defaults to the mesh size.
    pub cell_count: Option<usize>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            title: "Comparison of icesat freeboard with E3SM".to_string(),
            source: String::new(),
            institution: "Los Alamos National Laboratory".to_string(),
            cell_count: None,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        crate::config_loader::load_pipeline_config(path)
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override individual settings from `SEAICE_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(v) = env::var("SEAICE_MESH_FILE") {
            self.paths.mesh_file = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SEAICE_MODEL_FILE") {
            self.paths.model_file = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SEAICE_SATELLITE_DIR") {
            self.paths.satellite_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SEAICE_SYNCHRONIZER_FILE") {
            self.paths.synchronizer_file = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("SEAICE_OUTPUT_FILE") {
            self.paths.output_file = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SEAICE_VARIABLE") {
            self.selection.variable = v;
        }
        if let Ok(v) = env::var("SEAICE_LAT_LIMIT") {
            self.selection.lat_limit = parse_env("SEAICE_LAT_LIMIT", &v)?;
        }
        if let Ok(v) = env::var("SEAICE_TIME_INDEX") {
            self.selection.time_index = parse_env("SEAICE_TIME_INDEX", &v)?;
        }
        if let Ok(v) = env::var("SEAICE_SEASON") {
            self.selection.season = v;
        }
        if let Ok(v) = env::var("SEAICE_SOURCE") {
            self.output.source = v;
        }
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lat = self.selection.lat_limit;
        if !(0.0..90.0).contains(&lat) {
            return Err(ConfigError::LatLimit(lat));
        }
        if !(self.render.vmin < self.render.vmax) {
            return Err(ConfigError::ColorRange {
                vmin: self.render.vmin,
                vmax: self.render.vmax,
            });
        }
        if !(self.render.dot_size > 0.0) {
            return Err(ConfigError::DotSize(self.render.dot_size));
        }
        if self.selection.downsample_factor == 0 {
            return Err(ConfigError::DownsampleFactor);
        }
        if self.output.cell_count == Some(0) {
            return Err(ConfigError::CellCount);
        }
        if self.selection.season.trim().is_empty() {
            return Err(ConfigError::EmptySeason);
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        var,
        value: value.to_string(),
    })
}
