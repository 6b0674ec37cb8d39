//! The comparison pipeline.
//!
//! ```text
//! load mesh -> load model / track files -> hemisphere filter -> aggregate -> write / report
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cell_stats::{model_freeboard, AggregationOptions, TrackAggregate, TrackSamples};
use chrono::{DateTime, NaiveDateTime, Utc};
use netcdf_parser::{
    gather_files, load_mesh, load_track, resolve_existing, write_stats_file, FileAttributes,
    ModelOutput, SatelliteTrack, Synchronizer, VariableInfo,
};
use rayon::prelude::*;
use seaice_common::{
    downsample, CellField, Hemisphere, HemisphereSummary, Mesh, SatelliteFileStamp,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;

/// Outcome of a `compare` run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareReport {
    pub output_file: PathBuf,
    pub cell_count: usize,
    pub track_files: usize,
    pub observations: u64,
    pub passes: u64,
    pub dropped_observations: usize,
    pub occupied_cells: usize,
    /// Start of the earliest and latest track, from the `time` variable or
    /// else the file name
    pub first_track: Option<DateTime<Utc>>,
    pub last_track: Option<DateTime<Utc>>,
}

/// Load the mesh named in the configuration.
pub fn load_configured_mesh(config: &PipelineConfig) -> Result<Mesh> {
    load_mesh(&config.paths.mesh_file)
        .with_context(|| format!("Failed to load mesh {:?}", config.paths.mesh_file))
}

/// Model freeboard for the configured day, checked against the mesh.
pub fn compute_model_freeboard(config: &PipelineConfig, mesh: &Mesh) -> Result<CellField> {
    let model = ModelOutput::open(&config.paths.model_file)
        .with_context(|| format!("Failed to open model output {:?}", config.paths.model_file))?;
    let day = config.selection.time_index;
    let vars = &config.variables;

    let read = |name: &str| -> Result<CellField> {
        let field = read_model_day(&model, name, day)?;
        mesh.validate_field_len(field.len())
            .with_context(|| format!("{} does not match the mesh", name))?;
        Ok(field)
    };

    let ice_volume = read(&vars.ice_volume)?;
    let ice_area = read(&vars.ice_area)?;
    let snow_volume = read(&vars.snow_volume)?;

    let values = model_freeboard(&ice_volume.values, &ice_area.values, &snow_volume.values)?;
    Ok(CellField::new("freeboard", values))
}

/// One day of a model variable, rejecting days past the end of the file.
fn read_model_day(model: &ModelOutput, variable: &str, day: usize) -> Result<CellField> {
    let days = model
        .time_count(variable)
        .with_context(|| format!("Failed to read {}", variable))?;
    if day >= days {
        bail!(
            "time_index {} is past the end of {} ({} days in the model file)",
            day,
            variable,
            days
        );
    }
    model
        .read_time_slice(variable, day)
        .with_context(|| format!("Failed to read {} for day {}", variable, day))
}

/// Track files for the configured season, cluster and year.
///
/// With a synchronizer the file names are derived from its entries;
/// otherwise the satellite directory is searched and file names are
/// matched on season and year.
pub fn select_track_files(config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    let sel = &config.selection;
    let dir = &config.paths.satellite_dir;

    let files = match &config.paths.synchronizer_file {
        Some(sync_path) => {
            let sync = Synchronizer::load(sync_path)
                .with_context(|| format!("Failed to load synchronizer {:?}", sync_path))?;
            let names = sync.file_names(&sel.season, sel.cluster, sel.year);
            resolve_existing(dir, &names)
        }
        None => {
            let all = gather_files(dir)
                .with_context(|| format!("Failed to list satellite directory {:?}", dir))?;
            all.into_iter()
                .filter(|p| matches_selection(p, &sel.season, sel.year))
                .collect()
        }
    };

    info!(count = files.len(), season = %sel.season, "Selected track files");
    Ok(files)
}

fn matches_selection(path: &Path, season: &str, year: Option<i32>) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match SatelliteFileStamp::parse(&name) {
        Ok(stamp) => stamp.season == season && year.map_or(true, |y| stamp.year == y),
        Err(_) => {
            debug!(file = %name, "Skipping file with unrecognised name");
            false
        }
    }
}

/// Readings of a loaded track in the form the aggregator consumes.
pub fn track_samples(track: SatelliteTrack) -> TrackSamples {
    TrackSamples {
        label: track.file_name(),
        values: track.freeboard,
        cells: track.cells,
        pass_cells: track.pass_cells,
    }
}

/// Aggregation options from the configured index bases.
pub fn aggregation_options(config: &PipelineConfig, cell_count: usize) -> AggregationOptions {
    AggregationOptions::new(cell_count)
        .with_bases(config.indexing.observation_base, config.indexing.pass_base)
}

/// Bookkeeping for the report, reduced alongside the aggregate.
#[derive(Debug, Clone, Default, PartialEq)]
struct TrackTally {
    files: usize,
    observations: u64,
    passes: u64,
    dropped: usize,
    first: Option<DateTime<Utc>>,
    last: Option<DateTime<Utc>>,
}

impl TrackTally {
    fn of(track: &SatelliteTrack) -> Self {
        let start = track_start(track);
        Self {
            files: 1,
            observations: track.observation_count() as u64,
            passes: track.pass_cells.len() as u64,
            dropped: track.dropped,
            first: start,
            last: start,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            files: self.files + other.files,
            observations: self.observations + other.observations,
            passes: self.passes + other.passes,
            dropped: self.dropped + other.dropped,
            first: self.first.into_iter().chain(other.first).min(),
            last: self.last.into_iter().chain(other.last).max(),
        }
    }
}

/// Start of a track from its `time` variable, or else its file name.
fn track_start(track: &SatelliteTrack) -> Option<DateTime<Utc>> {
    track
        .start_time
        .or_else(|| track.stamp.as_ref().and_then(SatelliteFileStamp::datetime))
}

/// Load and reduce track files in parallel.
///
/// Each file is folded into a partial aggregate as soon as it is read, so
/// only one track per worker is held in memory.
fn aggregate_track_files(
    config: &PipelineConfig,
    options: &AggregationOptions,
    paths: &[PathBuf],
    model: Option<&[f64]>,
) -> Result<(TrackAggregate, TrackTally)> {
    let vars = config.variables.track_variables();
    let (aggregate, tally) = paths
        .par_iter()
        .map(|p| -> Result<(TrackAggregate, TrackTally)> {
            let track = load_track(p, &vars).with_context(|| format!("Failed to load track {:?}", p))?;
            let tally = TrackTally::of(&track);
            let aggregate = TrackAggregate::from_track(&track_samples(track), options, model)
                .with_context(|| format!("Failed to aggregate track {:?}", p))?;
            Ok((aggregate, tally))
        })
        .try_reduce(
            || (TrackAggregate::empty(options.cell_count), TrackTally::default()),
            |(mut aggregate, tally), (other, other_tally)| {
                aggregate.merge(&other)?;
                Ok((aggregate, tally.merge(other_tally)))
            },
        )?;
    info!(
        tracks = aggregate.tracks,
        observations = aggregate.observations.total(),
        passes = aggregate.passes.total(),
        dropped = tally.dropped,
        "Aggregated tracks"
    );
    Ok((aggregate, tally))
}

/// Run the full comparison and write the statistics file.
pub fn run_compare(config: &PipelineConfig) -> Result<CompareReport> {
    let mesh = load_configured_mesh(config)?;
    let cell_count = mesh.cell_count();
    if let Some(expected) = config.output.cell_count {
        mesh.validate_field_len(expected)
            .context("output.cell_count does not match the mesh")?;
    }

    let freeboard = compute_model_freeboard(config, &mesh)?;

    let paths = select_track_files(config)?;
    if paths.is_empty() {
        warn!(dir = ?config.paths.satellite_dir, "No track files selected");
    }
    let options = aggregation_options(config, cell_count);
    let (aggregate, tally) =
        aggregate_track_files(config, &options, &paths, Some(freeboard.values.as_slice()))?;
    let stats = aggregate.finish();
    let occupied_cells = stats.sampleof.iter().filter(|&&c| c > 0.0).count();

    let attributes = file_attributes(config);
    write_stats_file(
        &config.paths.output_file,
        &attributes,
        cell_count,
        &stats.variables(),
    )
    .with_context(|| format!("Failed to write {:?}", config.paths.output_file))?;

    Ok(CompareReport {
        output_file: config.paths.output_file.clone(),
        cell_count,
        track_files: tally.files,
        observations: tally.observations,
        passes: tally.passes,
        dropped_observations: tally.dropped,
        occupied_cells,
        first_track: tally.first,
        last_track: tally.last,
    })
}

fn file_attributes(config: &PipelineConfig) -> FileAttributes {
    let source = if config.output.source.is_empty() {
        config.paths.satellite_dir.display().to_string()
    } else {
        config.output.source.clone()
    };
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    FileAttributes::new(&config.output.title, source, &config.output.institution, &user)
}

/// Hemisphere summaries of a per-cell field.
pub fn summarize_field(
    config: &PipelineConfig,
    mesh: &Mesh,
    field: &CellField,
) -> Result<Vec<HemisphereSummary>> {
    Hemisphere::BOTH
        .iter()
        .map(|&h| -> Result<HemisphereSummary> {
            let summary = mesh.summarize(
                field,
                h,
                config.selection.lat_limit,
                config.render.color_range(),
            )?;
            info!(
                variable = %field.name,
                hemisphere = %h,
                cells = summary.cells,
                valid = summary.valid,
                "Hemisphere summary"
            );
            Ok(summary)
        })
        .collect()
}

/// Model freeboard for the configured day, summarised per hemisphere.
pub fn run_freeboard(config: &PipelineConfig) -> Result<Vec<HemisphereSummary>> {
    let mesh = load_configured_mesh(config)?;
    let freeboard = compute_model_freeboard(config, &mesh)?;
    summarize_field(config, &mesh, &freeboard)
}

/// Any model variable for the configured day, summarised per hemisphere.
pub fn run_summary(config: &PipelineConfig) -> Result<Vec<HemisphereSummary>> {
    let mesh = load_configured_mesh(config)?;
    let model = ModelOutput::open(&config.paths.model_file)
        .with_context(|| format!("Failed to open model output {:?}", config.paths.model_file))?;
    let field = read_model_day(&model, &config.selection.variable, config.selection.time_index)?;
    summarize_field(config, &mesh, &field)
}

/// Freeboard readings of one track, thinned by the downsample factor and
/// summarised per hemisphere using the readings' own latitudes.
pub fn run_track_summary(config: &PipelineConfig, path: &Path) -> Result<Vec<HemisphereSummary>> {
    let track = load_track(path, &config.variables.track_variables())
        .with_context(|| format!("Failed to load track {:?}", path))?;
    let lat = track
        .latitude
        .as_deref()
        .with_context(|| format!("{:?} has no usable latitude variable", path))?;

    let factor = config.selection.downsample_factor;
    let lat = downsample(lat, factor)?;
    let values = downsample(&track.freeboard, factor)?;

    Hemisphere::BOTH
        .iter()
        .map(|&h| -> Result<HemisphereSummary> {
            Ok(HemisphereSummary::compute(
                &lat,
                &values,
                h,
                config.selection.lat_limit,
                config.render.color_range(),
            )?)
        })
        .collect()
}

/// Variables of any netCDF file.
pub fn file_info(path: &Path) -> Result<Vec<VariableInfo>> {
    let model = ModelOutput::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    Ok(model.variables())
}

/// Start times of a model file.
pub fn file_dates(path: &Path, variable: &str) -> Result<Vec<NaiveDateTime>> {
    let model = ModelOutput::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let times = model
        .start_datetimes(variable)
        .with_context(|| format!("Failed to read {} from {:?}", variable, path))?;
    debug!(count = times.len(), "Read start times");
    Ok(times)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_selection() {
        let p = Path::new("/data/one_day/icesat_E3SM_spring_2008_02_22_14.nc");
        assert!(matches_selection(p, "spring", None));
        assert!(matches_selection(p, "spring", Some(2008)));
        assert!(!matches_selection(p, "spring", Some(2003)));
        assert!(!matches_selection(p, "fall", None));
        assert!(!matches_selection(Path::new("/data/synchronizer.nc"), "spring", None));
    }

    fn track(name: &str, start_time: Option<DateTime<Utc>>) -> SatelliteTrack {
        let path = PathBuf::from("/data").join(name);
        SatelliteTrack {
            stamp: SatelliteFileStamp::parse(name).ok(),
            path,
            freeboard: vec![0.1, 0.2],
            cells: vec![4, 5],
            pass_cells: vec![4],
            latitude: None,
            start_time,
            dropped: 1,
        }
    }

    #[test]
    fn test_track_into_samples() {
        let samples = track_samples(track("icesat_E3SM_spring_2008_02_22_14.nc", None));
        assert_eq!(samples.label, "icesat_E3SM_spring_2008_02_22_14.nc");
        assert_eq!(samples.cells, vec![4, 5]);
        assert_eq!(samples.pass_cells, vec![4]);
    }

    #[test]
    fn test_track_start_falls_back_to_file_name() {
        let named = track("icesat_E3SM_spring_2008_02_22_14.nc", None);
        assert_eq!(
            track_start(&named).map(|t| t.to_rfc3339()),
            Some("2008-02-22T14:00:00+00:00".to_string())
        );

        let timed = hours_track("icesat_E3SM_spring_2008_02_22_14.nc", 24.0);
        assert_eq!(track_start(&timed), timed.start_time);

        assert!(track_start(&track("other.nc", None)).is_none());
    }

    fn hours_track(name: &str, hours: f64) -> SatelliteTrack {
        track(name, seaice_common::hours_since_epoch_to_datetime(hours))
    }

    #[test]
    fn test_tally_merge_keeps_extremes() {
        let early = TrackTally::of(&hours_track("a.nc", 10.0));
        let late = TrackTally::of(&hours_track("b.nc", 20.0));
        let untimed = TrackTally::of(&track("c.nc", None));

        let merged = untimed.merge(late.clone()).merge(early.clone());
        assert_eq!(merged.files, 3);
        assert_eq!(merged.observations, 6);
        assert_eq!(merged.passes, 3);
        assert_eq!(merged.dropped, 3);
        assert_eq!(merged.first, early.first);
        assert_eq!(merged.last, late.last);

        assert_eq!(TrackTally::default().merge(early.clone()), early);
    }

    #[test]
    fn test_aggregation_uses_configured_bases() {
        let mut config = PipelineConfig::default();
        config.indexing.observation_base = seaice_common::CellIndexBase::Zero;
        let samples = TrackSamples {
            label: "t".to_string(),
            values: vec![0.4, 0.6],
            cells: vec![0, 0],
            pass_cells: vec![2],
        };
        let options = aggregation_options(&config, 2);
        let stats = TrackAggregate::from_track(&samples, &options, None)
            .unwrap()
            .finish();
        assert_eq!(stats.sampleof, vec![2.0, 0.0]);
        assert_eq!(stats.samplemf, vec![0.0, 1.0]);
        assert!((stats.meanof[0] - 0.5).abs() < 1e-12);
    }
}
