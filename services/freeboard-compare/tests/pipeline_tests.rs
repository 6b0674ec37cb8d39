//! End-to-end runs of the comparison pipeline on small synthetic files.

use std::path::{Path, PathBuf};

use freeboard_compare::pipeline::{
    file_dates, run_freeboard, run_summary, run_track_summary, select_track_files,
};
use freeboard_compare::{run_compare, PipelineConfig};
use seaice_common::{Hemisphere, FILL_VALUE};
use netcdf::types::NcVariableType;
use netcdf::NcTypeDescriptor;
use test_utils::{assert_approx_eq, create_model_fields, create_polar_mesh_radians};

const CELLS: usize = 20;
const XTIME_LEN: usize = 64;

/// One byte of a netCDF `char` variable.
#[repr(transparent)]
#[derive(Copy, Clone)]
struct NcChar(u8);

unsafe impl NcTypeDescriptor for NcChar {
    fn type_descriptor() -> NcVariableType {
        NcVariableType::Char
    }
}

fn write_mesh(path: &Path) {
    let (lat, lon) = create_polar_mesh_radians(4, 5);
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("nCells", CELLS).unwrap();
    file.add_variable::<f64>("latCell", &["nCells"])
        .unwrap()
        .put_values(&lat, ..)
        .unwrap();
    file.add_variable::<f64>("lonCell", &["nCells"])
        .unwrap()
        .put_values(&lon, ..)
        .unwrap();
}

fn write_model(path: &Path) {
    let (vi, a, vs) = create_model_fields(CELLS);
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("Time", 1).unwrap();
    file.add_dimension("nCells", CELLS).unwrap();
    for (name, values) in [
        ("timeDaily_avg_iceVolumeCell", &vi),
        ("timeDaily_avg_iceAreaCell", &a),
        ("timeDaily_avg_snowVolumeCell", &vs),
    ] {
        file.add_variable::<f64>(name, &["Time", "nCells"])
            .unwrap()
            .put_values(values, ..)
            .unwrap();
    }

    file.add_dimension("StrLen", XTIME_LEN).unwrap();
    let mut xtime = vec![NcChar(0); XTIME_LEN];
    for (slot, b) in xtime.iter_mut().zip(b"0001-01-01_00:00:00") {
        *slot = NcChar(*b);
    }
    file.add_variable::<NcChar>("xtime_startDaily", &["Time", "StrLen"])
        .unwrap()
        .put_values(&xtime, ..)
        .unwrap();
}

/// Synchronizer rows: (year, month, day, hour, cluster).
fn write_synchronizer(path: &Path, rows: &[(f64, f64, f64, f64, f64)]) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("files", rows.len()).unwrap();
    let columns: [(&str, Vec<f64>); 6] = [
        ("time", rows.iter().enumerate().map(|(i, _)| i as f64).collect()),
        ("year", rows.iter().map(|r| r.0).collect()),
        ("month", rows.iter().map(|r| r.1).collect()),
        ("day", rows.iter().map(|r| r.2).collect()),
        ("hour", rows.iter().map(|r| r.3).collect()),
        ("cluster", rows.iter().map(|r| r.4).collect()),
    ];
    for (name, values) in &columns {
        file.add_variable::<f64>(name, &["files"])
            .unwrap()
            .put_values(values, ..)
            .unwrap();
    }
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn write_track(path: &Path, freeboard: &[f64], cells: &[f64], modcells: &[f64]) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("one", 1).unwrap();
    file.add_dimension("photons", freeboard.len()).unwrap();
    file.add_dimension("passes", modcells.len()).unwrap();
    file.add_variable::<f64>("freeboard", &["one", "photons"])
        .unwrap()
        .put_values(freeboard, ..)
        .unwrap();
    file.add_variable::<f64>("cell", &["one", "photons"])
        .unwrap()
        .put_values(cells, ..)
        .unwrap();
    file.add_variable::<f64>("modcell", &["one", "passes"])
        .unwrap()
        .put_values(modcells, ..)
        .unwrap();
    let lat: Vec<f64> = (0..freeboard.len())
        .map(|i| if i % 2 == 0 { 75.0 } else { -75.0 })
        .collect();
    file.add_variable::<f64>("latitude", &["one", "photons"])
        .unwrap()
        .put_values(&lat, ..)
        .unwrap();
}

/// Mesh, model and three track files (two for spring 2008, one for fall).
fn setup(dir: &Path) -> PipelineConfig {
    netcdf_parser::silence_hdf5_errors();

    let sat_dir = dir.join("satellite");
    std::fs::create_dir(&sat_dir).unwrap();

    write_mesh(&dir.join("mesh.nc"));
    write_model(&dir.join("model.nc"));
    // 1-based indices: cells 2 and 7 are mesh cells 1 and 6
    write_track(
        &sat_dir.join("icesat_E3SM_spring_2008_02_22_14.nc"),
        &[0.2, 0.4, 0.9],
        &[2.0, 2.0, 7.0],
        &[2.0, 7.0],
    );
    write_track(
        &sat_dir.join("icesat_E3SM_spring_2008_02_22_16.nc"),
        &[0.6],
        &[2.0],
        &[3.0],
    );
    write_track(
        &sat_dir.join("icesat_E3SM_fall_2008_10_01_00.nc"),
        &[5.0],
        &[1.0],
        &[1.0],
    );

    let mut config = PipelineConfig::default();
    config.paths.mesh_file = dir.join("mesh.nc");
    config.paths.model_file = dir.join("model.nc");
    config.paths.satellite_dir = sat_dir;
    config.paths.output_file = dir.join("stats.nc");
    config.selection.lat_limit = 60.0;
    config.output.source = "pipeline test".to_string();
    config
}

fn read_var(path: &Path, name: &str) -> Vec<f64> {
    let file = netcdf::open(path).unwrap();
    file.variable(name).unwrap().get_values(..).unwrap()
}

#[test]
fn test_select_by_season_and_year() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup(dir.path());

    assert_eq!(select_track_files(&config).unwrap().len(), 2);

    config.selection.season = "fall".to_string();
    assert_eq!(select_track_files(&config).unwrap().len(), 1);

    config.selection.year = Some(2003);
    assert!(select_track_files(&config).unwrap().is_empty());
}

#[test]
fn test_select_through_synchronizer() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup(dir.path());
    let sync_path = dir.path().join("synchronizer.nc");
    write_synchronizer(
        &sync_path,
        &[
            (2008.0, 2.0, 22.0, 14.0, 1.0),
            (2008.0, 2.0, 22.0, 16.0, 2.0),
            // No track file on disk for these two
            (2008.0, 2.0, 22.0, 18.0, 1.0),
            (2003.0, 3.0, 1.0, 0.0, 1.0),
        ],
    );
    config.paths.synchronizer_file = Some(sync_path);
    config.selection.year = None;

    assert_eq!(
        file_names(&select_track_files(&config).unwrap()),
        vec![
            "icesat_E3SM_spring_2008_02_22_14.nc",
            "icesat_E3SM_spring_2008_02_22_16.nc"
        ]
    );

    config.selection.cluster = Some(1);
    assert_eq!(
        file_names(&select_track_files(&config).unwrap()),
        vec!["icesat_E3SM_spring_2008_02_22_14.nc"]
    );

    config.selection.cluster = Some(2);
    config.selection.year = Some(2008);
    assert_eq!(
        file_names(&select_track_files(&config).unwrap()),
        vec!["icesat_E3SM_spring_2008_02_22_16.nc"]
    );

    config.selection.cluster = None;
    config.selection.year = Some(2003);
    assert!(select_track_files(&config).unwrap().is_empty());

    // The fall track exists but the synchronizer names spring files only
    config.selection.season = "fall".to_string();
    config.selection.year = None;
    assert!(select_track_files(&config).unwrap().is_empty());
}

#[test]
fn test_compare_writes_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());

    let report = run_compare(&config).unwrap();
    assert_eq!(report.cell_count, CELLS);
    assert_eq!(report.track_files, 2);
    assert_eq!(report.observations, 4);
    assert_eq!(report.passes, 3);
    assert_eq!(report.occupied_cells, 2);
    // Synthetic tracks carry no time variable, so the file names date them
    assert_eq!(
        report.first_track.map(|t| t.to_rfc3339()),
        Some("2008-02-22T14:00:00+00:00".to_string())
    );
    assert_eq!(
        report.last_track.map(|t| t.to_rfc3339()),
        Some("2008-02-22T16:00:00+00:00".to_string())
    );

    let out = &config.paths.output_file;
    let sampleof = read_var(out, "sampleof");
    assert_eq!(sampleof.len(), CELLS);
    assert_eq!(sampleof[1], 3.0);
    assert_eq!(sampleof[6], 1.0);
    assert_eq!(sampleof.iter().sum::<f64>(), 4.0);

    let meanof = read_var(out, "meanof");
    assert_approx_eq!(meanof[1], 0.4, 1e-12);
    assert_approx_eq!(meanof[6], 0.9, 1e-12);
    assert_eq!(meanof[0], FILL_VALUE);

    let stdof = read_var(out, "stdof");
    assert_approx_eq!(stdof[1], (0.08_f64 / 3.0).sqrt(), 1e-12);
    assert_eq!(stdof[6], 0.0);

    let samplemf = read_var(out, "samplemf");
    assert_eq!(samplemf[1], 1.0);
    assert_eq!(samplemf[2], 1.0);
    assert_eq!(samplemf[6], 1.0);

    // Every occupied cell has 2 m ice and 0.3 m snow in the synthetic model
    let expected = 2.0 * 109.0 / 1026.0 + 0.3 * 696.0 / 1026.0;
    let meanmf = read_var(out, "meanmf");
    assert_approx_eq!(meanmf[1], expected, 1e-9);
    assert_approx_eq!(meanmf[2], expected, 1e-9);
    assert_eq!(meanmf[3], FILL_VALUE);

    assert!(read_var(out, "effof").iter().all(|&v| v == FILL_VALUE));
}

#[test]
fn test_compare_checks_configured_cell_count() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup(dir.path());
    config.selection.season = "fall".to_string();
    config.indexing.observation_base = seaice_common::CellIndexBase::Zero;
    config.output.cell_count = Some(CELLS);

    // Cell 1 is valid either way, so this run succeeds
    assert!(run_compare(&config).is_ok());

    config.output.cell_count = Some(CELLS + 1);
    assert!(run_compare(&config).is_err());
}

#[test]
fn test_freeboard_summary_per_hemisphere() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());

    let summaries = run_freeboard(&config).unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].hemisphere, Hemisphere::North);
    assert_eq!(summaries[1].hemisphere, Hemisphere::South);
    // Rows at -89 and 89 degrees, five cells each
    assert_eq!(summaries[0].cells, 5);
    assert_eq!(summaries[1].cells, 5);
    // Area cycles with period five, so one cell per row is ice free
    assert_eq!(summaries[0].valid, 4);
}

#[test]
fn test_day_past_end_of_model_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup(dir.path());
    config.selection.time_index = 1;

    let err = run_freeboard(&config).unwrap_err();
    assert!(format!("{:#}", err).contains("past the end"), "{:#}", err);

    let err = run_summary(&config).unwrap_err();
    assert!(format!("{:#}", err).contains("1 days"), "{:#}", err);

    assert!(run_compare(&config).is_err());
    assert!(!config.paths.output_file.exists());
}

#[test]
fn test_model_dates() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());

    let dates = file_dates(&config.paths.model_file, "xtime_startDaily").unwrap();
    assert_eq!(dates.len(), 1);
    assert_eq!(
        dates[0].format("%Y-%m-%d_%H:%M:%S").to_string(),
        "0001-01-01_00:00:00"
    );
    assert!(file_dates(&config.paths.model_file, "timeDaily_avg_iceAreaCell").is_err());
}

#[test]
fn test_track_summary_downsamples() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup(dir.path());
    let track = config
        .paths
        .satellite_dir
        .join("icesat_E3SM_spring_2008_02_22_14.nc");

    let full = run_track_summary(&config, &track).unwrap();
    assert_eq!(full[0].cells, 2);
    assert_eq!(full[1].cells, 1);

    config.selection.downsample_factor = 2;
    let thinned = run_track_summary(&config, &track).unwrap();
    assert_eq!(thinned[0].cells, 2);
    assert_eq!(thinned[1].cells, 0);
}
