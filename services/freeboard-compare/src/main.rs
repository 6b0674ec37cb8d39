//! Sea-ice freeboard comparison tool.
//!
//! Bins preprocessed ICESat tracks onto the E3SM mesh, compares them with
//! model-derived freeboard and writes the per-cell statistics file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use freeboard_compare::{pipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "freeboard-compare")]
#[command(about = "Compare ICESat freeboard with E3SM sea-ice output")]
struct Args {
    /// Configuration file path (defaults plus SEAICE_* variables when absent)
    #[arg(short, long, env = "SEAICE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate the selected tracks and write the statistics file
    Compare {
        /// Override the output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Model freeboard for one day, summarised per hemisphere
    Freeboard {
        /// Day of the model file
        #[arg(long)]
        day: Option<usize>,
    },

    /// Hemisphere summary of a model variable, or of one track file
    Summary {
        /// Model variable (defaults to selection.variable)
        #[arg(long)]
        variable: Option<String>,

        /// Day of the model file
        #[arg(long)]
        day: Option<usize>,

        /// Summarise this track file instead of the model
        #[arg(long)]
        track: Option<PathBuf>,
    },

    /// List the variables of a netCDF file with their shapes
    Info { file: PathBuf },

    /// List the start times of a model file
    Dates {
        file: PathBuf,

        /// Start-time variable (defaults to variables.start_time)
        #[arg(long)]
        variable: Option<String>,
    },

    /// List the track files selected for the configured season
    Select,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    netcdf_parser::silence_hdf5_errors();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_yaml(path)?,
        None => PipelineConfig::from_env()?,
    };
    info!(
        mesh = ?config.paths.mesh_file,
        lat_limit = config.selection.lat_limit,
        "Loaded configuration"
    );

    match args.command {
        Command::Compare { output } => {
            if let Some(output) = output {
                config.paths.output_file = output;
            }
            let report = pipeline::run_compare(&config)?;
            print_json(&report)?;
        }
        Command::Freeboard { day } => {
            if let Some(day) = day {
                config.selection.time_index = day;
            }
            print_json(&pipeline::run_freeboard(&config)?)?;
        }
        Command::Summary {
            variable,
            day,
            track,
        } => {
            if let Some(variable) = variable {
                config.selection.variable = variable;
            }
            if let Some(day) = day {
                config.selection.time_index = day;
            }
            let summaries = match track {
                Some(path) => pipeline::run_track_summary(&config, &path)?,
                None => pipeline::run_summary(&config)?,
            };
            print_json(&summaries)?;
        }
        Command::Info { file } => {
            for var in pipeline::file_info(&file)? {
                println!("{}", var);
            }
        }
        Command::Dates { file, variable } => {
            let variable = variable.unwrap_or_else(|| config.variables.start_time.clone());
            for time in pipeline::file_dates(&file, &variable)? {
                println!("{}", time.format("%Y-%m-%d_%H:%M:%S"));
            }
        }
        Command::Select => {
            for path in pipeline::select_track_files(&config)? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
