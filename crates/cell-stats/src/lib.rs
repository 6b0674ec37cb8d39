//! Per-cell statistics for comparing satellite freeboard with model output.
//!
//! # Overview
//!
//! - [`histogram`]: sample counts per cell (fixed bin count = mesh cells)
//! - [`accumulator`]: streaming mean / population standard deviation per cell
//! - [`aggregate`]: co-registration of track files onto the mesh, merged in parallel
//! - [`freeboard`]: model freeboard from ice/snow volume and ice area
//!
//! Cells without observations carry [`seaice_common::FILL_VALUE`] in every
//! mean and standard deviation output.

pub mod accumulator;
pub mod aggregate;
pub mod error;
pub mod freeboard;
pub mod histogram;

pub use accumulator::{CellAccumulator, CellSummary};
pub use aggregate::{
    aggregate_tracks, AggregationOptions, ComparisonStats, TrackAggregate, TrackSamples,
};
pub use error::{Result, StatsError};
pub use freeboard::{cell_freeboard, model_freeboard};
pub use histogram::CellHistogram;
