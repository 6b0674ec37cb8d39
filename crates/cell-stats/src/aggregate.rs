//! Co-registration of satellite tracks with model cells.
//!
//! Every track contributes photon-level readings (value + cell) and a
//! coarser list of pass-level cells. Tracks are reduced independently and
//! their partial results merged, so the set of files can be processed in
//! any order or in parallel.

use rayon::prelude::*;
use seaice_common::{is_fill, CellIndexBase, FILL_VALUE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accumulator::{CellAccumulator, CellSummary};
use crate::error::{Result, StatsError};
use crate::histogram::CellHistogram;

/// Readings of one satellite track file, with raw (unshifted) cell indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSamples {
    /// Label used in log output, usually the file name.
    pub label: String,
    /// Photon-level freeboard readings.
    pub values: Vec<f64>,
    /// Cell of each reading, in the source's index base.
    pub cells: Vec<i64>,
    /// Cell of each pass-level sample, in the source's index base.
    pub pass_cells: Vec<i64>,
}

impl TrackSamples {
    pub fn observation_count(&self) -> usize {
        self.values.len()
    }
}

/// How raw indices are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationOptions {
    /// Number of cells (bins) in the target mesh.
    pub cell_count: usize,
    /// Index base of photon-level `cells`.
    pub observation_base: CellIndexBase,
    /// Index base of pass-level `pass_cells`.
    pub pass_base: CellIndexBase,
}

impl AggregationOptions {
    pub fn new(cell_count: usize) -> Self {
        Self {
            cell_count,
            observation_base: CellIndexBase::default(),
            pass_base: CellIndexBase::default(),
        }
    }

    pub fn with_bases(mut self, observation: CellIndexBase, pass: CellIndexBase) -> Self {
        self.observation_base = observation;
        self.pass_base = pass;
        self
    }
}

/// Partial or complete aggregation over a set of tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackAggregate {
    /// Photon readings per cell.
    pub observations: CellAccumulator,
    /// Pass-level sample counts per cell.
    pub passes: CellHistogram,
    /// Model freeboard sampled at pass-level cells.
    pub model: CellAccumulator,
    /// Number of tracks folded in.
    pub tracks: usize,
}

impl TrackAggregate {
    pub fn empty(cell_count: usize) -> Self {
        Self {
            observations: CellAccumulator::new(cell_count),
            passes: CellHistogram::new(cell_count),
            model: CellAccumulator::new(cell_count),
            tracks: 0,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.passes.cell_count()
    }

    /// Reduce one track.
    ///
    /// `model_freeboard`, when given, must have one value per cell; its value
    /// at each pass-level cell is accumulated unless it is a fill value.
    pub fn from_track(
        track: &TrackSamples,
        options: &AggregationOptions,
        model_freeboard: Option<&[f64]>,
    ) -> Result<Self> {
        let mut agg = Self::empty(options.cell_count);
        agg.add_track(track, options, model_freeboard)?;
        Ok(agg)
    }

    /// Fold one track into this aggregate.
    pub fn add_track(
        &mut self,
        track: &TrackSamples,
        options: &AggregationOptions,
        model_freeboard: Option<&[f64]>,
    ) -> Result<()> {
        if options.cell_count != self.cell_count() {
            return Err(StatsError::IncompatibleBins {
                left: self.cell_count(),
                right: options.cell_count,
            });
        }
        if track.values.len() != track.cells.len() {
            return Err(StatsError::length_mismatch(
                "freeboard/cell",
                track.values.len(),
                track.cells.len(),
            ));
        }
        if let Some(fb) = model_freeboard {
            if fb.len() != options.cell_count {
                return Err(StatsError::length_mismatch(
                    "model freeboard/mesh",
                    fb.len(),
                    options.cell_count,
                ));
            }
        }

        let cells = options
            .observation_base
            .resolve_all(&track.cells, options.cell_count)?;
        let pass_cells = options
            .pass_base
            .resolve_all(&track.pass_cells, options.cell_count)?;

        self.observations.extend(&cells, &track.values)?;

        for &c in &pass_cells {
            self.passes.add(c)?;
            if let Some(fb) = model_freeboard {
                let v = fb[c];
                if !is_fill(v) {
                    self.model.add(c, v)?;
                }
            }
        }

        self.tracks += 1;
        debug!(
            track = %track.label,
            observations = cells.len(),
            passes = pass_cells.len(),
            "Aggregated track"
        );
        Ok(())
    }

    /// Merge another partial aggregate into this one.
    pub fn merge(&mut self, other: &TrackAggregate) -> Result<()> {
        self.observations.merge(&other.observations)?;
        self.passes.merge(&other.passes)?;
        self.model.merge(&other.model)?;
        self.tracks += other.tracks;
        Ok(())
    }

    /// Final per-cell comparison statistics.
    pub fn finish(&self) -> ComparisonStats {
        ComparisonStats::from_parts(self.observations.finish(), &self.passes, self.model.finish())
    }
}

/// Aggregate many tracks in parallel.
pub fn aggregate_tracks(
    tracks: &[TrackSamples],
    options: &AggregationOptions,
    model_freeboard: Option<&[f64]>,
) -> Result<TrackAggregate> {
    tracks
        .par_iter()
        .map(|t| TrackAggregate::from_track(t, options, model_freeboard))
        .try_reduce(
            || TrackAggregate::empty(options.cell_count),
            |mut a, b| {
                a.merge(&b)?;
                Ok(a)
            },
        )
}

/// The eight per-cell variables of the comparison file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonStats {
    /// Model freeboard effective sample size.
    pub effmf: Vec<f64>,
    /// Observed freeboard effective sample size.
    pub effof: Vec<f64>,
    /// Model freeboard mean along the tracks.
    pub meanmf: Vec<f64>,
    /// Observed freeboard mean.
    pub meanof: Vec<f64>,
    /// Pass-level sample count.
    pub samplemf: Vec<f64>,
    /// Photon-level sample count.
    pub sampleof: Vec<f64>,
    /// Model freeboard standard deviation along the tracks.
    pub stdmf: Vec<f64>,
    /// Observed freeboard standard deviation.
    pub stdof: Vec<f64>,
}

impl ComparisonStats {
    fn from_parts(observed: CellSummary, passes: &CellHistogram, model: CellSummary) -> Self {
        let n = passes.cell_count();
        let sampleof = observed.count_f64();
        // No estimator for the effective sample size exists yet; the
        // variables are written as fill so the file layout stays complete.
        Self {
            effmf: vec![FILL_VALUE; n],
            effof: vec![FILL_VALUE; n],
            meanmf: model.mean,
            meanof: observed.mean,
            samplemf: passes.to_f64(),
            sampleof,
            stdmf: model.std,
            stdof: observed.std,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.samplemf.len()
    }

    /// Variables in output-file order, paired with their names.
    pub fn variables(&self) -> [(&'static str, &[f64]); 8] {
        [
            ("effmf", self.effmf.as_slice()),
            ("effof", self.effof.as_slice()),
            ("meanmf", self.meanmf.as_slice()),
            ("meanof", self.meanof.as_slice()),
            ("samplemf", self.samplemf.as_slice()),
            ("sampleof", self.sampleof.as_slice()),
            ("stdmf", self.stdmf.as_slice()),
            ("stdof", self.stdof.as_slice()),
        ]
    }
}
