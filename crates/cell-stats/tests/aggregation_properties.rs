//! Property checks for track aggregation and model freeboard.

use cell_stats::{
    aggregate_tracks, model_freeboard, AggregationOptions, CellAccumulator, TrackAggregate,
    TrackSamples,
};
use seaice_common::{CellIndexBase, FILL_VALUE};
use test_utils::fixtures::hand_checked;
use test_utils::{assert_approx_eq, create_model_fields, create_track};

fn zero_based(cell_count: usize) -> AggregationOptions {
    AggregationOptions::new(cell_count).with_bases(CellIndexBase::Zero, CellIndexBase::Zero)
}

fn synthetic_tracks(count: usize, len: usize, cell_count: usize) -> Vec<TrackSamples> {
    (0..count)
        .map(|i| {
            let t = create_track(len, cell_count, i as u32 + 1);
            TrackSamples {
                label: format!("track_{}", i),
                pass_cells: t.cells.iter().step_by(10).copied().collect(),
                values: t.values,
                cells: t.cells,
            }
        })
        .collect()
}

// ============================================================================
// Hand-checked values
// ============================================================================

#[test]
fn test_hand_checked_statistics() {
    let track = TrackSamples {
        label: "hand".to_string(),
        values: hand_checked::VALUES.to_vec(),
        cells: hand_checked::CELLS.to_vec(),
        pass_cells: vec![],
    };
    let agg = TrackAggregate::from_track(&track, &zero_based(hand_checked::CELL_COUNT), None)
        .unwrap();
    let summary = agg.observations.finish();

    assert_eq!(summary.count, hand_checked::COUNTS.to_vec());
    for i in 0..hand_checked::CELL_COUNT {
        assert_approx_eq!(summary.mean[i], hand_checked::MEANS[i], 1e-12);
        assert_approx_eq!(summary.std[i], hand_checked::STDS[i], 1e-12);
    }
}

#[test]
fn test_hand_checked_one_based_source() {
    let track = TrackSamples {
        label: "hand".to_string(),
        values: hand_checked::VALUES.to_vec(),
        cells: hand_checked::CELLS.iter().map(|c| c + 1).collect(),
        pass_cells: vec![],
    };
    let opts = AggregationOptions::new(hand_checked::CELL_COUNT);
    let stats = TrackAggregate::from_track(&track, &opts, None).unwrap().finish();
    assert_eq!(stats.sampleof, vec![2.0, 0.0, 3.0, 1.0]);
    assert_eq!(stats.meanof[1], FILL_VALUE);
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn test_empty_cells_are_fill_not_nan() {
    let tracks = synthetic_tracks(3, 20, 500);
    let stats = aggregate_tracks(&tracks, &zero_based(500), None)
        .unwrap()
        .finish();

    for i in 0..500 {
        if stats.sampleof[i] == 0.0 {
            assert_eq!(stats.meanof[i], FILL_VALUE);
            assert_eq!(stats.stdof[i], FILL_VALUE);
        } else {
            assert!(stats.meanof[i].is_finite());
        }
        assert!(!stats.meanof[i].is_nan());
        assert!(!stats.stdof[i].is_nan());
    }
}

#[test]
fn test_counts_are_conserved() {
    let tracks = synthetic_tracks(8, 300, 97);
    let fed: usize = tracks.iter().map(|t| t.observation_count()).sum();
    let passes: usize = tracks.iter().map(|t| t.pass_cells.len()).sum();

    let agg = aggregate_tracks(&tracks, &zero_based(97), None).unwrap();
    assert_eq!(agg.observations.total() as usize, fed);
    assert_eq!(agg.passes.total() as usize, passes);
    assert_eq!(agg.tracks, 8);

    let stats = agg.finish();
    assert_eq!(stats.sampleof.iter().sum::<f64>() as usize, fed);
}

#[test]
fn test_std_is_non_negative() {
    let tracks = synthetic_tracks(5, 200, 31);
    let stats = aggregate_tracks(&tracks, &zero_based(31), None)
        .unwrap()
        .finish();
    for (i, &s) in stats.stdof.iter().enumerate() {
        if stats.sampleof[i] > 0.0 {
            assert!(s >= 0.0, "cell {} has negative std {}", i, s);
        }
    }
}

#[test]
fn test_equal_observations_have_zero_std() {
    let track = TrackSamples {
        label: "flat".to_string(),
        values: vec![0.42; 12],
        cells: vec![0, 1, 2, 0, 1, 2, 0, 1, 2, 0, 1, 2],
        pass_cells: vec![],
    };
    let stats = TrackAggregate::from_track(&track, &zero_based(3), None)
        .unwrap()
        .finish();
    assert_eq!(stats.stdof, vec![0.0, 0.0, 0.0]);
    assert_eq!(stats.meanof, vec![0.42, 0.42, 0.42]);
}

#[test]
fn test_aggregation_is_order_independent() {
    let tracks = synthetic_tracks(6, 150, 40);
    let mut reversed = tracks.clone();
    reversed.reverse();
    let mut rotated = tracks.clone();
    rotated.rotate_left(2);

    let opts = zero_based(40);
    let a = aggregate_tracks(&tracks, &opts, None).unwrap().finish();
    let b = aggregate_tracks(&reversed, &opts, None).unwrap().finish();
    let c = aggregate_tracks(&rotated, &opts, None).unwrap().finish();

    assert_eq!(a.sampleof, b.sampleof);
    assert_eq!(a.sampleof, c.sampleof);
    for i in 0..40 {
        assert_approx_eq!(a.meanof[i], b.meanof[i], 1e-12);
        assert_approx_eq!(a.stdof[i], b.stdof[i], 1e-12);
        assert_approx_eq!(a.meanof[i], c.meanof[i], 1e-12);
        assert_approx_eq!(a.stdof[i], c.stdof[i], 1e-12);
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let tracks = synthetic_tracks(10, 100, 25);
    let opts = zero_based(25);

    let mut sequential = TrackAggregate::empty(25);
    for t in &tracks {
        sequential.add_track(t, &opts, None).unwrap();
    }
    let parallel = aggregate_tracks(&tracks, &opts, None).unwrap();

    let (s, p) = (sequential.finish(), parallel.finish());
    assert_eq!(s.sampleof, p.sampleof);
    for i in 0..25 {
        assert_approx_eq!(s.meanof[i], p.meanof[i], 1e-12);
        assert_approx_eq!(s.stdof[i], p.stdof[i], 1e-12);
    }
}

#[test]
fn test_merge_of_empty_is_identity() {
    let mut acc = CellAccumulator::new(4);
    acc.extend(&[0, 3], &[1.0, 2.0]).unwrap();
    let before = acc.finish();
    acc.merge(&CellAccumulator::new(4)).unwrap();
    assert_eq!(acc.finish(), before);
}

// ============================================================================
// Model freeboard along tracks
// ============================================================================

#[test]
fn test_model_freeboard_reference_value() {
    let fb = model_freeboard(&[100.0], &[50.0], &[0.0]).unwrap();
    assert_approx_eq!(fb[0], 0.2125, 1e-3);
}

#[test]
fn test_model_freeboard_along_tracks() {
    let (vi, a, vs) = create_model_fields(10);
    let fb = model_freeboard(&vi, &a, &vs).unwrap();
    assert_eq!(fb[0], FILL_VALUE);
    assert_eq!(fb[5], FILL_VALUE);
    // 2 m ice, 0.3 m snow wherever ice exists
    let expected = 2.0 * 109.0 / 1026.0 + 0.3 * 696.0 / 1026.0;
    assert_approx_eq!(fb[1], expected, 1e-12);

    let track = TrackSamples {
        label: "passes".to_string(),
        values: vec![],
        cells: vec![],
        pass_cells: vec![0, 1, 2, 5],
    };
    let stats = TrackAggregate::from_track(&track, &zero_based(10), Some(&fb))
        .unwrap()
        .finish();

    assert_eq!(stats.samplemf[0], 1.0);
    assert_eq!(stats.meanmf[0], FILL_VALUE);
    assert_approx_eq!(stats.meanmf[1], expected, 1e-12);
    assert_eq!(stats.stdmf[2], 0.0);
    assert_eq!(stats.meanmf[5], FILL_VALUE);
}
