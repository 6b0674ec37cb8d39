//! Common types and utilities shared across the sea-ice comparison crates.

pub mod cell;
pub mod error;
pub mod hemisphere;
pub mod mesh;
pub mod physics;
pub mod time;

pub use cell::{is_fill, CellIndexBase, FILL_VALUE};
pub use error::{SeaIceError, SeaIceResult};
pub use hemisphere::{downsample, hemisphere_indices, Hemisphere, HemisphereSummary};
pub use mesh::{CellField, Mesh};
pub use time::{hours_since_epoch_to_datetime, SatelliteFileStamp};
