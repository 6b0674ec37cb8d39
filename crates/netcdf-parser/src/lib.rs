//! NetCDF access for MPAS-Seaice output and ICESat track files.
//!
//! Reading goes through the native netcdf library (libnetcdf/HDF5):
//!
//! - [`mesh`]: cell-centre coordinates (`latCell`/`lonCell`, radians)
//! - [`model`]: daily time-series variables and their start times
//! - [`track`]: preprocessed satellite tracks mapped onto the mesh
//! - [`synchronizer`]: the orbital synchronizer that indexes track files
//! - [`gather`]: locating track files on disk
//!
//! [`writer`] produces the NETCDF4_CLASSIC per-cell statistics file.
//!
//! Call [`silence_hdf5_errors`] once at startup to keep HDF5 diagnostics
//! off stderr.

pub mod error;
pub mod gather;
pub mod mesh;
pub mod model;
pub mod native;
pub mod synchronizer;
pub mod track;
pub mod writer;

pub use error::{NetCdfError, NetCdfResult};
pub use gather::{gather_files, resolve_existing};
pub use mesh::load_mesh;
pub use model::{ModelOutput, START_TIME_VARIABLE};
pub use native::{silence_hdf5_errors, VariableInfo};
pub use synchronizer::{SyncEntry, Synchronizer};
pub use track::{load_track, SatelliteTrack, TrackVariables};
pub use writer::{write_stats_file, FileAttributes, StatsVariable, STATS_VARIABLES};
