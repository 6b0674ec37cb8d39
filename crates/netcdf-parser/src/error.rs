//! Error types for netCDF reading and writing.

use seaice_common::SeaIceError;
use thiserror::Error;

/// Result type for netCDF operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for netCDF access.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reported by libnetcdf
    #[error("NetCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),

    /// Missing required variable
    #[error("Missing variable '{name}' in {file}")]
    MissingVariable { name: String, file: String },

    /// Missing required data
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Directory traversal failed
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Domain-level validation failure
    #[error(transparent)]
    Domain(#[from] SeaIceError),
}

impl NetCdfError {
    pub(crate) fn missing_variable(name: &str, file: &std::path::Path) -> Self {
        NetCdfError::MissingVariable {
            name: name.to_string(),
            file: file.display().to_string(),
        }
    }
}
