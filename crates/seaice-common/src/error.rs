//! Error types for sea-ice processing.

use thiserror::Error;

/// Result type alias using SeaIceError.
pub type SeaIceResult<T> = Result<T, SeaIceError>;

/// Primary error type for mesh and per-cell operations.
#[derive(Debug, Error)]
pub enum SeaIceError {
    // === Shape Errors ===
    #[error("Cell count mismatch: mesh has {expected} cells but data has {actual}")]
    CellCountMismatch { expected: usize, actual: usize },

    #[error("Cell index {index} is outside the mesh (0..{cell_count})")]
    CellIndexOutOfRange { index: i64, cell_count: usize },

    #[error("Mesh latitude and longitude arrays differ in length ({lat} vs {lon})")]
    MeshShape { lat: usize, lon: usize },

    // === Parameter Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    #[error("Unrecognised satellite file name: {0}")]
    InvalidFileName(String),
}

impl SeaIceError {
    /// Shorthand for an `InvalidParameter` error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        SeaIceError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}
