//! Thin helpers over the native netcdf library.
//!
//! The netcdf crate wraps libnetcdf/HDF5. Everything here reads whole
//! variables or single leading-dimension rows into `Vec<f64>`.

use std::path::Path;
use std::sync::Once;

use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Call this early in `main()`, before any netCDF file is opened. Later calls
/// are no-ops.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Name and shape of one variable, as listed by `info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    pub name: String,
    /// `(dimension name, length)` in storage order.
    pub dimensions: Vec<(String, usize)>,
}

impl VariableInfo {
    pub fn shape(&self) -> Vec<usize> {
        self.dimensions.iter().map(|(_, len)| *len).collect()
    }
}

impl std::fmt::Display for VariableInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dims: Vec<String> = self
            .dimensions
            .iter()
            .map(|(name, len)| format!("{}={}", name, len))
            .collect();
        write!(f, "{} ({})", self.name, dims.join(", "))
    }
}

/// Open a file for reading.
pub fn open(path: &Path) -> NetCdfResult<netcdf::File> {
    if !path.exists() {
        return Err(NetCdfError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }
    netcdf::open(path).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to open {}: {}", path.display(), e))
    })
}

/// Every variable in the file with its dimensions.
pub fn list_variables(file: &netcdf::File) -> Vec<VariableInfo> {
    file.variables()
        .map(|var| VariableInfo {
            name: var.name(),
            dimensions: var
                .dimensions()
                .iter()
                .map(|d| (d.name(), d.len()))
                .collect(),
        })
        .collect()
}

/// Look up a variable, failing with the file name when it is absent.
pub fn require_variable<'f>(
    file: &'f netcdf::File,
    name: &str,
    path: &Path,
) -> NetCdfResult<netcdf::Variable<'f>> {
    file.variable(name)
        .ok_or_else(|| NetCdfError::missing_variable(name, path))
}

/// Read a whole variable, flattened in storage order.
pub fn read_all(var: &netcdf::Variable) -> NetCdfResult<Vec<f64>> {
    Ok(var.get_values::<f64, _>(..)?)
}

/// Read row `row` of a variable whose leading dimension is time or a
/// singleton. One-dimensional variables are returned whole for row 0.
pub fn read_row(var: &netcdf::Variable, row: usize) -> NetCdfResult<Vec<f64>> {
    let dims = var.dimensions();
    match dims.len() {
        0 => Err(NetCdfError::InvalidFormat(format!(
            "{} is a scalar, expected an array",
            var.name()
        ))),
        1 if row == 0 => read_all(var),
        1 => Err(NetCdfError::InvalidFormat(format!(
            "{} has no leading dimension to select row {}",
            var.name(),
            row
        ))),
        2 => {
            let rows = dims[0].len();
            if row >= rows {
                return Err(NetCdfError::InvalidFormat(format!(
                    "row {} out of range for {} ({} rows)",
                    row,
                    var.name(),
                    rows
                )));
            }
            Ok(var.get_values::<f64, _>((row, ..))?)
        }
        n => Err(NetCdfError::InvalidFormat(format!(
            "{} has {} dimensions, expected 1 or 2",
            var.name(),
            n
        ))),
    }
}

/// Read a 2-D character variable as one string per row, with trailing NULs
/// and blanks removed.
pub fn read_char_rows(var: &netcdf::Variable) -> NetCdfResult<Vec<String>> {
    let dims = var.dimensions();
    if dims.len() != 2 || !matches!(var.vartype(), netcdf::types::NcVariableType::Char) {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} is not a (rows, chars) character array",
            var.name()
        )));
    }
    let width = dims[1].len();
    let raw = var.get_raw_values(..)?;
    if width == 0 {
        return Ok(vec![String::new(); dims[0].len()]);
    }
    Ok(raw
        .chunks(width)
        .map(|chunk| {
            String::from_utf8_lossy(chunk)
                .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
                .to_string()
        })
        .collect())
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
pub fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get f64 attribute.
pub fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

/// Convert a floating-point index column to integers, rejecting values that
/// are not whole numbers.
pub fn to_indices(values: &[f64], what: &str) -> NetCdfResult<Vec<i64>> {
    values
        .iter()
        .map(|&v| {
            if v.is_finite() && v.fract() == 0.0 {
                Ok(v as i64)
            } else {
                Err(NetCdfError::InvalidFormat(format!(
                    "{} contains non-integer index {}",
                    what, v
                )))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_indices() {
        assert_eq!(to_indices(&[0.0, 3.0, 12.0], "cell").unwrap(), vec![0, 3, 12]);
        assert!(to_indices(&[1.5], "cell").is_err());
        assert!(to_indices(&[f64::NAN], "cell").is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let err = open(Path::new("/nonexistent/mesh.nc")).unwrap_err();
        assert!(matches!(err, NetCdfError::IoError(_)));
    }

    #[test]
    fn test_variable_info_display() {
        let info = VariableInfo {
            name: "timeDaily_avg_iceAreaCell".to_string(),
            dimensions: vec![("Time".to_string(), 28), ("nCells".to_string(), 236853)],
        };
        assert_eq!(
            info.to_string(),
            "timeDaily_avg_iceAreaCell (Time=28, nCells=236853)"
        );
        assert_eq!(info.shape(), vec![28, 236853]);
    }

    #[test]
    fn test_silence_is_idempotent() {
        silence_hdf5_errors();
        silence_hdf5_errors();
    }
}
