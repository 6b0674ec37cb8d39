//! Locating track files on disk.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::NetCdfResult;

/// All `.nc` files below `dir`, sorted by path.
pub fn gather_files(dir: &Path) -> NetCdfResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().map_or(false, |ext| ext == "nc")
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "Gathered netCDF files");
    Ok(files)
}

/// Resolve file names against `dir`, keeping only those that exist.
pub fn resolve_existing(dir: &Path, names: &[String]) -> Vec<PathBuf> {
    names
        .iter()
        .filter_map(|name| {
            let path = dir.join(name);
            if path.is_file() {
                Some(path)
            } else {
                warn!(file = %path.display(), "Selected track file not found");
                None
            }
        })
        .collect()
}
