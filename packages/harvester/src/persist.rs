//! Idempotent artifact persistence with read-back verification.
//!
//! The artifact is a JSON array of records, written wholesale on every
//! successful run. The write goes to a sibling temp file first and is
//! renamed into place, so a concurrent reader never observes a partial
//! artifact. After writing, the artifact is read back and must compare
//! structurally equal to the dataset that was written.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::error::{PersistError, PersistResult};

fn io_err(path: &Path, source: std::io::Error) -> PersistError {
    PersistError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load a previously persisted dataset.
pub fn load(path: &Path) -> PersistResult<Dataset> {
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Write `dataset` to `path` atomically and verify the round-trip.
///
/// Overwrites any prior artifact wholesale; never appends. Fails with
/// [`PersistError::VerificationFailed`] if the read-back does not equal the
/// in-memory dataset, in which case the run must not report success even
/// though bytes were written.
pub fn persist(dataset: &Dataset, path: &Path) -> PersistResult<()> {
    let json = serde_json::to_vec_pretty(dataset)?;

    let tmp = temp_path(path);
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    debug!(path = %path.display(), bytes = json.len(), "artifact written");

    let read_back = load(path)?;
    if read_back != *dataset {
        return Err(PersistError::VerificationFailed {
            path: path.to_path_buf(),
        });
    }

    info!(path = %path.display(), records = dataset.len(), "artifact verified");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
