//! Export of data logs to disk
//!
//! Features:
//! - CSV rendering with fixed per-column precision and the `∞` sentinel
//! - Re-parse of exported files
//! - Atomic commit (tmp → target) so a failed export never leaves a partial file
//! - Empty logs are reported, not written

pub mod atomic;
pub mod csv;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::sim::DataLog;

pub use csv::{ParseError, ParsedTable};

/// Result of an export that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// File committed with this many data rows (header excluded)
    Written { path: PathBuf, rows: usize },
    /// The log was empty; nothing was written
    NothingToExport,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Write `log` to `path` as CSV. The log is only read.
pub fn export(log: &DataLog, path: &Path) -> Result<ExportOutcome, ExportError> {
    if log.is_empty() {
        return Ok(ExportOutcome::NothingToExport);
    }
    let io_err = |source: io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let bytes = csv::render(log).map_err(|e| io_err(e.into()))?;
    atomic::write(path, &bytes).map_err(io_err)?;
    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        rows: log.len(),
    })
}
