//! Atomic file commit
//!
//! Content goes to a temporary file in the target's directory which is
//! synced and then persisted (renamed) over the target. Readers see either
//! the old file or the complete new one.

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `target` with `contents`; on failure the target is untouched and
/// no temporary file is left behind
pub fn write(target: &Path, contents: &[u8]) -> io::Result<()> {
    if target.file_name().is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "target has no file name",
        ));
    }
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Dropped (and deleted) on any early return
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(target)?;
    Ok(())
}
