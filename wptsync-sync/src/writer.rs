//! Atomic writer.
//!
//! ## `write_atomic` protocol
//!
//! 1. Create all missing parent directories of the destination.
//! 2. Create `.wpt-download-*` in the destination's own directory, so the
//!    final rename never crosses a filesystem boundary.
//! 3. Stream the body into it.
//! 4. `fsync` the temp file.
//! 5. Rename onto the destination.
//!
//! Any failure before step 5 drops the temp file (which deletes it) and the
//! destination keeps its previous content. A killed process can still leave
//! a stray `.wpt-download-*` behind.

use std::io::{self, Read};
use std::path::Path;

use tempfile::Builder;

use crate::error::WriteError;

/// Prefix of temp files created next to the destination.
pub const TEMP_PREFIX: &str = ".wpt-download-";

/// Write everything `body` yields to `dest`, atomically.
///
/// Returns the number of bytes written.
pub fn write_atomic<R>(dest: &Path, body: &mut R) -> Result<u64, WriteError>
where
    R: Read + ?Sized,
{
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut tmp = Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(|source| WriteError::TempFile {
            dir: dir.to_path_buf(),
            source,
        })?;
    tracing::debug!("temp file: {}", tmp.path().display());

    let written = io::copy(body, tmp.as_file_mut()).map_err(|source| WriteError::Copy {
        path: tmp.path().to_path_buf(),
        source,
    })?;

    tmp.as_file().sync_all().map_err(|source| WriteError::Flush {
        path: tmp.path().to_path_buf(),
        source,
    })?;

    // On failure `PersistError` hands the temp file back; dropping it removes it.
    tmp.persist(dest).map_err(|e| WriteError::Rename {
        path: dest.to_path_buf(),
        source: e.error,
    })?;

    tracing::info!("wrote: {} ({written} bytes)", dest.display());
    Ok(written)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
