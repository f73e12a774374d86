//! File I/O collaborators around the in-memory codec.
//!
//! The codec itself only sees byte buffers; these helpers bridge to the
//! filesystem for callers that work with paths.

use std::fs;
use std::path::Path;

use log::info;

use crate::an2k::error::Result;

/// Reads a container file into a byte buffer.
///
/// # Errors
/// Returns [`An2kError::Io`](crate::An2kError::Io) when the file cannot
/// be opened or read.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    info!("Reading container file: {}", path.display());
    Ok(fs::read(path)?)
}

/// Writes a byte buffer to a container file, replacing any existing
/// content.
///
/// # Errors
/// Returns [`An2kError::Io`](crate::An2kError::Io) when the file cannot
/// be created or written.
pub fn write_file(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    info!(
        "Writing container file: {} ({} bytes)",
        path.display(),
        bytes.len()
    );
    fs::write(path, bytes)?;
    Ok(())
}
