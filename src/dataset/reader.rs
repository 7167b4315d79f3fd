//! File reading with memory-mapping for large documents.
//!
//! Corpus documents can be tens of megabytes; files over the threshold are
//! memory-mapped instead of buffered through `read_to_string`.

// Memory mapping requires unsafe but is read-only here
#![allow(unsafe_code)]

use crate::error::{DatasetError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Threshold for using memory mapping (1MB).
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Reads a file to a string, memory-mapping large files.
///
/// # Errors
///
/// Returns a [`DatasetError`] if the file cannot be read or is not valid
/// UTF-8.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy().to_string();

    let file = File::open(path).map_err(|e| DatasetError::ReadFailed {
        path: path_str.clone(),
        reason: e.to_string(),
    })?;
    let size = file
        .metadata()
        .map_err(|e| DatasetError::ReadFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?
        .len();

    let bytes = if size >= MMAP_THRESHOLD {
        // Safety: the mapping is read-only and dropped before return
        let mmap = unsafe {
            Mmap::map(&file).map_err(|e| DatasetError::MmapFailed {
                path: path_str.clone(),
                reason: e.to_string(),
            })?
        };
        mmap.to_vec()
    } else {
        let mut buf = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
        let mut file = file;
        file.read_to_end(&mut buf)
            .map_err(|e| DatasetError::ReadFailed {
                path: path_str.clone(),
                reason: e.to_string(),
            })?;
        buf
    };

    String::from_utf8(bytes).map_err(|e| {
        DatasetError::ReadFailed {
            path: path_str,
            reason: format!("invalid UTF-8: {e}"),
        }
        .into()
    })
}
