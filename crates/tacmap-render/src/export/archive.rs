//! ZIP bundling.

use super::{ExportError, ExportResult};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Pack named buffers into one deflated archive.
pub fn build_zip<'a>(entries: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> ExportResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, bytes) in entries {
        zip.start_file(name, options)
            .map_err(|e| ExportError::Encode(format!("Failed to add '{}' to archive: {}", name, e)))?;
        zip.write_all(bytes)
            .map_err(|e| ExportError::Encode(format!("Failed to write '{}': {}", name, e)))?;
        log::debug!("Archived '{}' ({} bytes)", name, bytes.len());
    }
    let cursor = zip
        .finish()
        .map_err(|e| ExportError::Encode(format!("Failed to finish archive: {}", e)))?;
    Ok(cursor.into_inner())
}
