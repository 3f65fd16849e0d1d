//! Host collaborators that receive export results.

use super::{ExportArtifact, ExportResult};

#[cfg(not(target_arch = "wasm32"))]
use super::ExportError;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Receives finished files (a browser download, a directory, ...).
pub trait DownloadSink {
    fn deliver(&self, artifact: &ExportArtifact) -> ExportResult<()>;
}

/// Opens a print dialog for an HTML document.
pub trait PrintHost {
    fn print(&self, html: &str) -> ExportResult<()>;
}

/// Writes artifacts into a directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl DownloadSink for DirectorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> ExportResult<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| ExportError::Sink(format!("Failed to create {}: {}", self.dir.display(), e)))?;
        let path = self.dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.bytes)
            .map_err(|e| ExportError::Sink(format!("Failed to write {}: {}", path.display(), e)))?;
        log::info!("Wrote {} ({} bytes)", path.display(), artifact.bytes.len());
        Ok(())
    }
}
