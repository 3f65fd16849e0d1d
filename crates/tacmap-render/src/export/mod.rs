//! Export pipeline: PNG, PDF, ZIP and print, all from one snapshot.

mod archive;
mod pdf;
mod print;
mod sink;

pub use archive::build_zip;
pub use pdf::{Cover, PAGE_HEIGHT, PAGE_WIDTH, build_pdf};
pub use print::print_document;
pub use sink::{DownloadSink, PrintHost};

#[cfg(not(target_arch = "wasm32"))]
pub use sink::DirectorySink;

use crate::renderer::{RenderContext, RenderError, RenderMode};
use crate::snapshot::{RasterImage, SnapshotRequest, Snapshotter};
use crate::svg::SvgRenderer;
use tacmap_core::canvas::MapBoard;
use tacmap_core::maps::MapKey;
use tacmap_core::project::unix_millis;
use thiserror::Error;

/// Export errors. The messages are shown to the user as-is.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Add at least {required} team labels to this map before exporting ({found} found)")]
    GateNotMet { required: usize, found: usize },
    #[error("Select a map first")]
    NoActiveMap,
    #[error("Could not generate file")]
    Snapshot(#[source] RenderError),
    #[error("Could not generate file: {0}")]
    Encode(String),
    #[error("Could not save file: {0}")]
    Sink(String),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// A finished file ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// One snapshot of the active map. Every format is built from it.
#[derive(Debug, Clone)]
pub struct Capture {
    pub map: MapKey,
    pub image: RasterImage,
    /// The image encoded as PNG.
    pub png: Vec<u8>,
    /// Unix milliseconds.
    pub taken_at: u64,
}

impl Capture {
    /// `tacmap-<map>-<millis>.<extension>`
    pub fn file_name(&self, extension: &str) -> String {
        let map: String = self
            .map
            .as_str()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
            .collect();
        format!("tacmap-{}-{}.{}", map, self.taken_at, extension)
    }
}

/// Produces export artifacts for a board.
pub struct ExportPipeline<S> {
    snapshotter: S,
    jpeg_quality: u8,
}

impl<S: Snapshotter> ExportPipeline<S> {
    pub fn new(snapshotter: S) -> Self {
        Self {
            snapshotter,
            jpeg_quality: 92,
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn snapshotter(&self) -> &S {
        &self.snapshotter
    }

    /// Check that the active map has enough team labels to export.
    pub fn check_gate(&self, board: &MapBoard) -> ExportResult<MapKey> {
        let map = board.active_map().cloned().ok_or(ExportError::NoActiveMap)?;
        let required = board.config().min_export_labels;
        let found = board.visible_label_count();
        if found < required {
            log::warn!("Export blocked on {}: {} of {} labels", map, found, required);
            return Err(ExportError::GateNotMet { required, found });
        }
        Ok(map)
    }

    /// Snapshot the active map.
    ///
    /// Zoom is removed for the duration of the snapshot so the whole
    /// canvas is captured at its nominal size, then restored.
    pub async fn capture(&self, board: &mut MapBoard) -> ExportResult<Capture> {
        let map = self.check_gate(board)?;

        let zoom = board.zoom().factor;
        board.reset_zoom();
        let svg = SvgRenderer::render(&RenderContext::new(board).with_mode(RenderMode::Export));
        let request = SnapshotRequest {
            svg,
            scale: board.config().export_scale,
            background: board.config().export_background,
        };
        let result = self.snapshotter.snapshot(request).await;
        board.set_zoom(zoom);

        let image = result.map_err(|e| {
            log::error!("Snapshot of {} failed: {}", map, e);
            ExportError::Snapshot(e)
        })?;
        let png = image.encode_png().map_err(|e| {
            log::error!("PNG encoding failed: {}", e);
            ExportError::Encode(e.to_string())
        })?;
        log::debug!("Captured {} at {}x{}", map, image.width, image.height);
        Ok(Capture {
            map,
            image,
            png,
            taken_at: unix_millis(),
        })
    }

    /// Snapshot for on-screen review before downloading.
    pub async fn preview(&self, board: &mut MapBoard) -> ExportResult<Capture> {
        self.capture(board).await
    }

    pub fn png_artifact(&self, capture: &Capture) -> ExportArtifact {
        ExportArtifact {
            file_name: capture.file_name("png"),
            mime_type: "image/png",
            bytes: capture.png.clone(),
        }
    }

    /// PDF with the snapshot page, preceded by a cover page when `title`
    /// is non-blank.
    pub fn pdf_artifact(&self, capture: &Capture, title: Option<&str>) -> ExportResult<ExportArtifact> {
        let jpeg = capture
            .image
            .encode_jpeg(self.jpeg_quality)
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        let cover = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|title| Cover {
                title,
                map: capture.map.as_str(),
            });
        Ok(ExportArtifact {
            file_name: capture.file_name("pdf"),
            mime_type: "application/pdf",
            bytes: build_pdf(&jpeg, capture.image.width, capture.image.height, cover),
        })
    }

    /// ZIP holding the PNG and a JSON dump of the project.
    pub fn zip_artifact(&self, capture: &Capture, board: &MapBoard) -> ExportResult<ExportArtifact> {
        let state = board.snapshot_state();
        let json = serde_json::to_vec_pretty(&state.dump(capture.taken_at))
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        let png_name = capture.file_name("png");
        let bytes = build_zip([(png_name.as_str(), capture.png.as_slice()), ("project.json", json.as_slice())])?;
        Ok(ExportArtifact {
            file_name: capture.file_name("zip"),
            mime_type: "application/zip",
            bytes,
        })
    }

    pub fn print_html(&self, capture: &Capture) -> String {
        print_document(&capture.png, &capture.file_name("png"))
    }

    pub async fn download_png(&self, board: &mut MapBoard, sink: &impl DownloadSink) -> ExportResult<ExportArtifact> {
        let capture = self.capture(board).await?;
        let artifact = self.png_artifact(&capture);
        deliver(sink, artifact)
    }

    pub async fn download_pdf(
        &self,
        board: &mut MapBoard,
        title: Option<&str>,
        sink: &impl DownloadSink,
    ) -> ExportResult<ExportArtifact> {
        let capture = self.capture(board).await?;
        let artifact = self.pdf_artifact(&capture, title)?;
        deliver(sink, artifact)
    }

    pub async fn export_zip(&self, board: &mut MapBoard, sink: &impl DownloadSink) -> ExportResult<ExportArtifact> {
        let capture = self.capture(board).await?;
        let artifact = self.zip_artifact(&capture, board)?;
        deliver(sink, artifact)
    }

    pub async fn print_current(&self, board: &mut MapBoard, host: &impl PrintHost) -> ExportResult<()> {
        let capture = self.capture(board).await?;
        host.print(&self.print_html(&capture))?;
        log::info!("Sent {} to print", capture.map);
        Ok(())
    }
}

fn deliver(sink: &impl DownloadSink, artifact: ExportArtifact) -> ExportResult<ExportArtifact> {
    sink.deliver(&artifact)?;
    log::info!("Exported {} ({} bytes)", artifact.file_name, artifact.bytes.len());
    Ok(artifact)
}
