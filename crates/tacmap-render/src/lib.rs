//! TacMap Render Library
//!
//! Layer rendering for the map board, raster snapshots, and the export
//! pipeline built on them.

pub mod export;
mod renderer;
pub mod snapshot;
pub mod svg;

#[cfg(test)]
mod testing;

pub use export::{
    Capture, DownloadSink, ExportArtifact, ExportError, ExportPipeline, ExportResult, PrintHost,
};
pub use renderer::{Layer, LayerSpec, LayerStack, RenderContext, RenderError, RenderMode, RenderResult, Renderer};
pub use snapshot::{BoxFuture, RasterImage, ResvgSnapshotter, SnapshotRequest, Snapshotter};
pub use svg::SvgRenderer;

#[cfg(not(target_arch = "wasm32"))]
pub use export::DirectorySink;
