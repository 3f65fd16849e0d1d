//! Raster snapshots of a rendered scene.

use crate::renderer::{RenderError, RenderResult};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use tacmap_core::shapes::SerializableColor;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Straight-alpha RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl RasterImage {
    /// Encode as PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| RenderError::Encode(format!("PNG header: {e}")))?;
            writer
                .write_image_data(&self.rgba_data)
                .map_err(|e| RenderError::Encode(format!("PNG data: {e}")))?;
        }
        Ok(png_data)
    }

    /// Encode as baseline JPEG. Alpha is dropped.
    pub fn encode_jpeg(&self, quality: u8) -> RenderResult<Vec<u8>> {
        let mut jpeg_data = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_data, quality)
            .encode(&self.to_rgb(), self.width, self.height, image::ExtendedColorType::Rgb8)
            .map_err(|e| RenderError::Encode(format!("JPEG: {e}")))?;
        Ok(jpeg_data)
    }

    /// RGB bytes without alpha.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.rgba_data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    /// Pixel at (x, y) as RGBA.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.rgba_data.get(i..i + 4).and_then(|px| px.try_into().ok())
    }
}

/// What to rasterize.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRequest {
    /// Scene document.
    pub svg: String,
    /// Oversampling factor.
    pub scale: f64,
    /// Fill for transparent regions.
    pub background: SerializableColor,
}

/// Turns a rendered scene into pixels.
pub trait Snapshotter {
    fn snapshot(&self, request: SnapshotRequest) -> BoxFuture<'_, RenderResult<RasterImage>>;
}

/// Rasterizes SVG scenes with resvg.
pub struct ResvgSnapshotter {
    fontdb: Arc<usvg::fontdb::Database>,
    /// Base directory for relative image references such as map backgrounds.
    resources_dir: Option<PathBuf>,
}

impl Default for ResvgSnapshotter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResvgSnapshotter {
    /// Snapshotter using the system fonts.
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        log::debug!("Loaded {} font faces", fontdb.len());
        Self::with_fontdb(fontdb)
    }

    pub fn with_fontdb(fontdb: usvg::fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(fontdb),
            resources_dir: None,
        }
    }

    pub fn with_resources_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resources_dir = Some(dir.into());
        self
    }

    /// Rasterize synchronously.
    pub fn rasterize(&self, request: &SnapshotRequest) -> RenderResult<RasterImage> {
        let mut opt = usvg::Options::default();
        opt.resources_dir = self.resources_dir.clone();
        opt.fontdb = self.fontdb.clone();
        let tree = usvg::Tree::from_str(&request.svg, &opt).map_err(|e| RenderError::Parse(e.to_string()))?;

        let scale = request.scale as f32;
        let size = tree.size();
        let width = (size.width() * scale).round() as u32;
        let height = (size.height() * scale).round() as u32;
        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or(RenderError::Surface { width, height })?;

        let bg = request.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        let rgba_data = pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        log::debug!("Rasterized scene at {}x{}", width, height);
        Ok(RasterImage { rgba_data, width, height })
    }
}

impl Snapshotter for ResvgSnapshotter {
    fn snapshot(&self, request: SnapshotRequest) -> BoxFuture<'_, RenderResult<RasterImage>> {
        Box::pin(async move { self.rasterize(&request) })
    }
}
