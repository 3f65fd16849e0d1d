//! Renderer trait abstraction and the layer stack.

use kurbo::Size;
use peniko::Color;
use tacmap_core::canvas::MapBoard;
use tacmap_core::tools::ToolKind;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    Parse(String),
    #[error("Could not allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// What the scene is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// On-screen canvas: delete affordances and the capture surface are drawn.
    #[default]
    Live,
    /// Snapshot for export: only what belongs in the picture.
    Export,
}

/// One layer of the canvas, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Shapes,
    TextAnnotations,
    Items,
    InteractionCapture,
}

/// A layer with its pointer behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSpec {
    pub layer: Layer,
    /// Whether the layer receives pointer events.
    pub pointer_events: bool,
}

/// Fixed z-order stack for the active map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerStack {
    layers: Vec<LayerSpec>,
}

impl LayerStack {
    /// Stack for the given tool.
    ///
    /// In select mode the capture surface lets presses through to the
    /// items; in every other mode it sits over the items and takes them.
    pub fn new(tool: ToolKind, mode: RenderMode) -> Self {
        let mut layers = vec![
            LayerSpec { layer: Layer::Background, pointer_events: false },
            LayerSpec { layer: Layer::Shapes, pointer_events: false },
            LayerSpec { layer: Layer::TextAnnotations, pointer_events: false },
            LayerSpec { layer: Layer::Items, pointer_events: tool.allows_drag() },
        ];
        if mode == RenderMode::Live {
            layers.push(LayerSpec {
                layer: Layer::InteractionCapture,
                pointer_events: tool.captures_pointer(),
            });
        }
        Self { layers }
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn get(&self, layer: Layer) -> Option<&LayerSpec> {
        self.layers.iter().find(|spec| spec.layer == layer)
    }

    /// Topmost layer that takes pointer events.
    pub fn pointer_target(&self) -> Option<Layer> {
        self.layers.iter().rev().find(|spec| spec.pointer_events).map(|spec| spec.layer)
    }
}

/// Context for a single render.
pub struct RenderContext<'a> {
    /// The board to render.
    pub board: &'a MapBoard,
    /// Unzoomed canvas size in CSS pixels.
    pub canvas_size: Size,
    /// Device pixel ratio; scales stroke widths and text.
    pub scale_factor: f64,
    /// Fill behind the background image.
    pub background_color: Color,
    pub mode: RenderMode,
}

impl<'a> RenderContext<'a> {
    /// Create a live render context sized from the board configuration.
    pub fn new(board: &'a MapBoard) -> Self {
        let config = board.config();
        Self {
            board,
            canvas_size: Size::new(config.canvas_width, config.canvas_height),
            scale_factor: 1.0,
            background_color: config.export_background.into(),
            mode: RenderMode::Live,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_canvas_size(mut self, size: Size) -> Self {
        self.canvas_size = size;
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn layer_stack(&self) -> LayerStack {
        LayerStack::new(self.board.tool(), self.mode)
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene for the context's active map.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
