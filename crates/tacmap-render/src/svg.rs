//! SVG scene writer.
//!
//! The scene is laid out in canvas pixels: percentage coordinates are
//! mapped onto `canvas_size`, and the board zoom becomes the outer
//! `width`/`height` so the whole canvas scales uniformly.

use crate::renderer::{Layer, LayerSpec, RenderContext, RenderMode, Renderer};
use kurbo::{Point, Size};
use std::borrow::Cow;
use std::fmt::Write;
use tacmap_core::coords::to_pixels;
use tacmap_core::items::{ItemKind, MapItem};
use tacmap_core::maps::MapKey;
use tacmap_core::shapes::{DrawElement, DrawKind, Geometry, SerializableColor};

/// Text annotation font size in CSS pixels.
pub const TEXT_FONT_SIZE: f64 = 18.0;
/// Opacity of the fill of filled circles.
pub const CIRCLE_FILL_OPACITY: f64 = 0.3;

const DELETE_BUTTON_RADIUS: f64 = 8.0;

/// Writes the layer stack as an SVG document.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    scene: String,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last built document.
    pub fn scene(&self) -> &str {
        &self.scene
    }

    /// Take the last built document, leaving an empty one.
    pub fn take_scene(&mut self) -> String {
        std::mem::take(&mut self.scene)
    }

    /// Build and return the document in one call.
    pub fn render(ctx: &RenderContext) -> String {
        let mut renderer = Self::new();
        renderer.build_scene(ctx);
        renderer.take_scene()
    }

    fn write_background(&mut self, ctx: &RenderContext, size: Size) {
        let background = SerializableColor::from(self.background_color(ctx));
        let _ = write!(
            self.scene,
            r#"<rect width="{:.2}" height="{:.2}" fill="{}"/>"#,
            size.width, size.height, background
        );
        if let Some(image) = ctx.board.background() {
            let _ = write!(
                self.scene,
                r#"<image xlink:href="{}" width="{:.2}" height="{:.2}" preserveAspectRatio="xMidYMid slice"/>"#,
                escape(image),
                size.width,
                size.height
            );
        }
    }

    fn write_shapes(&mut self, ctx: &RenderContext, size: Size) {
        let params = ctx.board.geometry_params();
        for element in ctx.board.shapes().iter().filter(|el| el.kind != DrawKind::Text) {
            let stroke = format!(
                r#"stroke="{}" stroke-width="{:.2}" stroke-linecap="round" stroke-linejoin="round" vector-effect="non-scaling-stroke""#,
                element.color,
                element.stroke_width * ctx.scale_factor
            );
            let px = |p: Point| to_pixels(p, size.width, size.height);
            match element.geometry(&params) {
                Geometry::Polyline(points) => {
                    let _ = write!(
                        self.scene,
                        r#"<polyline points="{}" fill="none" {}/>"#,
                        points_attr(points.into_iter().map(px)),
                        stroke
                    );
                }
                Geometry::Segment { start, end } => {
                    self.write_line(px(start), px(end), &stroke);
                }
                Geometry::Arrow { start, end, wings } => {
                    self.scene.push_str("<g>");
                    self.write_line(px(start), px(end), &stroke);
                    let _ = write!(
                        self.scene,
                        r#"<polyline points="{}" fill="none" {}/>"#,
                        points_attr([px(wings[0]), px(end), px(wings[1])]),
                        stroke
                    );
                    self.scene.push_str("</g>");
                }
                Geometry::Rect(rect) => {
                    let p0 = px(Point::new(rect.x0, rect.y0));
                    let p1 = px(Point::new(rect.x1, rect.y1));
                    let _ = write!(
                        self.scene,
                        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" {}/>"#,
                        p0.x,
                        p0.y,
                        p1.x - p0.x,
                        p1.y - p0.y,
                        stroke
                    );
                }
                Geometry::Ellipse { center, radius_x, radius_y, filled } => {
                    let c = px(center);
                    let fill = if filled {
                        format!(r#"fill="{}" fill-opacity="{}""#, opaque(element.color), CIRCLE_FILL_OPACITY)
                    } else {
                        r#"fill="none""#.to_string()
                    };
                    let _ = write!(
                        self.scene,
                        r#"<ellipse cx="{:.2}" cy="{:.2}" rx="{:.2}" ry="{:.2}" {} {}/>"#,
                        c.x,
                        c.y,
                        radius_x / 100.0 * size.width,
                        radius_y / 100.0 * size.height,
                        fill,
                        stroke
                    );
                }
                Geometry::Text { .. } => {}
            }
        }
    }

    fn write_line(&mut self, a: Point, b: Point, stroke: &str) {
        let _ = write!(
            self.scene,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" {}/>"#,
            a.x, a.y, b.x, b.y, stroke
        );
    }

    fn write_text_annotations(&mut self, ctx: &RenderContext, size: Size) {
        let texts = ctx.board.shapes().iter().filter(|el| el.kind == DrawKind::Text);
        for element in texts {
            self.write_text_annotation(element, ctx.scale_factor, size);
        }
    }

    fn write_text_annotation(&mut self, element: &DrawElement, scale: f64, size: Size) {
        let Some(text) = element.text.as_deref() else {
            return;
        };
        let at = to_pixels(element.origin(), size.width, size.height);
        let _ = write!(
            self.scene,
            r##"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-weight="bold" font-size="{:.2}" fill="{}" stroke="#000000" stroke-width="{:.2}" paint-order="stroke" pointer-events="none">{}</text>"##,
            at.x,
            at.y,
            TEXT_FONT_SIZE * scale,
            element.color,
            2.0 * scale,
            escape(text)
        );
    }

    fn write_items(&mut self, ctx: &RenderContext, map: &MapKey, size: Size, spec: &LayerSpec) {
        let cursor = if spec.pointer_events { r#" cursor="move""# } else { "" };
        for item in ctx.board.items_visible() {
            let Some(position) = item.position(map) else {
                continue;
            };
            let at = to_pixels(position, size.width, size.height);
            let _ = write!(
                self.scene,
                r#"<g data-item-id="{}" transform="translate({:.2} {:.2})"{}>"#,
                item.id, at.x, at.y, cursor
            );
            let half = match item.kind {
                ItemKind::Label => self.write_label(item, ctx.scale_factor),
                ItemKind::Logo => self.write_logo(item, ctx.scale_factor),
            };
            if ctx.mode == RenderMode::Live {
                self.write_delete_affordance(item, half);
            }
            self.scene.push_str("</g>");
        }
    }

    /// Returns the half-extent of the drawn label.
    fn write_label(&mut self, item: &MapItem, scale: f64) -> (f64, f64) {
        let font_size = item.font_size(scale);
        let _ = write!(
            self.scene,
            r#"<text text-anchor="middle" dominant-baseline="central" font-family="sans-serif" font-weight="bold" font-size="{:.2}" fill="{}" stroke="{}" stroke-width="{:.2}" paint-order="stroke">{}</text>"#,
            font_size,
            item.style.fill_color,
            item.style.stroke_color,
            font_size / 8.0,
            escape(&item.content)
        );
        item.half_extent(scale)
    }

    fn write_logo(&mut self, item: &MapItem, scale: f64) -> (f64, f64) {
        let (half, _) = item.half_extent(scale);
        let edge = half * 2.0;
        let _ = write!(
            self.scene,
            r#"<image xlink:href="{}" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" preserveAspectRatio="xMidYMid meet"/>"#,
            escape(&item.content),
            -half,
            -half,
            edge,
            edge
        );
        (half, half)
    }

    fn write_delete_affordance(&mut self, item: &MapItem, (half_w, half_h): (f64, f64)) {
        let r = DELETE_BUTTON_RADIUS;
        let _ = write!(
            self.scene,
            r##"<g data-delete-item="{}" transform="translate({:.2} {:.2})" cursor="pointer"><circle r="{r:.2}" fill="#dc2626"/><path d="M-3,-3 L3,3 M3,-3 L-3,3" stroke="#ffffff" stroke-width="2"/></g>"##,
            item.id,
            half_w + r,
            -half_h - r
        );
    }

    fn write_capture(&mut self, size: Size, spec: &LayerSpec) {
        let _ = write!(
            self.scene,
            r##"<rect data-layer="capture" width="{:.2}" height="{:.2}" fill="#000000" fill-opacity="0" pointer-events="{}"/>"##,
            size.width,
            size.height,
            if spec.pointer_events { "all" } else { "none" }
        );
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        let size = ctx.canvas_size;
        let zoom = ctx.board.zoom().factor;
        self.scene.clear();
        let _ = write!(
            self.scene,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{:.2}" height="{:.2}" viewBox="0 0 {:.2} {:.2}">"#,
            size.width * zoom,
            size.height * zoom,
            size.width,
            size.height
        );

        let active_map = ctx.board.active_map().cloned();
        for spec in ctx.layer_stack().layers() {
            // Without a map only the empty background and the capture surface remain.
            if active_map.is_none() && !matches!(spec.layer, Layer::Background | Layer::InteractionCapture) {
                continue;
            }
            let _ = write!(
                self.scene,
                r#"<g data-layer="{}" pointer-events="{}">"#,
                layer_name(spec.layer),
                if spec.pointer_events { "all" } else { "none" }
            );
            match spec.layer {
                Layer::Background => self.write_background(ctx, size),
                Layer::Shapes => self.write_shapes(ctx, size),
                Layer::TextAnnotations => self.write_text_annotations(ctx, size),
                Layer::Items => {
                    if let Some(map) = &active_map {
                        self.write_items(ctx, map, size, spec);
                    }
                }
                Layer::InteractionCapture => self.write_capture(size, spec),
            }
            self.scene.push_str("</g>");
        }
        self.scene.push_str("</svg>");
    }
}

fn layer_name(layer: Layer) -> &'static str {
    match layer {
        Layer::Background => "background",
        Layer::Shapes => "shapes",
        Layer::TextAnnotations => "text",
        Layer::Items => "items",
        Layer::InteractionCapture => "capture",
    }
}

fn points_attr(points: impl IntoIterator<Item = Point>) -> String {
    let mut out = String::new();
    for (i, p) in points.into_iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:.2},{:.2}", p.x, p.y);
    }
    out
}

fn opaque(color: SerializableColor) -> SerializableColor {
    SerializableColor { a: 255, ..color }
}

/// Escape text for use in XML content and attribute values.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
