//! Render geometry for drawn elements.
//!
//! Everything here stays in percentage space; the renderer maps the
//! result onto pixels.

use super::{DrawElement, DrawKind};
use crate::config::BoardConfig;
use kurbo::{Point, Rect, Vec2};

/// Parameters that influence how elements resolve to geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryParams {
    /// Arrowhead wing length, in percentage units.
    pub arrow_head_length: f64,
    /// Wing angle from the shaft, in degrees.
    pub arrow_wing_degrees: f64,
    /// Canvas width / height.
    pub aspect_ratio: f64,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self::from(&BoardConfig::default())
    }
}

impl From<&BoardConfig> for GeometryParams {
    fn from(config: &BoardConfig) -> Self {
        Self {
            arrow_head_length: config.arrow_head_length,
            arrow_wing_degrees: config.arrow_wing_degrees,
            aspect_ratio: config.aspect_ratio,
        }
    }
}

/// Resolved geometry of a [`DrawElement`].
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polyline(Vec<Point>),
    Segment {
        start: Point,
        end: Point,
    },
    Arrow {
        start: Point,
        end: Point,
        wings: [Point; 2],
    },
    Rect(Rect),
    Ellipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
        filled: bool,
    },
    Text {
        anchor: Point,
        text: String,
    },
}

/// Axis-aligned box for a possibly negative extent.
pub fn normalized_rect(origin: Point, extent: Vec2) -> Rect {
    let x0 = origin.x.min(origin.x + extent.x);
    let y0 = origin.y.min(origin.y + extent.y);
    Rect::new(x0, y0, x0 + extent.x.abs(), y0 + extent.y.abs())
}

/// Ellipse radii for a circle gesture with extent `(w, h)`.
///
/// x is a percentage of width and y a percentage of height, so on a
/// 16:9 canvas the vertical delta is divided by the aspect ratio before
/// the radius is taken, and the vertical radius is scaled back up. A
/// round gesture therefore renders round.
pub fn ellipse_radii(w: f64, h: f64, aspect_ratio: f64) -> (f64, f64) {
    let dx = w;
    let dy = h / aspect_ratio;
    let radius = (dx * dx + dy * dy).sqrt();
    (radius, radius * aspect_ratio)
}

/// The two wing tips of an arrowhead at `end`, pointing back along the shaft.
pub fn arrow_wings(start: Point, end: Point, length: f64, wing_degrees: f64) -> [Point; 2] {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let spread = wing_degrees.to_radians();
    let wing = |a: f64| Point::new(end.x - length * a.cos(), end.y - length * a.sin());
    [wing(angle - spread), wing(angle + spread)]
}

impl DrawElement {
    /// Resolve the geometry to draw for this element.
    pub fn geometry(&self, params: &GeometryParams) -> Geometry {
        match self.kind {
            DrawKind::Freehand => Geometry::Polyline(self.points.clone()),
            DrawKind::Line => Geometry::Segment {
                start: self.origin(),
                end: self.end(),
            },
            DrawKind::Arrow => Geometry::Arrow {
                start: self.origin(),
                end: self.end(),
                wings: arrow_wings(
                    self.origin(),
                    self.end(),
                    params.arrow_head_length,
                    params.arrow_wing_degrees,
                ),
            },
            DrawKind::Rect => Geometry::Rect(normalized_rect(self.origin(), self.extent())),
            DrawKind::Circle | DrawKind::CircleOutline => {
                let (radius_x, radius_y) = ellipse_radii(self.w, self.h, params.aspect_ratio);
                Geometry::Ellipse {
                    center: self.origin(),
                    radius_x,
                    radius_y,
                    filled: self.kind == DrawKind::Circle && self.filled,
                }
            }
            DrawKind::Text => Geometry::Text {
                anchor: self.origin(),
                text: self.text.clone().unwrap_or_default(),
            },
        }
    }
}
