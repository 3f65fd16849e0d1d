//! Vector annotation primitives drawn on a map.

mod geometry;
mod store;

pub use geometry::{Geometry, GeometryParams, arrow_wings, ellipse_radii, normalized_rect};
pub use store::ShapeStore;

use kurbo::{Point, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable color representation (RGBA8), stored as a `#rrggbb[aa]` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 17;
                }
                Some(Self::new(out[0], out[1], out[2], 255))
            }
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Alpha as a 0..1 fraction.
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Kind of drawn primitive. The eraser is an action, never a stored kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrawKind {
    Freehand,
    Line,
    Arrow,
    Rect,
    /// Filled circle (fill at 30% of the stroke color).
    Circle,
    CircleOutline,
    Text,
}

impl DrawKind {
    /// Whether this kind accumulates a polyline instead of an extent.
    pub fn is_polyline(self) -> bool {
        matches!(self, DrawKind::Freehand)
    }
}

/// One vector primitive belonging to exactly one map.
///
/// Coordinates are percentages (0..100) of the canvas width (x) and
/// height (y). `w`/`h` are the signed delta from the origin to the
/// current gesture point; for circles they are radius components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawElement {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: DrawKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub h: f64,
    /// Polyline samples, freehand only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
    pub color: SerializableColor,
    pub stroke_width: f64,
    /// Literal text, text kind only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub filled: bool,
}

impl DrawElement {
    /// Create a zero-extent element at `origin` (single point for freehand).
    pub fn new(kind: DrawKind, origin: Point, color: SerializableColor, stroke_width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x: origin.x,
            y: origin.y,
            w: 0.0,
            h: 0.0,
            points: if kind.is_polyline() { vec![origin] } else { Vec::new() },
            color,
            stroke_width,
            text: None,
            filled: kind == DrawKind::Circle,
        }
    }

    /// Create a finished text annotation.
    pub fn text(origin: Point, text: String, color: SerializableColor, stroke_width: f64) -> Self {
        let mut element = Self::new(DrawKind::Text, origin, color, stroke_width);
        element.text = Some(text);
        element
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// End point of the gesture (`origin + extent`).
    pub fn end(&self) -> Point {
        self.origin() + self.extent()
    }

    /// Geometric center (`origin + extent / 2`).
    pub fn center(&self) -> Point {
        self.origin() + self.extent() * 0.5
    }

    /// Feed the next gesture point: appends for freehand, otherwise
    /// recomputes the extent from the origin.
    pub fn extend_to(&mut self, point: Point) {
        if self.kind.is_polyline() {
            self.points.push(point);
        } else {
            let delta = point - self.origin();
            self.w = delta.x;
            self.h = delta.y;
        }
    }

    /// Eraser hit-test.
    ///
    /// Freehand matches when any sample is within `threshold`; every other
    /// kind matches when its origin or its center is. Points along a long
    /// segment far from both are not hit.
    pub fn hit_by_eraser(&self, point: Point, threshold: f64) -> bool {
        if self.kind.is_polyline() {
            return self.points.iter().any(|p| p.distance(point) <= threshold);
        }
        self.origin().distance(point) <= threshold || self.center().distance(point) <= threshold
    }
}
