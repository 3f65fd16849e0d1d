//! Cross-map markers: text labels and logos.

mod store;

pub use store::{ItemStore, RemoveOutcome};

use crate::maps::MapKey;
use crate::shapes::SerializableColor;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for items.
pub type ItemId = Uuid;

/// Where a freshly added item lands on a map.
pub const DEFAULT_ITEM_POSITION: Point = Point::new(50.0, 50.0);

/// Label font size in CSS pixels at scale 1.
pub const LABEL_FONT_SIZE: f64 = 22.0;
/// Logo edge length in CSS pixels at scale 1.
pub const LOGO_SIZE: f64 = 64.0;
/// Rough advance width of bold sans-serif, as a fraction of the font size.
const LABEL_ADVANCE: f64 = 0.6;

/// Item errors. The messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("Item limit reached: at most {0} items can be placed")]
    LimitReached(usize),
    #[error("Item not found")]
    NotFound,
    #[error("Only text labels can be renamed")]
    NotALabel,
    #[error("Item content cannot be empty")]
    EmptyContent,
    #[error("No map to place the item on")]
    NoTargetMaps,
    #[error("Logo must be an image")]
    InvalidImage,
}

/// Check a logo reference. Data URIs must carry a base64 image payload.
pub fn validate_logo(content: &str) -> Result<(), ItemError> {
    let Some(rest) = content.strip_prefix("data:") else {
        return Ok(());
    };
    let (meta, payload) = rest.split_once(',').ok_or(ItemError::InvalidImage)?;
    if !meta.starts_with("image/") || !meta.ends_with(";base64") {
        return Err(ItemError::InvalidImage);
    }
    STANDARD
        .decode(payload.trim())
        .map(|_| ())
        .map_err(|_| ItemError::InvalidImage)
}

/// What an item displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Literal text such as a team name.
    Label,
    /// Image given as a data URI or image reference.
    Logo,
}

/// Visual style of an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    pub fill_color: SerializableColor,
    pub stroke_color: SerializableColor,
    pub font_size_scale: f64,
}

impl ItemStyle {
    pub const DEFAULT_FONT_SIZE_SCALE: f64 = 1.0;
}

impl Default for ItemStyle {
    fn default() -> Self {
        Self {
            fill_color: SerializableColor::white(),
            stroke_color: SerializableColor::black(),
            font_size_scale: Self::DEFAULT_FONT_SIZE_SCALE,
        }
    }
}

/// Which maps a new item is placed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemTarget {
    /// Only this map.
    Map(MapKey),
    /// Every map in the registry.
    AllMaps,
}

/// A marker that can be placed on several maps, each with its own position.
///
/// The item is visible on exactly the maps present in `positions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub content: String,
    /// Display scale multiplier.
    pub scale: f64,
    pub style: ItemStyle,
    pub positions: BTreeMap<MapKey, Point>,
}

impl MapItem {
    /// Create an item centered on each of `maps`.
    pub fn new(kind: ItemKind, content: String, style: ItemStyle, maps: impl IntoIterator<Item = MapKey>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            content,
            scale: 1.0,
            style,
            positions: maps.into_iter().map(|m| (m, DEFAULT_ITEM_POSITION)).collect(),
        }
    }

    pub fn is_label(&self) -> bool {
        self.kind == ItemKind::Label
    }

    pub fn is_visible_on(&self, map: &MapKey) -> bool {
        self.positions.contains_key(map)
    }

    pub fn position(&self, map: &MapKey) -> Option<Point> {
        self.positions.get(map).copied()
    }

    /// Font size of a label in CSS pixels.
    pub fn font_size(&self, scale_factor: f64) -> f64 {
        LABEL_FONT_SIZE * self.style.font_size_scale * self.scale * scale_factor
    }

    /// Half width and half height of the drawn item in CSS pixels, centred
    /// on its position.
    pub fn half_extent(&self, scale_factor: f64) -> (f64, f64) {
        match self.kind {
            ItemKind::Label => {
                let font_size = self.font_size(scale_factor);
                let width = self.content.chars().count() as f64 * font_size * LABEL_ADVANCE;
                (width / 2.0, font_size / 2.0)
            }
            ItemKind::Logo => {
                let edge = LOGO_SIZE * self.scale * scale_factor;
                (edge / 2.0, edge / 2.0)
            }
        }
    }
}
