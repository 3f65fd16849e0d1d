//! Board configuration.
//!
//! All product constants live here so hosts can tune them from a JSON
//! document without touching the interaction logic.

use crate::shapes::SerializableColor;
use serde::{Deserialize, Serialize};

/// Width-to-height ratio of the map canvas.
pub const ASPECT_RATIO: f64 = 16.0 / 9.0;

/// Configuration for a [`MapBoard`](crate::MapBoard) and the export pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Maximum number of items across all maps.
    pub max_items: usize,
    /// Minimum number of label items visible on the active map before export.
    pub min_export_labels: usize,
    /// Eraser radius in percentage units at zoom 1.0.
    pub eraser_radius: f64,
    /// Press tolerance in canvas pixels around an item's drawn box in
    /// select mode.
    pub item_hit_radius: f64,
    /// Stroke color for new shapes.
    pub default_color: SerializableColor,
    /// Stroke width for new shapes.
    pub default_stroke_width: f64,
    /// Arrowhead wing length in percentage units.
    pub arrow_head_length: f64,
    /// Arrowhead wing angle in degrees from the shaft.
    pub arrow_wing_degrees: f64,
    /// Canvas width / height.
    pub aspect_ratio: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    /// Oversampling factor for raster snapshots.
    pub export_scale: f64,
    /// Fill used behind transparent regions of a snapshot.
    pub export_background: SerializableColor,
    /// Nominal canvas width in CSS pixels.
    pub canvas_width: f64,
    /// Nominal canvas height in CSS pixels.
    pub canvas_height: f64,
    /// Prefix for every key written to local storage.
    pub storage_namespace: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_items: 25,
            min_export_labels: 2,
            eraser_radius: 3.0,
            item_hit_radius: 6.0,
            default_color: SerializableColor::new(255, 0, 0, 255),
            default_stroke_width: 3.0,
            arrow_head_length: 2.0,
            arrow_wing_degrees: 30.0,
            aspect_ratio: ASPECT_RATIO,
            min_zoom: 0.5,
            max_zoom: 3.0,
            zoom_step: 0.1,
            export_scale: 2.0,
            export_background: SerializableColor::black(),
            canvas_width: 1600.0,
            canvas_height: 900.0,
            storage_namespace: "tacmap".to_string(),
        }
    }
}

impl BoardConfig {
    /// Parse a configuration document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
