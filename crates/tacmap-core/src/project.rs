//! Persisted project snapshot and its on-disk schema.
//!
//! Older saves are accepted and migrated once at load time:
//! - a flat drawing list (before per-map drawings) belongs to the saved active map;
//! - items without a style get the default style.

use crate::items::{ItemId, ItemKind, ItemStyle, MapItem};
use crate::maps::MapKey;
use crate::shapes::DrawElement;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Schema version written by this build.
pub const PROJECT_VERSION: u32 = 2;

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The full working set of the board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectState {
    pub name: String,
    pub active_map: Option<MapKey>,
    pub drawings: BTreeMap<MapKey, Vec<DrawElement>>,
    pub items: Vec<MapItem>,
}

impl ProjectState {
    /// Serialize to the current schema.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&ProjectFile::from(self))
    }

    /// Parse any known schema version.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: ProjectFile = serde_json::from_str(json)?;
        Ok(file.migrate())
    }

    /// Everything an export archive records about the project.
    pub fn dump(&self, exported_at: u64) -> ProjectDump<'_> {
        ProjectDump {
            project_name: &self.name,
            active_map: self.active_map.as_ref(),
            drawings: &self.drawings,
            items: &self.items,
            exported_at,
        }
    }
}

/// JSON document bundled next to an exported image.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDump<'a> {
    pub project_name: &'a str,
    pub active_map: Option<&'a MapKey>,
    pub drawings: &'a BTreeMap<MapKey, Vec<DrawElement>>,
    pub items: &'a [MapItem],
    pub exported_at: u64,
}

/// Stored layout of a project.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    active_map: Option<MapKey>,
    #[serde(default)]
    drawings: StoredDrawings,
    #[serde(default)]
    items: Vec<StoredItem>,
}

/// Drawings are a per-map mapping; version 1 saves stored a bare list.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredDrawings {
    ByMap(BTreeMap<MapKey, Vec<DrawElement>>),
    Flat(Vec<DrawElement>),
}

impl Default for StoredDrawings {
    fn default() -> Self {
        StoredDrawings::ByMap(BTreeMap::new())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredItem {
    id: ItemId,
    kind: ItemKind,
    content: String,
    #[serde(default = "default_scale")]
    scale: f64,
    #[serde(default)]
    style: Option<ItemStyle>,
    #[serde(default)]
    positions: BTreeMap<MapKey, Point>,
}

fn default_scale() -> f64 {
    1.0
}

impl From<&ProjectState> for ProjectFile {
    fn from(state: &ProjectState) -> Self {
        Self {
            version: PROJECT_VERSION,
            name: state.name.clone(),
            active_map: state.active_map.clone(),
            drawings: StoredDrawings::ByMap(state.drawings.clone()),
            items: state
                .items
                .iter()
                .map(|item| StoredItem {
                    id: item.id,
                    kind: item.kind,
                    content: item.content.clone(),
                    scale: item.scale,
                    style: Some(item.style),
                    positions: item.positions.clone(),
                })
                .collect(),
        }
    }
}

impl ProjectFile {
    fn migrate(self) -> ProjectState {
        let active_map = self.active_map.filter(|m| !m.is_empty());

        let drawings = match self.drawings {
            StoredDrawings::ByMap(by_map) => by_map,
            StoredDrawings::Flat(list) => {
                log::warn!(
                    "Project '{}' (v{}) has a flat drawing list; assigning {} element(s) to {:?}",
                    self.name,
                    self.version,
                    list.len(),
                    active_map.as_ref().map(MapKey::as_str)
                );
                let mut by_map = BTreeMap::new();
                match &active_map {
                    Some(map) if !list.is_empty() => {
                        by_map.insert(map.clone(), list);
                    }
                    Some(_) => {}
                    None if list.is_empty() => {}
                    None => log::warn!("No active map to hold legacy drawings; dropping them"),
                }
                by_map
            }
        };

        let items = self
            .items
            .into_iter()
            .filter(|item| {
                let keep = !item.positions.is_empty();
                if !keep {
                    log::warn!("Dropping item {} with no map positions", item.id);
                }
                keep
            })
            .map(|item| MapItem {
                id: item.id,
                kind: item.kind,
                content: item.content,
                scale: item.scale,
                style: item.style.unwrap_or_default(),
                positions: item.positions,
            })
            .collect();

        ProjectState {
            name: self.name,
            active_map,
            drawings,
            items,
        }
    }
}
