//! Per-map collection of drawn elements.

use super::{DrawElement, DrawKind, SerializableColor, ShapeId};
use crate::maps::MapKey;
use kurbo::Point;
use std::collections::BTreeMap;

/// Drawn elements grouped by map, each list in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeStore {
    by_map: BTreeMap<MapKey, Vec<DrawElement>>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted per-map collections.
    pub fn from_map(by_map: BTreeMap<MapKey, Vec<DrawElement>>) -> Self {
        Self { by_map }
    }

    /// Start a new element on `map`. Returns `None` when no map is selected.
    pub fn begin_shape(
        &mut self,
        map: &MapKey,
        kind: DrawKind,
        origin: Point,
        color: SerializableColor,
        stroke_width: f64,
    ) -> Option<ShapeId> {
        if map.is_empty() {
            return None;
        }
        let element = DrawElement::new(kind, origin, color, stroke_width);
        let id = element.id;
        log::debug!("Begin {:?} {} on {}", kind, id, map);
        self.by_map.entry(map.clone()).or_default().push(element);
        Some(id)
    }

    /// Append an already complete element (text annotations).
    pub fn push(&mut self, map: &MapKey, element: DrawElement) -> Option<ShapeId> {
        if map.is_empty() {
            return None;
        }
        let id = element.id;
        self.by_map.entry(map.clone()).or_default().push(element);
        Some(id)
    }

    /// Feed a gesture point to the element being drawn.
    /// Returns `false` if the element does not exist on `map`.
    pub fn extend_shape(&mut self, map: &MapKey, id: ShapeId, point: Point) -> bool {
        match self.get_mut(map, id) {
            Some(element) => {
                element.extend_to(point);
                true
            }
            None => false,
        }
    }

    /// Remove every element on `map` hit by the eraser at `point`.
    pub fn erase_at(&mut self, map: &MapKey, point: Point, threshold: f64) -> Vec<ShapeId> {
        let Some(elements) = self.by_map.get_mut(map) else {
            return Vec::new();
        };
        let mut removed = Vec::new();
        elements.retain(|el| {
            let hit = el.hit_by_eraser(point, threshold);
            if hit {
                removed.push(el.id);
            }
            !hit
        });
        if !removed.is_empty() {
            log::debug!("Erased {} element(s) on {}", removed.len(), map);
        }
        removed
    }

    /// Drop every element on `map`. Returns how many were removed.
    pub fn clear_map(&mut self, map: &MapKey) -> usize {
        self.by_map.remove(map).map(|v| v.len()).unwrap_or(0)
    }

    pub fn get(&self, map: &MapKey, id: ShapeId) -> Option<&DrawElement> {
        self.by_map.get(map)?.iter().find(|el| el.id == id)
    }

    pub fn get_mut(&mut self, map: &MapKey, id: ShapeId) -> Option<&mut DrawElement> {
        self.by_map.get_mut(map)?.iter_mut().find(|el| el.id == id)
    }

    /// Elements on `map` in drawing order.
    pub fn shapes(&self, map: &MapKey) -> &[DrawElement] {
        self.by_map.get(map).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All per-map collections.
    pub fn by_map(&self) -> &BTreeMap<MapKey, Vec<DrawElement>> {
        &self.by_map
    }

    pub fn into_map(self) -> BTreeMap<MapKey, Vec<DrawElement>> {
        self.by_map
    }

    /// Total number of elements across all maps.
    pub fn len(&self) -> usize {
        self.by_map.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
