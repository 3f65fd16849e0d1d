//! Global item list.

use super::{DEFAULT_ITEM_POSITION, ItemError, ItemId, ItemKind, ItemStyle, MapItem, validate_logo};
use crate::coords::to_pixels;
use crate::maps::MapKey;
use kurbo::{Point, Size};

/// Result of removing an item from one map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The item was not on that map (or does not exist).
    NotPresent,
    /// Removed from the map; still visible elsewhere.
    Removed,
    /// Removed from its last map and deleted.
    Purged,
}

/// All items across all maps, in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStore {
    items: Vec<MapItem>,
    max_items: usize,
}

impl ItemStore {
    pub fn new(max_items: usize) -> Self {
        Self { items: Vec::new(), max_items }
    }

    /// Replace the whole list (project load). Items without positions are dropped.
    pub fn replace_all(&mut self, items: Vec<MapItem>) {
        self.items = items;
        self.items.retain(|item| !item.positions.is_empty());
    }

    /// Add an item centered on each map in `maps`.
    pub fn add(
        &mut self,
        kind: ItemKind,
        content: String,
        style: ItemStyle,
        maps: impl IntoIterator<Item = MapKey>,
    ) -> Result<ItemId, ItemError> {
        if self.items.len() >= self.max_items {
            return Err(ItemError::LimitReached(self.max_items));
        }
        let content = match kind {
            ItemKind::Label => content.trim().to_string(),
            ItemKind::Logo => content,
        };
        if content.is_empty() {
            return Err(ItemError::EmptyContent);
        }
        if kind == ItemKind::Logo {
            validate_logo(&content)?;
        }
        let item = MapItem::new(kind, content, style, maps.into_iter().filter(|m| !m.is_empty()));
        if item.positions.is_empty() {
            return Err(ItemError::NoTargetMaps);
        }
        let id = item.id;
        log::debug!("Added {:?} item {} on {} map(s)", kind, id, item.positions.len());
        self.items.push(item);
        Ok(id)
    }

    /// Move an item on one map. Does nothing unless the item is already on `map`.
    pub fn move_item(&mut self, id: ItemId, map: &MapKey, position: Point) -> bool {
        let Some(slot) = self.get_mut(id).and_then(|item| item.positions.get_mut(map)) else {
            return false;
        };
        *slot = Point::new(position.x.clamp(0.0, 100.0), position.y.clamp(0.0, 100.0));
        true
    }

    /// Place an item on another map at the default position. Existing positions are kept.
    pub fn import_to_map(&mut self, id: ItemId, map: &MapKey) -> bool {
        if map.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(item) if !item.positions.contains_key(map) => {
                item.positions.insert(map.clone(), DEFAULT_ITEM_POSITION);
                true
            }
            _ => false,
        }
    }

    /// Remove an item from one map, deleting it when no map is left.
    pub fn remove_from_map(&mut self, id: ItemId, map: &MapKey) -> RemoveOutcome {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return RemoveOutcome::NotPresent;
        };
        if self.items[index].positions.remove(map).is_none() {
            return RemoveOutcome::NotPresent;
        }
        if self.items[index].positions.is_empty() {
            self.items.remove(index);
            log::debug!("Item {} left its last map and was deleted", id);
            RemoveOutcome::Purged
        } else {
            RemoveOutcome::Removed
        }
    }

    /// Delete an item from every map.
    pub fn remove_everywhere(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        before != self.items.len()
    }

    /// Change the text of a label on all maps at once.
    pub fn rename(&mut self, id: ItemId, content: &str) -> Result<(), ItemError> {
        let item = self.get_mut(id).ok_or(ItemError::NotFound)?;
        if !item.is_label() {
            return Err(ItemError::NotALabel);
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(ItemError::EmptyContent);
        }
        item.content = content.to_string();
        Ok(())
    }

    pub fn set_style(&mut self, id: ItemId, style: ItemStyle) -> Result<(), ItemError> {
        let item = self.get_mut(id).ok_or(ItemError::NotFound)?;
        item.style = style;
        Ok(())
    }

    /// Put an item back at the default position on `map`, if it is there.
    pub fn reset_position(&mut self, id: ItemId, map: &MapKey) -> bool {
        self.move_item(id, map, DEFAULT_ITEM_POSITION)
    }

    /// Remove from `map` every item positioned within `threshold` of `point`.
    pub fn erase_near(&mut self, map: &MapKey, point: Point, threshold: f64) -> Vec<ItemId> {
        let hits: Vec<ItemId> = self
            .visible_on(map)
            .filter(|item| item.position(map).is_some_and(|p| p.distance(point) <= threshold))
            .map(|item| item.id)
            .collect();
        for id in &hits {
            self.remove_from_map(*id, map);
        }
        hits
    }

    /// Topmost item on `map` whose drawn box, grown by `slop` pixels,
    /// contains `point`.
    ///
    /// The test runs in pixels on a `surface`-sized canvas, where items
    /// are drawn at a fixed size regardless of the map's aspect ratio.
    pub fn item_at(&self, map: &MapKey, point: Point, surface: Size, slop: f64) -> Option<ItemId> {
        let press = to_pixels(point, surface.width, surface.height);
        self.items
            .iter()
            .rev()
            .find(|item| {
                item.position(map).is_some_and(|position| {
                    let center = to_pixels(position, surface.width, surface.height);
                    let (half_w, half_h) = item.half_extent(1.0);
                    (press.x - center.x).abs() <= half_w + slop && (press.y - center.y).abs() <= half_h + slop
                })
            })
            .map(|item| item.id)
    }

    pub fn get(&self, id: ItemId) -> Option<&MapItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: ItemId) -> Option<&mut MapItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Items placed on `map`.
    pub fn visible_on<'a>(&'a self, map: &'a MapKey) -> impl Iterator<Item = &'a MapItem> + 'a {
        self.items.iter().filter(move |item| item.is_visible_on(map))
    }

    /// Items that exist elsewhere but not on `map`.
    pub fn importable_to<'a>(&'a self, map: &'a MapKey) -> impl Iterator<Item = &'a MapItem> + 'a {
        self.items.iter().filter(move |item| !item.is_visible_on(map))
    }

    /// Number of distinct text labels on `map`.
    pub fn label_count_on(&self, map: &MapKey) -> usize {
        self.visible_on(map).filter(|item| item.is_label()).count()
    }

    pub fn items(&self) -> &[MapItem] {
        &self.items
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
