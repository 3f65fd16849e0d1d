//! Map keys and the background map registry.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of one selectable background map.
///
/// All per-map state is keyed by this string. An empty key means
/// "no map selected".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapKey(String);

impl MapKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MapKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for MapKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for MapKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A registered background map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: MapKey,
    /// Image reference: a path relative to the asset directory, a URL or a data URI.
    pub image: String,
}

/// Ordered, read-only set of maps the board can annotate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRegistry {
    entries: Vec<MapEntry>,
}

impl MapRegistry {
    /// Build a registry from `(key, image)` pairs. Later duplicates are ignored.
    pub fn new<K, I>(maps: impl IntoIterator<Item = (K, I)>) -> Self
    where
        K: Into<MapKey>,
        I: Into<String>,
    {
        let mut entries: Vec<MapEntry> = Vec::new();
        for (key, image) in maps {
            let key = key.into();
            if key.is_empty() || entries.iter().any(|e| e.key == key) {
                log::warn!("Skipping empty or duplicate map key {:?}", key.as_str());
                continue;
            }
            entries.push(MapEntry { key, image: image.into() });
        }
        Self { entries }
    }

    pub fn contains(&self, key: &MapKey) -> bool {
        self.entries.iter().any(|e| &e.key == key)
    }

    pub fn get(&self, key: &MapKey) -> Option<&MapEntry> {
        self.entries.iter().find(|e| &e.key == key)
    }

    /// Background image reference for a map.
    pub fn image(&self, key: &MapKey) -> Option<&str> {
        self.get(key).map(|e| e.image.as_str())
    }

    /// Keys in registry order.
    pub fn keys(&self) -> impl Iterator<Item = &MapKey> {
        self.entries.iter().map(|e| &e.key)
    }

    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The standard map rotation shipped with the tool.
pub fn default_registry() -> MapRegistry {
    MapRegistry::new([
        ("Bermuda", "maps/bermuda.jpg"),
        ("Purgatory", "maps/purgatory.jpg"),
        ("Kalahari", "maps/kalahari.jpg"),
        ("Alpine", "maps/alpine.jpg"),
        ("NeXTerra", "maps/nexterra.jpg"),
        ("Solara", "maps/solara.jpg"),
    ])
}
