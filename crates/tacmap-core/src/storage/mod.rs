//! Persistence for named projects.
//!
//! Projects are JSON documents kept in a string-valued key-value store
//! (browser local storage, a directory, or memory). Keys are namespaced
//! as `<namespace>:project:<name>`, and `<namespace>:projects` holds the
//! JSON list of saved names so hosts can offer a load list.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use crate::project::ProjectState;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Project name cannot be empty")]
    InvalidName,
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous string key-value store.
///
/// On native platforms implementations must be Send + Sync.
#[cfg(not(target_arch = "wasm32"))]
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Synchronous string key-value store (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// What a save did to the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// A project with the same name was replaced.
    pub overwritten: bool,
}

/// Named project slots on top of a [`KeyValueStorage`].
pub struct ProjectStore<S> {
    storage: S,
    namespace: String,
}

impl<S: KeyValueStorage> ProjectStore<S> {
    pub fn new(storage: S, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn project_key(&self, name: &str) -> String {
        format!("{}:project:{}", self.namespace, name)
    }

    fn index_key(&self) -> String {
        format!("{}:projects", self.namespace)
    }

    fn read_index(&self) -> StorageResult<Vec<String>> {
        let Some(json) = self.storage.get(&self.index_key())? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<String>>(&json) {
            Ok(names) => Ok(names),
            Err(e) => {
                log::warn!("Project index is unreadable ({}); starting a new one", e);
                Ok(Vec::new())
            }
        }
    }

    fn write_index(&self, mut names: Vec<String>) -> StorageResult<()> {
        names.sort();
        names.dedup();
        self.storage.set(&self.index_key(), &serde_json::to_string(&names)?)
    }

    /// Save `state` under `name`, replacing any project with that name.
    pub fn save(&self, name: &str, state: &ProjectState) -> StorageResult<SaveOutcome> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidName);
        }
        let mut state = state.clone();
        state.name = name.to_string();
        let json = state.to_json()?;

        let key = self.project_key(name);
        let overwritten = self.storage.get(&key)?.is_some();
        self.storage.set(&key, &json)?;
        let mut names = self.read_index()?;
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
            self.write_index(names)?;
        }
        log::info!("Saved project '{}' (overwritten: {})", name, overwritten);
        Ok(SaveOutcome { overwritten })
    }

    /// Load a project, migrating older layouts.
    pub fn load(&self, name: &str) -> StorageResult<ProjectState> {
        let name = name.trim();
        let json = self
            .storage
            .get(&self.project_key(name))?
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;
        let state = ProjectState::from_json(&json)?;
        log::info!("Loaded project '{}'", name);
        Ok(state)
    }

    /// Saved project names, sorted.
    pub fn list(&self) -> StorageResult<Vec<String>> {
        let mut names = self.read_index()?;
        names.sort();
        Ok(names)
    }

    pub fn exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self.storage.get(&self.project_key(name.trim()))?.is_some())
    }

    pub fn delete(&self, name: &str) -> StorageResult<()> {
        let name = name.trim();
        self.storage.remove(&self.project_key(name))?;
        let names: Vec<String> = self.read_index()?.into_iter().filter(|n| n != name).collect();
        self.write_index(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::MapKey;
    use crate::shapes::{DrawElement, DrawKind, SerializableColor};
    use kurbo::Point;
    use std::collections::BTreeMap;

    fn store() -> ProjectStore<MemoryStorage> {
        ProjectStore::new(MemoryStorage::new(), "tacmap")
    }

    fn state() -> ProjectState {
        let rect = DrawElement::new(DrawKind::Rect, Point::new(5.0, 5.0), SerializableColor::black(), 2.0);
        ProjectState {
            name: String::new(),
            active_map: Some(MapKey::from("Alpine")),
            drawings: BTreeMap::from([(MapKey::from("Alpine"), vec![rect])]),
            items: Vec::new(),
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let store = store();
        let saved = state();
        let outcome = store.save("Finals", &saved).unwrap();
        assert!(!outcome.overwritten);

        let loaded = store.load("Finals").unwrap();
        assert_eq!(loaded.name, "Finals");
        assert_eq!(loaded.active_map, saved.active_map);
        assert_eq!(loaded.drawings, saved.drawings);
    }

    #[test]
    fn test_overwrite_is_reported() {
        let store = store();
        store.save("Finals", &state()).unwrap();
        let outcome = store.save("Finals", &ProjectState::default()).unwrap();
        assert!(outcome.overwritten);
        assert_eq!(store.list().unwrap(), vec!["Finals".to_string()]);
        assert!(store.load("Finals").unwrap().drawings.is_empty());
    }

    #[test]
    fn test_list_sorted_and_delete() {
        let store = store();
        store.save("b", &state()).unwrap();
        store.save("a", &state()).unwrap();
        assert_eq!(store.list().unwrap(), vec!["a".to_string(), "b".to_string()]);

        store.delete("a").unwrap();
        assert!(!store.exists("a").unwrap());
        assert!(store.exists("b").unwrap());
        assert_eq!(store.list().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn test_slots_are_independent() {
        let store = store();
        store.save("one", &state()).unwrap();
        store.save("two", &ProjectState::default()).unwrap();
        assert_eq!(store.load("one").unwrap().drawings.len(), 1);
    }

    #[test]
    fn test_errors() {
        let store = store();
        assert!(matches!(store.load("missing"), Err(StorageError::NotFound(_))));
        assert!(matches!(store.save("  ", &state()), Err(StorageError::InvalidName)));
    }

    #[test]
    fn test_corrupt_index_recovers() {
        let store = store();
        store.storage().set("tacmap:projects", "not json").unwrap();
        assert!(store.list().unwrap().is_empty());
        store.save("x", &state()).unwrap();
        assert_eq!(store.list().unwrap(), vec!["x".to_string()]);
    }

    #[test]
    fn test_overwrite_detected_without_index() {
        let store = store();
        store.save("Finals", &state()).unwrap();
        store.storage().set("tacmap:projects", "not json").unwrap();
        assert!(store.save("Finals", &state()).unwrap().overwritten);
        assert_eq!(store.list().unwrap(), vec!["Finals".to_string()]);
    }

    #[test]
    fn test_pointer_mapped_coordinates_reload_exactly() {
        use crate::canvas::MapBoard;
        use crate::input::PointerEvent;
        use crate::tools::ToolKind;
        use kurbo::Rect;

        let viewport = Rect::new(3.3, 7.7, 1003.67, 570.81);
        let mut board = MapBoard::default();
        board.select_map("Alpine").unwrap();
        board.set_tool(ToolKind::Freehand);
        board.handle_pointer(&viewport, PointerEvent::down(4.1, 9.3));
        for i in 0..500 {
            let t = i as f64;
            board.handle_pointer(&viewport, PointerEvent::moved(5.0 + t * 1.97, 8.0 + t * 1.13));
        }
        board.handle_pointer(&viewport, PointerEvent::up());
        board.set_tool(ToolKind::Arrow);
        board.handle_pointer(&viewport, PointerEvent::down(333.3, 222.2));
        board.handle_pointer(&viewport, PointerEvent::moved(777.7, 444.4));
        board.handle_pointer(&viewport, PointerEvent::up());

        board.set_project_name("Precise");
        let store = store();
        let saved = board.snapshot_state();
        store.save("Precise", &saved).unwrap();
        let loaded = store.load("Precise").unwrap();
        assert_eq!(loaded.drawings, saved.drawings);

        let mut reloaded = MapBoard::default();
        reloaded.restore_state(loaded);
        assert_eq!(reloaded.snapshot_state(), board.snapshot_state());
    }
}
