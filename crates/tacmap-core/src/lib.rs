//! TacMap Core Library
//!
//! Platform-agnostic state and logic for annotating battle maps: per-map
//! drawings, cross-map items, tools, zoom and project persistence.

pub mod canvas;
pub mod config;
pub mod coords;
pub mod input;
pub mod items;
pub mod maps;
pub mod project;
pub mod shapes;
pub mod storage;
pub mod tools;
pub mod zoom;

pub use canvas::{BoardError, BoardResult, InteractionOutcome, MapBoard};
pub use config::{ASPECT_RATIO, BoardConfig};
pub use coords::{ViewportQuery, map_pointer, to_percent, to_pixels};
pub use input::{PointerEvent, PointerSource};
pub use items::{ItemError, ItemId, ItemKind, ItemStore, ItemStyle, ItemTarget, MapItem, RemoveOutcome};
pub use maps::{MapEntry, MapKey, MapRegistry, default_registry};
pub use project::{ProjectDump, ProjectState};
pub use shapes::{DrawElement, DrawKind, Geometry, GeometryParams, SerializableColor, ShapeId, ShapeStore};
pub use storage::{KeyValueStorage, MemoryStorage, ProjectStore, SaveOutcome, StorageError, StorageResult};
pub use tools::{Session, StrokeSettings, ToolKind, ToolManager};
pub use zoom::Zoom;
