//! Tool selection and gesture session state.

use crate::items::ItemId;
use crate::maps::MapKey;
use crate::shapes::{DrawKind, SerializableColor, ShapeId};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Available tools. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    #[default]
    Select,
    Freehand,
    Line,
    Arrow,
    Rect,
    Circle,
    CircleOutline,
    Text,
    Eraser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        ToolKind::Select,
        ToolKind::Freehand,
        ToolKind::Line,
        ToolKind::Arrow,
        ToolKind::Rect,
        ToolKind::Circle,
        ToolKind::CircleOutline,
        ToolKind::Text,
        ToolKind::Eraser,
    ];

    /// The primitive a drag with this tool produces.
    pub fn draw_kind(self) -> Option<DrawKind> {
        match self {
            ToolKind::Freehand => Some(DrawKind::Freehand),
            ToolKind::Line => Some(DrawKind::Line),
            ToolKind::Arrow => Some(DrawKind::Arrow),
            ToolKind::Rect => Some(DrawKind::Rect),
            ToolKind::Circle => Some(DrawKind::Circle),
            ToolKind::CircleOutline => Some(DrawKind::CircleOutline),
            ToolKind::Select | ToolKind::Text | ToolKind::Eraser => None,
        }
    }

    /// Whether the interaction-capture layer swallows pointer events.
    ///
    /// In select mode presses must reach the items underneath.
    pub fn captures_pointer(self) -> bool {
        self != ToolKind::Select
    }

    /// Whether items can be dragged.
    pub fn allows_drag(self) -> bool {
        self == ToolKind::Select
    }

    pub fn label(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Freehand => "Pen",
            ToolKind::Line => "Line",
            ToolKind::Arrow => "Arrow",
            ToolKind::Rect => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::CircleOutline => "Circle outline",
            ToolKind::Text => "Text",
            ToolKind::Eraser => "Eraser",
        }
    }
}

/// The gesture currently in progress.
///
/// Draw, drag and erase sessions are mutually exclusive: only one of
/// them can be tracked at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Idle,
    /// A shape is being drawn and receives every move.
    Drawing { map: MapKey, shape: ShapeId },
    /// An item is being dragged on `map`, keeping `grab` between the
    /// pointer and the item's position.
    Dragging { map: MapKey, item: ItemId, grab: Vec2 },
    /// Every move erases at the pointer.
    Erasing { map: MapKey },
    /// The text tool was pressed and waits for the user to type.
    AwaitingText { map: MapKey, origin: Point },
}

impl Session {
    pub fn is_idle(&self) -> bool {
        matches!(self, Session::Idle)
    }

    /// Whether pointer moves should be routed anywhere.
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            Session::Drawing { .. } | Session::Dragging { .. } | Session::Erasing { .. }
        )
    }

    /// Shape being drawn, if any.
    pub fn current_shape(&self) -> Option<ShapeId> {
        match self {
            Session::Drawing { shape, .. } => Some(*shape),
            _ => None,
        }
    }

    /// Item being dragged, if any.
    pub fn dragging_item(&self) -> Option<ItemId> {
        match self {
            Session::Dragging { item, .. } => Some(*item),
            _ => None,
        }
    }
}

/// Stroke settings applied to new shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeSettings {
    pub color: SerializableColor,
    pub width: f64,
}

/// Manages the current tool and its session.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Gesture in progress.
    pub session: Session,
    /// Settings for the next shape.
    pub stroke: StrokeSettings,
}

impl ToolManager {
    pub fn new(stroke: StrokeSettings) -> Self {
        Self {
            current_tool: ToolKind::default(),
            session: Session::Idle,
            stroke,
        }
    }

    /// Switch tools. Any unfinished session is dropped.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if !self.session.is_idle() {
            log::debug!("Tool change to {:?} ends {:?}", tool, self.session);
        }
        self.current_tool = tool;
        self.session = Session::Idle;
    }

    /// Start tracking a session.
    pub fn begin(&mut self, session: Session) {
        log::debug!("Session start: {:?}", session);
        self.session = session;
    }

    /// End whatever gesture is active, returning it.
    ///
    /// A pending text prompt is not a gesture and survives pointer release.
    pub fn end_gesture(&mut self) -> Session {
        if self.session.is_gesture() {
            let ended = std::mem::take(&mut self.session);
            log::debug!("Session end: {:?}", ended);
            ended
        } else {
            Session::Idle
        }
    }

    /// Take a pending text prompt out of the session.
    pub fn take_text_prompt(&mut self) -> Option<(MapKey, Point)> {
        match std::mem::take(&mut self.session) {
            Session::AwaitingText { map, origin } => Some((map, origin)),
            other => {
                self.session = other;
                None
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_gesture()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn manager() -> ToolManager {
        ToolManager::new(StrokeSettings {
            color: SerializableColor::black(),
            width: 3.0,
        })
    }

    #[test]
    fn test_tool_selection() {
        let mut tm = manager();
        assert_eq!(tm.current_tool, ToolKind::Select);
        tm.set_tool(ToolKind::Rect);
        assert_eq!(tm.current_tool, ToolKind::Rect);
        assert_eq!(tm.current_tool.draw_kind(), Some(DrawKind::Rect));
    }

    #[test]
    fn test_set_tool_cancels_session() {
        let mut tm = manager();
        tm.begin(Session::Erasing { map: "Alpine".into() });
        tm.set_tool(ToolKind::Line);
        assert!(tm.session.is_idle());
    }

    #[test]
    fn test_end_gesture_clears_trackers() {
        let mut tm = manager();
        let shape = Uuid::new_v4();
        tm.begin(Session::Drawing { map: "Alpine".into(), shape });
        assert_eq!(tm.session.current_shape(), Some(shape));
        let ended = tm.end_gesture();
        assert_eq!(ended.current_shape(), Some(shape));
        assert!(tm.session.current_shape().is_none());
        assert!(tm.session.dragging_item().is_none());
    }

    #[test]
    fn test_text_prompt_survives_pointer_up() {
        let mut tm = manager();
        tm.begin(Session::AwaitingText { map: "Alpine".into(), origin: Point::new(1.0, 2.0) });
        assert_eq!(tm.end_gesture(), Session::Idle);
        assert_eq!(tm.take_text_prompt(), Some(("Alpine".into(), Point::new(1.0, 2.0))));
        assert!(tm.take_text_prompt().is_none());
    }

    #[test]
    fn test_pointer_capture_policy() {
        assert!(!ToolKind::Select.captures_pointer());
        for tool in ToolKind::ALL.into_iter().filter(|t| *t != ToolKind::Select) {
            assert!(tool.captures_pointer());
            assert!(!tool.allows_drag());
        }
    }
}
