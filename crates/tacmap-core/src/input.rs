//! Pointer input for mouse and touch.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are client (screen) pixels. `Up` carries no position: it is
/// delivered by a window-level listener and may happen outside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, source: PointerSource },
    Move { position: Point, source: PointerSource },
    Up { source: PointerSource },
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        PointerEvent::Down {
            position: Point::new(x, y),
            source: PointerSource::Mouse,
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        PointerEvent::Move {
            position: Point::new(x, y),
            source: PointerSource::Mouse,
        }
    }

    pub fn up() -> Self {
        PointerEvent::Up {
            source: PointerSource::Mouse,
        }
    }

    /// Touch variant of this event.
    pub fn into_touch(self) -> Self {
        match self {
            PointerEvent::Down { position, .. } => PointerEvent::Down {
                position,
                source: PointerSource::Touch,
            },
            PointerEvent::Move { position, .. } => PointerEvent::Move {
                position,
                source: PointerSource::Touch,
            },
            PointerEvent::Up { .. } => PointerEvent::Up {
                source: PointerSource::Touch,
            },
        }
    }

    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position, .. } | PointerEvent::Move { position, .. } => Some(*position),
            PointerEvent::Up { .. } => None,
        }
    }

    pub fn source(&self) -> PointerSource {
        match self {
            PointerEvent::Down { source, .. }
            | PointerEvent::Move { source, .. }
            | PointerEvent::Up { source } => *source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_conversion_keeps_position() {
        let event = PointerEvent::moved(4.0, 5.0).into_touch();
        assert_eq!(event.source(), PointerSource::Touch);
        assert_eq!(event.position(), Some(Point::new(4.0, 5.0)));
        assert_eq!(PointerEvent::up().position(), None);
    }
}
