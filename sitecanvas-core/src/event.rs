//! Input events for canvas interaction.

use serde::{Deserialize, Serialize};

use crate::ElementId;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// Pointer capture lost (e.g., window blur).
    Cancel,
}

/// One of the eight resize handles around a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    /// Top edge.
    N,
    /// Bottom edge.
    S,
    /// Right edge.
    E,
    /// Left edge.
    W,
    /// Top-right corner.
    Ne,
    /// Top-left corner.
    Nw,
    /// Bottom-right corner.
    Se,
    /// Bottom-left corner.
    Sw,
}

impl ResizeHandle {
    /// All handles, clockwise from the top edge.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
        ResizeHandle::Nw,
    ];

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Whether dragging this handle moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    /// Whether dragging this handle moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }
}

/// What the pointer was over when the event fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PointerTarget {
    /// Empty canvas background.
    Canvas,
    /// The body of an element.
    Body {
        /// Element under the pointer.
        element: ElementId,
    },
    /// The move handle shown on a selected element.
    MoveHandle {
        /// Element owning the handle.
        element: ElementId,
    },
    /// A resize handle shown on a selected element.
    ResizeHandle {
        /// Element owning the handle.
        element: ElementId,
        /// Which handle.
        handle: ResizeHandle,
    },
}

/// A pointer event in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position in canvas pixels.
    pub x: i32,
    /// Y position in canvas pixels.
    pub y: i32,
    /// Hit target.
    pub target: PointerTarget,
}

impl PointerEvent {
    /// Pointer pressed over `target`.
    #[must_use]
    pub fn down(x: i32, y: i32, target: PointerTarget) -> Self {
        Self {
            phase: PointerPhase::Down,
            x,
            y,
            target,
        }
    }

    /// Pointer moved. Targets are irrelevant once a gesture has started.
    #[must_use]
    pub fn moved(x: i32, y: i32) -> Self {
        Self {
            phase: PointerPhase::Move,
            x,
            y,
            target: PointerTarget::Canvas,
        }
    }

    /// Pointer released.
    #[must_use]
    pub fn up(x: i32, y: i32) -> Self {
        Self {
            phase: PointerPhase::Up,
            x,
            y,
            target: PointerTarget::Canvas,
        }
    }

    /// Pointer capture lost.
    #[must_use]
    pub fn cancel() -> Self {
        Self {
            phase: PointerPhase::Cancel,
            x: 0,
            y: 0,
            target: PointerTarget::Canvas,
        }
    }
}

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyModifiers {
    /// Shift held.
    #[serde(default)]
    pub shift: bool,
    /// Control held.
    #[serde(default)]
    pub ctrl: bool,
    /// Alt/Option held.
    #[serde(default)]
    pub alt: bool,
    /// Meta/Command held.
    #[serde(default)]
    pub meta: bool,
}

/// A keyboard event, `key` using DOM key names (`Delete`, `ArrowLeft`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key name.
    pub key: String,
    /// Held modifiers.
    #[serde(default)]
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// Key pressed without modifiers.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: KeyModifiers::default(),
        }
    }

    /// Key pressed with shift held.
    #[must_use]
    pub fn shifted(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: KeyModifiers {
                shift: true,
                ..KeyModifiers::default()
            },
        }
    }
}

/// Any input the editor session reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputEvent {
    /// Pointer input.
    Pointer(PointerEvent),
    /// Keyboard input.
    Key(KeyEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_edges() {
        for handle in ResizeHandle::ALL {
            assert!(!(handle.moves_left() && handle.moves_right()));
            assert!(!(handle.moves_top() && handle.moves_bottom()));
        }
        assert!(ResizeHandle::Nw.moves_left() && ResizeHandle::Nw.moves_top());
        assert!(ResizeHandle::Se.moves_right() && ResizeHandle::Se.moves_bottom());
    }

    #[test]
    fn test_pointer_event_serde() {
        let event = InputEvent::Pointer(PointerEvent::down(
            10,
            20,
            PointerTarget::ResizeHandle {
                element: ElementId::parse("abc").expect("id"),
                handle: ResizeHandle::Sw,
            },
        ));
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"handle\":\"sw\""));
        assert!(json.contains("\"phase\":\"down\""));
        let back: InputEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn test_key_event_defaults_modifiers() {
        let event: KeyEvent = serde_json::from_str(r#"{"key":"Escape"}"#).expect("parse");
        assert_eq!(event, KeyEvent::new("Escape"));
    }
}
