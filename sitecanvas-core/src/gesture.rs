//! Drag and resize gesture state machine.
//!
//! At most one gesture is active at a time. Each pointer move produces an
//! [`ElementPatch`] for the element being manipulated; the session applies it
//! to the canvas.

use crate::element::{Element, ElementId, ElementPatch, Position, Size, MIN_HEIGHT, MIN_WIDTH};
use crate::event::ResizeHandle;

/// An in-progress move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    /// Element being moved.
    pub element: ElementId,
    /// Pointer offset from the element's top-left corner at press time.
    pub grab_offset: (i32, i32),
    /// Position before the gesture started.
    pub origin: Position,
    /// Size before the gesture started.
    pub origin_size: Size,
}

impl DragState {
    /// Begin dragging `element` with the pointer at `(x, y)`.
    #[must_use]
    pub fn start(element: &Element, x: i32, y: i32) -> Self {
        Self {
            element: element.id.clone(),
            grab_offset: (
                x.saturating_sub(element.position.x),
                y.saturating_sub(element.position.y),
            ),
            origin: element.position,
            origin_size: element.size,
        }
    }

    /// Position for a pointer at `(x, y)`, clamped to the canvas.
    #[must_use]
    pub fn position_at(&self, x: i32, y: i32) -> Position {
        Position::new(
            x.saturating_sub(self.grab_offset.0),
            y.saturating_sub(self.grab_offset.1),
        )
        .clamped()
    }
}

/// An in-progress resize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeState {
    /// Element being resized.
    pub element: ElementId,
    /// Handle being dragged.
    pub handle: ResizeHandle,
    /// Pointer position at press time.
    pub start_pointer: (i32, i32),
    /// Position before the gesture started.
    pub origin: Position,
    /// Size before the gesture started.
    pub origin_size: Size,
}

impl ResizeState {
    /// Begin resizing `element` from `handle` with the pointer at `(x, y)`.
    #[must_use]
    pub fn start(element: &Element, handle: ResizeHandle, x: i32, y: i32) -> Self {
        Self {
            element: element.id.clone(),
            handle,
            start_pointer: (x, y),
            origin: element.position,
            origin_size: element.size,
        }
    }

    /// Geometry for a pointer at `(x, y)`.
    #[must_use]
    pub fn geometry_at(&self, x: i32, y: i32) -> (Position, Size) {
        resize(
            self.handle,
            self.origin,
            self.origin_size,
            x.saturating_sub(self.start_pointer.0),
            y.saturating_sub(self.start_pointer.1),
        )
    }
}

/// Apply a resize delta to a starting rectangle.
///
/// Width and height never drop below the minimum. When a handle moves the
/// left or top edge, the dimension is also capped so that edge stops at the
/// canvas origin; the opposite edge never moves.
#[must_use]
pub fn resize(handle: ResizeHandle, origin: Position, size: Size, dx: i32, dy: i32) -> (Position, Size) {
    let (x, y, w, h) = (origin.x, origin.y, size.width, size.height);

    let mut width = if handle.moves_right() {
        w.saturating_add(dx)
    } else if handle.moves_left() {
        w.saturating_sub(dx)
    } else {
        w
    };
    width = width.max(MIN_WIDTH);
    if handle.moves_left() {
        width = width.min(x.saturating_add(w).max(MIN_WIDTH));
    }

    let mut height = if handle.moves_bottom() {
        h.saturating_add(dy)
    } else if handle.moves_top() {
        h.saturating_sub(dy)
    } else {
        h
    };
    height = height.max(MIN_HEIGHT);
    if handle.moves_top() {
        height = height.min(y.saturating_add(h).max(MIN_HEIGHT));
    }

    let new_x = if handle.moves_left() {
        x.saturating_add(w).saturating_sub(width)
    } else {
        x
    };
    let new_y = if handle.moves_top() {
        y.saturating_add(h).saturating_sub(height)
    } else {
        y
    };

    (Position::new(new_x, new_y), Size::new(width, height))
}

/// The active gesture of an editor session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Gesture {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Moving an element.
    Dragging(DragState),
    /// Resizing an element.
    Resizing(ResizeState),
}

impl Gesture {
    /// Whether a drag or resize is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Element being manipulated, if any.
    #[must_use]
    pub fn element(&self) -> Option<&ElementId> {
        match self {
            Self::Idle => None,
            Self::Dragging(state) => Some(&state.element),
            Self::Resizing(state) => Some(&state.element),
        }
    }

    /// Update for a pointer at `(x, y)`.
    #[must_use]
    pub fn step(&self, x: i32, y: i32) -> Option<(ElementId, ElementPatch)> {
        match self {
            Self::Idle => None,
            Self::Dragging(state) => Some((
                state.element.clone(),
                ElementPatch::position(state.position_at(x, y)),
            )),
            Self::Resizing(state) => {
                let (position, size) = state.geometry_at(x, y);
                Some((state.element.clone(), ElementPatch::geometry(position, size)))
            }
        }
    }

    /// Update that puts the element back where it was before the gesture.
    #[must_use]
    pub fn restore(&self) -> Option<(ElementId, ElementPatch)> {
        match self {
            Self::Idle => None,
            Self::Dragging(state) => Some((
                state.element.clone(),
                ElementPatch::geometry(state.origin, state.origin_size),
            )),
            Self::Resizing(state) => Some((
                state.element.clone(),
                ElementPatch::geometry(state.origin, state.origin_size),
            )),
        }
    }
}
