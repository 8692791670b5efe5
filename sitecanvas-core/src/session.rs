//! Editor session: canvas, selection, mode and the active gesture.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::{Element, ElementId, ElementKind, ElementPatch, Position};
use crate::event::{InputEvent, KeyEvent, PointerEvent, PointerPhase, PointerTarget};
use crate::gesture::{DragState, Gesture, ResizeState};
use crate::{Canvas, CanvasError, CanvasResult};

/// Pixels an arrow key moves the selection.
pub const NUDGE_STEP: i32 = 1;

/// Pixels an arrow key moves the selection with shift held.
pub const NUDGE_STEP_LARGE: i32 = 10;

/// How pointer presses on an element body are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// The element body is the drag surface.
    #[default]
    Drag,
    /// Pressing the body only selects; drag from the move handle.
    Click,
}

/// State of one open editor.
///
/// All mutation goes through `&mut self`; the session is not shared between
/// threads.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    canvas: Canvas,
    selected: Option<ElementId>,
    mode: InteractionMode,
    preview: bool,
    gesture: Gesture,
    /// Whether there are unsaved local changes.
    pub has_local_changes: bool,
}

impl EditorSession {
    /// Create a session over an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session over an existing canvas.
    #[must_use]
    pub fn with_canvas(canvas: Canvas) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }

    /// The canvas being edited.
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Currently selected element id.
    #[must_use]
    pub fn selected(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    /// Currently selected element.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected
            .as_ref()
            .and_then(|id| self.canvas.get_element(id))
    }

    /// Active gesture.
    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Current interaction mode.
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switch interaction mode.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    /// Whether editing is disabled for previewing.
    #[must_use]
    pub fn is_preview(&self) -> bool {
        self.preview
    }

    /// Enter or leave preview mode. Entering clears the selection and aborts
    /// any gesture.
    pub fn set_preview(&mut self, preview: bool) {
        if preview {
            self.cancel_gesture();
            self.selected = None;
        }
        self.preview = preview;
    }

    /// Drop a palette item at `pointer` and select it.
    pub fn place(&mut self, kind: ElementKind, pointer: Position) -> ElementId {
        let id = self.canvas.place(kind, pointer);
        self.selected = Some(id.clone());
        self.has_local_changes = true;
        id
    }

    /// Select an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn select(&mut self, id: &ElementId) -> CanvasResult<()> {
        if !self.canvas.contains(id) {
            return Err(CanvasError::ElementNotFound(id.to_string()));
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Merge a partial update into an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> CanvasResult<()> {
        self.canvas.update_element(id, patch)?;
        self.has_local_changes = true;
        Ok(())
    }

    /// Delete an element, clearing the selection if it pointed at it.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn delete(&mut self, id: &ElementId) -> CanvasResult<Element> {
        let removed = self.canvas.remove_element(id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.gesture.element() == Some(id) {
            self.gesture = Gesture::Idle;
        }
        self.has_local_changes = true;
        debug!(id = %id, "Deleted element");
        Ok(removed)
    }

    /// Duplicate the selected element and select the copy.
    pub fn duplicate_selected(&mut self) -> Option<ElementId> {
        let source = self.selected.clone()?;
        let copy = self.canvas.duplicate(&source).ok()?;
        self.selected = Some(copy.clone());
        self.has_local_changes = true;
        Some(copy)
    }

    /// Move the selected element to the top of the z-order.
    pub fn bring_selected_to_front(&mut self) -> bool {
        let Some(id) = self.selected.clone() else {
            return false;
        };
        let moved = self.canvas.bring_to_front(&id).is_ok();
        self.has_local_changes |= moved;
        moved
    }

    /// Mark the current canvas as saved.
    pub fn mark_saved(&mut self) {
        self.has_local_changes = false;
    }

    /// Process an input event. Returns whether the canvas changed.
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer),
            InputEvent::Key(key) => self.handle_key(key),
        }
    }

    /// Process a pointer event. Returns whether the canvas changed.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        if self.preview {
            return false;
        }
        match event.phase {
            PointerPhase::Down => {
                if !self.gesture.is_active() {
                    self.pointer_down(event);
                }
                false
            }
            PointerPhase::Move => self.step_gesture(event.x, event.y),
            PointerPhase::Up => {
                let changed = self.step_gesture(event.x, event.y);
                if self.gesture.is_active() {
                    debug!(gesture = ?self.gesture, "Gesture finished");
                }
                self.gesture = Gesture::Idle;
                changed
            }
            PointerPhase::Cancel => self.cancel_gesture(),
        }
    }

    fn pointer_down(&mut self, event: &PointerEvent) {
        match &event.target {
            PointerTarget::Canvas => self.selected = None,
            PointerTarget::Body { element } => {
                let Some(found) = self.canvas.get_element(element) else {
                    return;
                };
                let is_selected = self.selected.as_ref() == Some(element);
                if is_selected && self.mode == InteractionMode::Drag {
                    self.gesture = Gesture::Dragging(DragState::start(found, event.x, event.y));
                } else {
                    self.selected = Some(element.clone());
                }
            }
            PointerTarget::MoveHandle { element } => {
                if self.selected.as_ref() != Some(element) {
                    return;
                }
                if let Some(found) = self.canvas.get_element(element) {
                    self.gesture = Gesture::Dragging(DragState::start(found, event.x, event.y));
                }
            }
            PointerTarget::ResizeHandle { element, handle } => {
                if self.selected.as_ref() != Some(element) {
                    return;
                }
                if let Some(found) = self.canvas.get_element(element) {
                    self.gesture = Gesture::Resizing(ResizeState::start(
                        found, *handle, event.x, event.y,
                    ));
                }
            }
        }
        if self.gesture.is_active() {
            debug!(gesture = ?self.gesture, "Gesture started");
        }
    }

    fn step_gesture(&mut self, x: i32, y: i32) -> bool {
        let Some((id, patch)) = self.gesture.step(x, y) else {
            return false;
        };
        if self.update_element(&id, &patch).is_err() {
            self.gesture = Gesture::Idle;
            return false;
        }
        true
    }

    /// Abort the active gesture, restoring the element's geometry.
    /// Returns whether the canvas changed.
    pub fn cancel_gesture(&mut self) -> bool {
        let restore = self.gesture.restore();
        self.gesture = Gesture::Idle;
        match restore {
            Some((id, patch)) => self.update_element(&id, &patch).is_ok(),
            None => false,
        }
    }

    /// Process a key event. Returns whether the canvas changed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if self.preview {
            return false;
        }
        let step = if event.modifiers.shift {
            NUDGE_STEP_LARGE
        } else {
            NUDGE_STEP
        };
        match event.key.as_str() {
            "Delete" | "Backspace" => match self.selected.clone() {
                Some(id) => self.delete(&id).is_ok(),
                None => false,
            },
            "Escape" => {
                let changed = self.cancel_gesture();
                self.selected = None;
                changed
            }
            "ArrowLeft" => self.nudge(-step, 0),
            "ArrowRight" => self.nudge(step, 0),
            "ArrowUp" => self.nudge(0, -step),
            "ArrowDown" => self.nudge(0, step),
            _ => false,
        }
    }

    fn nudge(&mut self, dx: i32, dy: i32) -> bool {
        if self.gesture.is_active() {
            return false;
        }
        let Some(element) = self.selected_element() else {
            return false;
        };
        let id = element.id.clone();
        let target = Position::new(
            element.position.x.saturating_add(dx),
            element.position.y.saturating_add(dy),
        )
        .clamped();
        if target == element.position {
            return false;
        }
        self.update_element(&id, &ElementPatch::position(target))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Size, MAX_COORDINATE};
    use crate::event::ResizeHandle;

    fn body(id: &ElementId) -> PointerTarget {
        PointerTarget::Body {
            element: id.clone(),
        }
    }

    fn geometry(session: &EditorSession, id: &ElementId) -> (Position, Size) {
        let element = session.canvas().get_element(id).expect("element exists");
        (element.position, element.size)
    }

    #[test]
    fn test_place_selects_new_element() {
        let mut session = EditorSession::new();
        let id = session.place(ElementKind::Button, Position::new(140, 60));
        assert_eq!(session.selected(), Some(&id));
        assert!(session.has_local_changes);
    }

    #[test]
    fn test_drag_mode_press_unselected_only_selects() {
        let mut session = EditorSession::new();
        let id = session.place(ElementKind::Text, Position::new(120, 120));
        session.clear_selection();

        session.handle_pointer(&PointerEvent::down(110, 110, body(&id)));
        assert_eq!(session.selected(), Some(&id));
        assert!(!session.gesture().is_active());
    }

    #[test]
    fn test_drag_mode_moves_selected_body() {
        let mut session = EditorSession::new();
        let id = session.place(ElementKind::Text, Position::new(120, 120));

        session.handle_pointer(&PointerEvent::down(110, 110, body(&id)));
        assert!(session.gesture().is_active());
        assert!(session.handle_pointer(&PointerEvent::moved(160, 130)));
        session.handle_pointer(&PointerEvent::up(160, 130));

        assert!(!session.gesture().is_active());
        assert_eq!(geometry(&session, &id).0, Position::new(150, 120));
    }

    #[test]
    fn test_click_mode_body_never_drags() {
        let mut session = EditorSession::new();
        session.set_mode(InteractionMode::Click);
        let id = session.place(ElementKind::Text, Position::new(120, 120));

        session.handle_pointer(&PointerEvent::down(110, 110, body(&id)));
        assert!(!session.gesture().is_active());
        assert!(!session.handle_pointer(&PointerEvent::moved(300, 300)));
        assert_eq!(geometry(&session, &id).0, Position::new(100, 100));

        let handle = PointerTarget::MoveHandle {
            element: id.clone(),
        };
        session.handle_pointer(&PointerEvent::down(100, 100, handle));
        session.handle_pointer(&PointerEvent::moved(130, 100));
        session.handle_pointer(&PointerEvent::up(130, 100));
        assert_eq!(geometry(&session, &id).0, Position::new(130, 100));
    }

    #[test]
    fn test_drag_clamps_at_origin() {
        let mut session = EditorSession::new();
        let id = session.place(ElementKind::Text, Position::new(40, 40));
        session.handle_pointer(&PointerEvent::down(25, 25, body(&id)));
        session.handle_pointer(&PointerEvent::moved(-400, -400));
        session.handle_pointer(&PointerEvent::up(-400, -400));
        assert_eq!(geometry(&session, &id).0, Position::new(0, 0));
    }

    #[test]
    fn test_resize_se_scenario() {
        let mut session = EditorSession::new();
        let id = session.place(ElementKind::Button, Position::new(140, 60));
        let handle = PointerTarget::ResizeHandle {
            element: id.clone(),
            handle: ResizeHandle::Se,
        };
        session.handle_pointer(&PointerEvent::down(240, 80, handle));
        session.handle_pointer(&PointerEvent::moved(270, 90));
        session.handle_pointer(&PointerEvent::up(270, 90));

        let (position, size) = geometry(&session, &id);
        assert_eq!(position, Position::new(120, 40));
        assert_eq!(size, Size::new(150, 50));
    }

    #[test]
    fn test_resize_huge_stored_geometry() {
        let json = r#"[{
            "id": "wide",
            "type": "text",
            "position": {"x": 2000000000, "y": 2000000000},
            "size": {"width": 2000000000, "height": 2000000000},
            "props": {},
            "styles": {}
        }]"#;
        let canvas = Canvas::from_json(json).expect("should parse");
        let mut session = EditorSession::with_canvas(canvas);
        let id = ElementId::parse("wide").expect("id");
        session.select(&id).expect("select");

        let handle = PointerTarget::ResizeHandle {
            element: id.clone(),
            handle: ResizeHandle::W,
        };
        session.handle_pointer(&PointerEvent::down(0, 0, handle));
        session.handle_pointer(&PointerEvent::moved(20, 10));
        session.handle_pointer(&PointerEvent::up(20, 10));

        let (position, size) = geometry(&session, &id);
        assert_eq!(position.x, MAX_COORDINATE);
        assert_eq!(size.width, MAX_COORDINATE - 20);
        assert_eq!(size.height, MAX_COORDINATE);
    }

    #[test]
    fn test_resize_handle_requires_selection() {
        let mut session = EditorSession::new();
        let id = session.place(ElementKind::Button, Position::new(140, 60));
        session.clear_selection();
        let handle = PointerTarget::ResizeHandle {
            element: id,
            handle: ResizeHandle::E,
        };
        session.handle_pointer(&PointerEvent::down(240, 60, handle));
        assert!(!session.gesture().is_active());
    }

    #[test]
    fn test_press_during_gesture_is_ignored() {
        let mut session = EditorSession::new();
        let a = session.place(ElementKind::Text, Position::new(100, 100));
        let b = session.place(ElementKind::Text, Position::new(400, 400));
        session.select(&a).expect("select");

        session.handle_pointer(&PointerEvent::down(90, 90, body(&a)));
        session.handle_pointer(&PointerEvent::down(390, 390, body(&b)));
        assert_eq!(session.selected(), Some(&a));
        assert_eq!(session.gesture().element(), Some(&a));
    }

    #[test]
    fn test_cancel_restores_geometry() {
        let mut session = EditorSession::new();
        let id = session.place(ElementKind::Card, Position::new(220, 220));
        let before = geometry(&session, &id);

        let handle = PointerTarget::ResizeHandle {
            element: id.clone(),
            handle: ResizeHandle::Nw,
        };
        session.handle_pointer(&PointerEvent::down(200, 200, handle));
        session.handle_pointer(&PointerEvent::moved(150, 120));
        assert_ne!(geometry(&session, &id), before);

        session.handle_pointer(&PointerEvent::cancel());
        assert_eq!(geometry(&session, &id), before);
        assert!(!session.gesture().is_active());
    }

    #[test]
    fn test_canvas_press_clears_selection() {
        let mut session = EditorSession::new();
        session.place(ElementKind::Text, Position::new(100, 100));
        session.handle_pointer(&PointerEvent::down(700, 700, PointerTarget::Canvas));
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_preview_disables_interaction() {
        let mut session = EditorSession::new();
        let id = session.place(ElementKind::Text, Position::new(100, 100));
        session.set_preview(true);
        assert!(session.selected().is_none());

        session.handle_pointer(&PointerEvent::down(90, 90, body(&id)));
        assert!(session.selected().is_none());
        assert!(!session.handle_key(&KeyEvent::new("Delete")));

        session.set_preview(false);
        session.handle_pointer(&PointerEvent::down(90, 90, body(&id)));
        assert_eq!(session.selected(), Some(&id));
    }

    #[test]
    fn test_keyboard_delete_and_escape() {
        let mut session = EditorSession::new();
        let a = session.place(ElementKind::Text, Position::new(100, 100));
        assert!(session.handle_key(&KeyEvent::new("Delete")));
        assert!(session.canvas().is_empty());
        assert!(session.selected().is_none());

        let b = session.place(ElementKind::Text, Position::new(100, 100));
        assert_ne!(a, b);
        session.handle_key(&KeyEvent::new("Escape"));
        assert!(session.selected().is_none());
        assert!(!session.handle_key(&KeyEvent::new("Backspace")));
        assert_eq!(session.canvas().len(), 1);
    }

    #[test]
    fn test_arrow_nudge() {
        let mut session = EditorSession::new();
        let id = session.place(ElementKind::Text, Position::new(25, 25));
        session.handle_key(&KeyEvent::new("ArrowRight"));
        assert_eq!(geometry(&session, &id).0, Position::new(6, 5));
        session.handle_key(&KeyEvent::shifted("ArrowDown"));
        assert_eq!(geometry(&session, &id).0, Position::new(6, 15));
        session.handle_key(&KeyEvent::shifted("ArrowLeft"));
        assert_eq!(geometry(&session, &id).0, Position::new(0, 15));
        assert!(!session.handle_key(&KeyEvent::new("ArrowLeft")));
    }

    #[test]
    fn test_duplicate_selected() {
        let mut session = EditorSession::new();
        let id = session.place(ElementKind::Hero, Position::new(20, 20));
        let copy = session.duplicate_selected().expect("duplicated");
        assert_eq!(session.selected(), Some(&copy));
        assert_eq!(geometry(&session, &copy).0, Position::new(20, 20));
        assert_eq!(geometry(&session, &id).0, Position::new(0, 0));
    }

    #[test]
    fn test_process_event_dispatch() {
        let mut session = EditorSession::new();
        session.place(ElementKind::Text, Position::new(100, 100));
        let changed = session.process_event(&InputEvent::Key(KeyEvent::new("Delete")));
        assert!(changed);
        assert!(session.canvas().is_empty());
    }
}
