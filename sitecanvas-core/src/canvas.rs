//! The ordered element sequence of one page.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::{Element, ElementId, ElementKind, ElementPatch, Position, DROP_OFFSET};
use crate::{CanvasError, CanvasResult};

/// Minimum rendered canvas height in pixels.
pub const MIN_CANVAS_HEIGHT: i32 = 800;

/// Space kept below the lowest element when sizing the canvas.
pub const CANVAS_BOTTOM_PADDING: i32 = 200;

/// All elements of a page, in z-order (later elements paint on top).
///
/// Serializes as a bare JSON array so stored projects keep the editor's
/// `elements` shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Canvas {
    elements: Vec<Element>,
}

impl Canvas {
    /// Create an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a canvas from an existing sequence.
    ///
    /// Geometry is clamped to the element invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if an id is empty or appears twice.
    pub fn from_elements(elements: Vec<Element>) -> CanvasResult<Self> {
        let mut canvas = Self::new();
        for element in elements {
            canvas.add_element(element)?;
        }
        Ok(canvas)
    }

    /// Add an element on top of the z-order.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or already placed.
    pub fn add_element(&mut self, element: Element) -> CanvasResult<ElementId> {
        if element.id.is_blank() {
            return Err(CanvasError::EmptyElementId);
        }
        if self.contains(&element.id) {
            return Err(CanvasError::DuplicateElement(element.id.to_string()));
        }
        let element = element.normalized();
        let id = element.id.clone();
        self.elements.push(element);
        Ok(id)
    }

    /// Create an element of `kind` dropped at `pointer` and add it.
    pub fn place(&mut self, kind: ElementKind, pointer: Position) -> ElementId {
        let element = Element::create(kind, pointer);
        let id = element.id.clone();
        debug!(id = %id, kind = %element.kind, x = element.position.x, y = element.position.y, "Placed element");
        self.elements.push(element);
        id
    }

    /// Remove an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn remove_element(&mut self, id: &ElementId) -> CanvasResult<Element> {
        let index = self.index_of(id)?;
        Ok(self.elements.remove(index))
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get_element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    /// Whether an element with this id is placed.
    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.get_element(id).is_some()
    }

    /// Merge a partial update into an element, replacing it in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> CanvasResult<&Element> {
        let index = self.index_of(id)?;
        let updated = self.elements[index].apply(patch);
        self.elements[index] = updated;
        Ok(&self.elements[index])
    }

    /// Copy an element under a fresh id, offset down and right, on top of the z-order.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn duplicate(&mut self, id: &ElementId) -> CanvasResult<ElementId> {
        let source = self
            .get_element(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))?;
        let mut copy = source.clone();
        copy.id = ElementId::new();
        copy.position = Position::new(
            source.position.x.saturating_add(DROP_OFFSET),
            source.position.y.saturating_add(DROP_OFFSET),
        );
        let new_id = copy.id.clone();
        self.elements.push(copy);
        Ok(new_id)
    }

    /// Move an element to the top of the z-order.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn bring_to_front(&mut self, id: &ElementId) -> CanvasResult<()> {
        let index = self.index_of(id)?;
        let element = self.elements.remove(index);
        self.elements.push(element);
        Ok(())
    }

    /// Find the topmost element containing the point.
    #[must_use]
    pub fn element_at(&self, x: i32, y: i32) -> Option<&Element> {
        self.elements.iter().rev().find(|e| e.contains_point(x, y))
    }

    /// Lowest bottom edge of any element, or 0 for an empty canvas.
    #[must_use]
    pub fn bounding_height(&self) -> i32 {
        self.elements.iter().map(Element::bottom).max().unwrap_or(0)
    }

    /// Height the canvas should render at so every element stays reachable.
    #[must_use]
    pub fn canvas_height(&self) -> i32 {
        MIN_CANVAS_HEIGHT.max(self.bounding_height().saturating_add(CANVAS_BOTTOM_PADDING))
    }

    /// Elements in z-order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Consume the canvas, returning its elements.
    #[must_use]
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    /// Number of placed elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the canvas is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize the canvas to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string(self).map_err(CanvasError::Serialization)
    }

    /// Deserialize a canvas from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or ids are invalid.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let elements: Vec<Element> = serde_json::from_str(json)?;
        Self::from_elements(elements)
    }

    fn index_of(&self, id: &ElementId) -> CanvasResult<usize> {
        self.elements
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))
    }
}

impl<'de> Deserialize<'de> for Canvas {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let elements = Vec::<Element>::deserialize(deserializer)?;
        Self::from_elements(elements).map_err(serde::de::Error::custom)
    }
}
