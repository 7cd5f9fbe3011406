//! Single-slot selection state.
//!
//! At most one shape is selected at any instant; selecting a new shape
//! implicitly unselects the previous one. The slot holds only the shape's
//! local id — the engine owns the shape itself. Changes come back as ordered
//! events for the orchestrator to apply to the detail view.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::ident::ShapeId;

/// A selection change, in the order it must be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    /// The previously selected shape left the slot.
    Unselected(ShapeId),
    /// This shape now occupies the slot.
    Selected(ShapeId),
}

/// Process-wide single selection slot.
#[derive(Debug, Default)]
pub struct SelectionSlot {
    selected: Option<ShapeId>,
}

impl SelectionSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected shape, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ShapeId> {
        self.selected
    }

    /// Select a shape. Yields `Unselected(prev)` (when another shape held
    /// the slot) followed by `Selected(shape_id)`. Re-selecting the current
    /// shape yields nothing.
    pub fn select(&mut self, shape_id: ShapeId) -> Vec<SelectionEvent> {
        if self.selected == Some(shape_id) {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.selected.replace(shape_id) {
            events.push(SelectionEvent::Unselected(previous));
        }
        events.push(SelectionEvent::Selected(shape_id));
        events
    }

    /// Clear the slot, yielding `Unselected(prev)` when it was occupied.
    pub fn unselect(&mut self) -> Option<SelectionEvent> {
        self.selected.take().map(SelectionEvent::Unselected)
    }
}
