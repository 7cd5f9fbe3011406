//! Per-shape save-state: whether the canvas shape matches what is persisted.

#[cfg(test)]
#[path = "save_state_test.rs"]
mod save_state_test;

use std::collections::HashMap;

use crate::consts::{STYLE_SAVED, STYLE_UNSAVED};
use crate::ident::ShapeId;

/// Whether a shape's current geometry and fields match the stored record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaveState {
    /// In sync with the annotation store.
    Saved,
    /// Local edits not yet persisted. The default for new shapes.
    #[default]
    Unsaved,
}

impl SaveState {
    /// The render style bound to this state. Style is always derived from
    /// the flag, never stored separately.
    #[must_use]
    pub fn style(self) -> &'static str {
        match self {
            Self::Saved => STYLE_SAVED,
            Self::Unsaved => STYLE_UNSAVED,
        }
    }
}

/// Request for the canvas engine to re-render one shape with a named style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedrawRequest {
    /// Shape to re-render.
    pub shape_id: ShapeId,
    /// Style derived from the shape's new save-state.
    pub style: &'static str,
}

/// Tracks the save-state flag for every shape the core has seen.
///
/// Pure state: the returned [`RedrawRequest`] is forwarded to the canvas
/// engine by the orchestrator, keeping this component testable in isolation.
#[derive(Debug, Default)]
pub struct SaveStateTracker {
    states: HashMap<ShapeId, SaveState>,
}

impl SaveStateTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a shape. Unknown shapes are `Unsaved`.
    #[must_use]
    pub fn get(&self, shape_id: ShapeId) -> SaveState {
        self.states.get(&shape_id).copied().unwrap_or_default()
    }

    /// Set a shape's state. When `redraw` is true, returns exactly one
    /// redraw request carrying the style bound to the new state.
    pub fn set(&mut self, shape_id: ShapeId, state: SaveState, redraw: bool) -> Option<RedrawRequest> {
        self.states.insert(shape_id, state);
        redraw.then(|| RedrawRequest { shape_id, style: state.style() })
    }

    /// Drop a shape's entry when it leaves the canvas.
    pub fn remove(&mut self, shape_id: ShapeId) {
        self.states.remove(&shape_id);
    }

    /// Number of tracked shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True when no shape is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
