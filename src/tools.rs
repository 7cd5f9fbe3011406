//! Exclusive editing-tool state machine.
//!
//! One tool at most is active at a time. Activating a tool first deactivates
//! whatever was active, then activates the request; activating the
//! already-active tool is a no-op, so rapid repeated triggers from keyboard
//! or menu are idempotent. The machine is pure: it returns the ordered
//! switch for the orchestrator to forward to the canvas engine.

#[cfg(test)]
#[path = "tools_test.rs"]
mod tools_test;

use crate::consts::DEFAULT_TOOL;

/// Kind of shape produced by a drawing tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    /// Free-form polygon.
    Polygon,
    /// Axis-aligned rectangle.
    Rectangle,
}

/// One exclusive editing mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    /// Click-select shapes.
    Select,
    /// Pan / drag shapes. The designated default tool.
    Drag,
    /// Reshape an existing shape by its vertices.
    Modify,
    /// Scale / rotate a shape with transform handles.
    Transform,
    /// Duplicate a shape.
    Duplicate,
    /// Draw a new shape of the given kind.
    Draw(ShapeKind),
    /// Click-delete shapes.
    Delete,
    /// Drag a box to zoom into it.
    ZoomBox,
}

impl Tool {
    /// Whether this tool creates new shapes.
    #[must_use]
    pub fn is_draw(self) -> bool {
        matches!(self, Self::Draw(_))
    }
}

/// An ordered tool switch: deactivate first, then activate.
///
/// Both sides empty means the request was a no-op (the tool was already
/// active, or there was nothing to deactivate).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToolChange {
    /// Tool to deactivate, if any.
    pub deactivate: Option<Tool>,
    /// Tool to activate, if any.
    pub activate: Option<Tool>,
}

impl ToolChange {
    /// True when the switch requires no engine calls.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.deactivate.is_none() && self.activate.is_none()
    }
}

/// Single-slot active-tool state. `None` means idle.
#[derive(Debug, Default)]
pub struct ToolRail {
    active: Option<Tool>,
}

impl ToolRail {
    /// Create an idle rail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active tool, if any.
    #[must_use]
    pub fn active(&self) -> Option<Tool> {
        self.active
    }

    /// Activate a tool, deactivating the current one first. Requesting the
    /// already-active tool returns an empty change.
    pub fn activate(&mut self, tool: Tool) -> ToolChange {
        if self.active == Some(tool) {
            return ToolChange::default();
        }
        ToolChange { deactivate: self.active.replace(tool), activate: Some(tool) }
    }

    /// Return to idle, deactivating the current tool if any.
    pub fn deactivate_current(&mut self) -> ToolChange {
        ToolChange { deactivate: self.active.take(), activate: None }
    }

    /// Re-arm the default tool after a completed single-shot operation.
    pub fn activate_default(&mut self) -> ToolChange {
        self.activate(DEFAULT_TOOL)
    }
}
