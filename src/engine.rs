//! Canvas/map engine capability interface.
//!
//! The engine owns the zoomable image, the shape collection, and all
//! geometry; the sync core drives it only through this trait. Shape events
//! flow the other way as [`CanvasEvent`] values the host feeds into
//! [`crate::sync::Annotator::handle_event`], subscribed once at
//! initialization.

use crate::geometry::{Bounds, Geometry};
use crate::ident::ShapeId;
use crate::tools::Tool;

/// A shape lifecycle event emitted by the canvas engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasEvent {
    /// The user selected a shape on the canvas.
    Selected(ShapeId),
    /// A shape lost its on-canvas selection.
    Unselected(ShapeId),
    /// The user finished editing a shape (move, reshape, transform, drag).
    Modified(ShapeId),
    /// A shape is about to enter the collection; the save-state pre-check
    /// runs here so re-loaded persisted shapes keep their restored state.
    PreInsert(ShapeId),
    /// A shape entered the collection.
    Inserted(ShapeId),
}

/// Capabilities the sync core requires of the canvas/map engine.
pub trait CanvasEngine {
    /// Whether a shape with this id is on the canvas.
    fn contains(&self, shape_id: ShapeId) -> bool;

    /// Ids of every shape currently on the canvas, for bulk operations.
    fn shape_ids(&self) -> Vec<ShapeId>;

    /// A shape's current geometry, if the shape exists.
    fn geometry(&self, shape_id: ShapeId) -> Option<Geometry>;

    /// Add a shape with the given id and geometry (used when re-loading
    /// persisted shapes).
    fn insert_shape(&mut self, shape_id: ShapeId, geometry: Geometry);

    /// Remove a shape from the canvas.
    fn remove_shape(&mut self, shape_id: ShapeId);

    /// Re-render one shape with the named style.
    fn redraw(&mut self, shape_id: ShapeId, style: &str);

    /// Pan the view to center on the given extent.
    fn recenter(&mut self, bounds: Bounds);

    /// Zoom and pan the view to fit the given extent.
    fn fit_view(&mut self, bounds: Bounds);

    /// Turn an editing tool on.
    fn activate_tool(&mut self, tool: Tool);

    /// Turn an editing tool off.
    fn deactivate_tool(&mut self, tool: Tool);
}
