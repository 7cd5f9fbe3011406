//! UI collaborator interface: detail form, overview listing, confirmations,
//! and the status surface.

use crate::ident::{AnnotationRecord, FieldErrors, FieldMap, ShapeId};

/// Capabilities the sync core requires of the surrounding UI.
///
/// One implementation per embedding; the core never reaches the DOM, a
/// widget toolkit, or ambient globals directly.
pub trait Ui {
    /// Current values of the annotation form, gathered at save time.
    fn current_fields(&self) -> FieldMap;

    /// Populate the detail form for the selected shape. An empty map means
    /// the shape has no bound record yet (empty form).
    fn show_detail(&mut self, fields: &FieldMap);

    /// Clear the detail form when nothing is selected.
    fn clear_detail(&mut self);

    /// Ask the user to confirm deleting this shape's annotation. Deletion
    /// cannot be undone, so nothing happens unless this returns true.
    fn confirm_delete(&mut self, shape_id: ShapeId) -> bool;

    /// Show a status message for the last operation.
    fn status(&mut self, message: &str);

    /// Display per-field validation errors from the annotation store.
    fn show_field_errors(&mut self, errors: &FieldErrors);

    /// Re-render the overview listing: one entry per record, each offering
    /// center-on-shape and delete actions.
    fn show_overview(&mut self, records: &[&AnnotationRecord]);
}
