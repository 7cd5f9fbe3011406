//! The sync protocol: orchestrates canvas events, selection, tool switching,
//! and save/delete round-trips against the annotation store.
//!
//! DESIGN
//! ======
//! [`Annotator`] wires the pure state machines (save-state tracker, identity
//! map, selection slot, tool rail) to the collaborator traits. All entry
//! points take an explicit `&mut self`; there is no ambient instance.
//!
//! Saves run optimistically: the shape is marked `Saved` (and restyled)
//! before the request is issued, and rolled back to `Unsaved` only on a
//! transport failure. The protocol does not serialize requests per shape —
//! two in-flight saves for one shape race, and whichever response is applied
//! last wins the identity-map binding. A response landing after its shape
//! left the canvas is dropped. The split [`Annotator::begin_save`] /
//! [`Annotator::complete_save`] API exposes exactly those seams; the async
//! methods are the common begin → request → complete round-trip.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use serde_json::Value;

use crate::engine::{CanvasEngine, CanvasEvent};
use crate::error::SyncError;
use crate::geometry::{self, Bounds};
use crate::ident::{FieldErrors, FieldMap, IdentityMap, RecordId, ShapeId};
use crate::keys::{self, KeyCommand};
use crate::save_state::{SaveState, SaveStateTracker};
use crate::selection::{SelectionEvent, SelectionSlot};
use crate::store::{AnnotationStore, SaveReply, StoreError};
use crate::tools::{Tool, ToolChange, ToolRail};
use crate::ui::Ui;

// =============================================================================
// TYPES
// =============================================================================

/// A save that has been submitted locally but not yet resolved.
///
/// Produced by [`Annotator::begin_save`]; carries everything the store
/// request needs plus the identity-map key captured at submission time.
#[derive(Clone, Debug)]
pub struct PendingSave {
    /// Shape being saved.
    pub shape_id: ShapeId,
    /// Record to update, or `None` to request creation.
    pub record_id: Option<RecordId>,
    /// Transport-encoded geometry at submission time.
    pub geometry: Value,
    /// Annotation form fields at submission time.
    pub fields: FieldMap,
}

/// Terminal outcome of a save operation.
#[derive(Debug)]
pub enum SaveStatus {
    /// Persisted; the identity map now binds the shape to this record.
    Saved(RecordId),
    /// The store rejected individual fields; save-state was left untouched.
    Rejected(FieldErrors),
    /// The save never resolved: encoding failed, the shape is unknown, or
    /// the request failed and save-state was rolled back.
    Failed(SyncError),
    /// The response landed after the shape left the canvas; nothing applied.
    Stale,
}

/// Terminal outcome of a delete operation.
#[derive(Debug)]
pub enum DeleteStatus {
    /// Shape removed and (when a record was bound) the record deleted.
    Deleted,
    /// The user declined the confirmation; nothing changed.
    Cancelled,
    /// The shape was removed locally but the stored record could not be
    /// deleted — non-recoverable drift, surfaced as a warning.
    Drifted(SyncError),
    /// No such shape (or record) exists; nothing to do.
    Unknown,
}

/// The synchronization core: tracks which shapes are persisted, maps shape
/// identity to record identity, and keeps both sides consistent through
/// save/delete round-trips.
pub struct Annotator<E, S, U> {
    /// The canvas/map engine collaborator.
    pub engine: E,
    /// The annotation store collaborator.
    pub store: S,
    /// The UI collaborator.
    pub ui: U,
    save_states: SaveStateTracker,
    identity: IdentityMap,
    selection: SelectionSlot,
    tools: ToolRail,
}

impl<E: CanvasEngine, S: AnnotationStore, U: Ui> Annotator<E, S, U> {
    /// Wire a new core to its collaborators. The host subscribes the engine's
    /// event stream to [`Annotator::handle_event`] once after construction.
    #[must_use]
    pub fn new(engine: E, store: S, ui: U) -> Self {
        Self {
            engine,
            store,
            ui,
            save_states: SaveStateTracker::new(),
            identity: IdentityMap::new(),
            selection: SelectionSlot::new(),
            tools: ToolRail::new(),
        }
    }

    // --- Queries ---

    /// The currently selected shape, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.selection.selected()
    }

    /// The active editing tool, if any.
    #[must_use]
    pub fn active_tool(&self) -> Option<Tool> {
        self.tools.active()
    }

    /// A shape's save-state flag.
    #[must_use]
    pub fn save_state(&self, shape_id: ShapeId) -> SaveState {
        self.save_states.get(shape_id)
    }

    /// Read access to the shape ↔ record bindings.
    #[must_use]
    pub fn identity(&self) -> &IdentityMap {
        &self.identity
    }

    // =========================================================================
    // CANVAS EVENTS
    // =========================================================================

    /// Apply one shape event from the canvas engine.
    pub fn handle_event(&mut self, event: CanvasEvent) {
        match event {
            CanvasEvent::Selected(shape_id) => {
                let events = self.selection.select(shape_id);
                self.apply_selection_events(&events);
            }
            CanvasEvent::Unselected(shape_id) => {
                if self.selection.selected() == Some(shape_id) {
                    if let Some(event) = self.selection.unselect() {
                        self.apply_selection_events(&[event]);
                    }
                }
            }
            CanvasEvent::Modified(shape_id) => self.mark_edited(shape_id),
            CanvasEvent::PreInsert(shape_id) => {
                // Pre-check: shapes re-loaded from the store are already
                // Saved and keep that state; everything else starts Unsaved.
                if self.save_states.get(shape_id) != SaveState::Saved {
                    self.save_states.set(shape_id, SaveState::Unsaved, false);
                }
            }
            CanvasEvent::Inserted(shape_id) => self.select_by_id(shape_id),
        }
    }

    /// A user edit invalidates the persisted state and makes the edited
    /// shape immediately inspectable.
    fn mark_edited(&mut self, shape_id: ShapeId) {
        if let Some(request) = self.save_states.set(shape_id, SaveState::Unsaved, true) {
            self.engine.redraw(request.shape_id, request.style);
        }
        self.select_by_id(shape_id);
    }

    // =========================================================================
    // TOOLS
    // =========================================================================

    /// Activate a tool, deactivating the current one first. Activating the
    /// already-active tool is a no-op.
    pub fn activate_tool(&mut self, tool: Tool) {
        let change = self.tools.activate(tool);
        self.apply_tool_change(change);
    }

    /// Deactivate whatever tool is active, returning to idle.
    pub fn deactivate_tools(&mut self) {
        let change = self.tools.deactivate_current();
        self.apply_tool_change(change);
    }

    /// Dispatch a keyboard chord. Returns true when the chord was bound.
    pub async fn handle_key(&mut self, chord: &str) -> bool {
        match keys::command_for(chord) {
            Some(KeyCommand::Activate(tool)) => {
                self.activate_tool(tool);
                true
            }
            Some(KeyCommand::Save) => {
                match self.selection.selected() {
                    Some(shape_id) => {
                        self.save(shape_id).await;
                    }
                    None => {
                        self.save_all().await;
                    }
                }
                true
            }
            None => false,
        }
    }

    fn apply_tool_change(&mut self, change: ToolChange) {
        if let Some(tool) = change.deactivate {
            self.engine.deactivate_tool(tool);
        }
        if let Some(tool) = change.activate {
            self.engine.activate_tool(tool);
        }
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Select a shape by id. A no-op when no such shape is on the canvas
    /// (it may not have loaded yet).
    pub fn select_by_id(&mut self, shape_id: ShapeId) {
        if !self.engine.contains(shape_id) {
            return;
        }
        let events = self.selection.select(shape_id);
        self.apply_selection_events(&events);
    }

    /// Select a shape and pan the view to center on it. The recenter is
    /// skipped for degenerate (zero-extent) geometry.
    pub fn select_by_id_and_center(&mut self, shape_id: ShapeId) {
        self.select_by_id(shape_id);
        if let Some(bounds) = self.shape_bounds(shape_id) {
            if !bounds.is_degenerate() {
                self.engine.recenter(bounds);
            }
        }
    }

    /// Select a shape and zoom the view to fit its extent. The fit is
    /// skipped for degenerate (zero-extent) geometry.
    pub fn select_by_id_and_zoom(&mut self, shape_id: ShapeId) {
        self.select_by_id(shape_id);
        if let Some(bounds) = self.shape_bounds(shape_id) {
            if !bounds.is_degenerate() {
                self.engine.fit_view(bounds);
            }
        }
    }

    /// Clear the selection and the detail view.
    pub fn unselect(&mut self) {
        if let Some(event) = self.selection.unselect() {
            self.apply_selection_events(&[event]);
        }
    }

    /// Overview "center on shape" action: resolve a record to its shape and
    /// center on it. Unknown records are a no-op.
    pub fn center_on_record(&mut self, record_id: RecordId) {
        if let Some(shape_id) = self.identity.shape_for(record_id) {
            self.select_by_id_and_center(shape_id);
        }
    }

    fn shape_bounds(&self, shape_id: ShapeId) -> Option<Bounds> {
        self.engine.geometry(shape_id).and_then(|geometry| geometry.bounds())
    }

    fn apply_selection_events(&mut self, events: &[SelectionEvent]) {
        for event in events {
            match event {
                SelectionEvent::Unselected(_) => self.ui.clear_detail(),
                SelectionEvent::Selected(shape_id) => match self.identity.record(*shape_id) {
                    Some(record) => self.ui.show_detail(&record.fields),
                    None => self.ui.show_detail(&FieldMap::new()),
                },
            }
        }
    }

    // =========================================================================
    // SAVE
    // =========================================================================

    /// Submit a save locally: encode the geometry, gather the form fields,
    /// and optimistically mark the shape `Saved` (with restyle). The
    /// returned [`PendingSave`] is handed to the store and resolved with
    /// [`Annotator::complete_save`].
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownShape`] when the shape is not on the
    /// canvas and [`SyncError::MalformedGeometry`] when encoding fails; in
    /// both cases no state was mutated.
    pub fn begin_save(&mut self, shape_id: ShapeId) -> Result<PendingSave, SyncError> {
        let Some(shape_geometry) = self.engine.geometry(shape_id) else {
            return Err(SyncError::UnknownShape(shape_id));
        };
        let encoded = geometry::encode(&shape_geometry)
            .map_err(|source| SyncError::MalformedGeometry { shape_id, source })?;
        let fields = self.ui.current_fields();

        if let Some(request) = self.save_states.set(shape_id, SaveState::Saved, true) {
            self.engine.redraw(request.shape_id, request.style);
        }

        Ok(PendingSave {
            shape_id,
            record_id: self.identity.record_id(shape_id),
            geometry: encoded,
            fields,
        })
    }

    /// Resolve a pending save with the store's reply. Responses are never
    /// cancelled, so this checks the shape still exists before applying
    /// anything; the last response applied for a shape wins its binding.
    pub fn complete_save(
        &mut self,
        pending: &PendingSave,
        reply: Result<SaveReply, StoreError>,
    ) -> SaveStatus {
        let shape_id = pending.shape_id;
        if !self.engine.contains(shape_id) {
            tracing::warn!(%shape_id, "dropping save response for a shape no longer on the canvas");
            return SaveStatus::Stale;
        }

        match reply {
            Ok(SaveReply::Saved(record)) => {
                let record_id = record.id;
                self.identity.bind(record);
                self.refresh_overview();
                if self.selection.selected() == Some(shape_id) {
                    if let Some(record) = self.identity.record(shape_id) {
                        self.ui.show_detail(&record.fields);
                    }
                }
                self.ui.status("Saved annotation.");
                SaveStatus::Saved(record_id)
            }
            Ok(SaveReply::Rejected(errors)) => {
                let error = SyncError::ValidationFailed { errors: errors.clone() };
                tracing::warn!(error = %error, %shape_id, "annotation save rejected by validation");
                self.ui.show_field_errors(&errors);
                SaveStatus::Rejected(errors)
            }
            Err(store_error) => {
                if let Some(request) = self.save_states.set(shape_id, SaveState::Unsaved, true) {
                    self.engine.redraw(request.shape_id, request.style);
                }
                let error = SyncError::RequestFailed(store_error);
                tracing::warn!(error = %error, %shape_id, "annotation save failed; save-state rolled back");
                self.ui.status(&format!("Save failed: {error}"));
                SaveStatus::Failed(error)
            }
        }
    }

    /// Save one shape: the begin → store request → complete round-trip.
    /// Failures are surfaced on the status line; there is no automatic retry.
    pub async fn save(&mut self, shape_id: ShapeId) -> SaveStatus {
        let pending = match self.begin_save(shape_id) {
            Ok(pending) => pending,
            Err(error) => {
                tracing::warn!(error = %error, %shape_id, "save not submitted");
                self.ui.status(&format!("Save failed: {error}"));
                return SaveStatus::Failed(error);
            }
        };
        let reply = self
            .store
            .save_record(pending.record_id, pending.shape_id, &pending.geometry, &pending.fields)
            .await;
        self.complete_save(&pending, reply)
    }

    /// Save every shape on the canvas, independent of selection. Each shape
    /// is attempted even when an earlier one fails.
    pub async fn save_all(&mut self) -> Vec<(ShapeId, SaveStatus)> {
        let shape_ids = self.engine.shape_ids();
        let mut results = Vec::with_capacity(shape_ids.len());
        for shape_id in shape_ids {
            let status = self.save(shape_id).await;
            results.push((shape_id, status));
        }
        results
    }

    // =========================================================================
    // DELETE
    // =========================================================================

    /// Delete a shape and its annotation record, gated on user confirmation.
    ///
    /// When confirmed, the shape leaves the canvas before the store request
    /// is issued; a request failure therefore leaves the stored record
    /// dangling and is surfaced as drift, not repaired. The default tool is
    /// re-armed after a completed delete.
    pub async fn delete(&mut self, shape_id: ShapeId) -> DeleteStatus {
        if !self.engine.contains(shape_id) {
            return DeleteStatus::Unknown;
        }
        if !self.ui.confirm_delete(shape_id) {
            return DeleteStatus::Cancelled;
        }

        self.engine.remove_shape(shape_id);
        self.save_states.remove(shape_id);
        if self.selection.selected() == Some(shape_id) {
            if let Some(event) = self.selection.unselect() {
                self.apply_selection_events(&[event]);
            }
        }

        let status = match self.identity.unbind(shape_id) {
            Some(record) => match self.store.delete_record(record.id).await {
                Ok(()) => {
                    self.ui.status("Deleted annotation.");
                    DeleteStatus::Deleted
                }
                Err(store_error) => {
                    let error = SyncError::RequestFailed(store_error);
                    tracing::error!(
                        error = %error,
                        %shape_id,
                        record_id = record.id,
                        "delete request failed after canvas removal; shape and record have drifted"
                    );
                    self.ui.status(
                        "Warning: shape removed from the canvas but its stored annotation could not be deleted.",
                    );
                    DeleteStatus::Drifted(error)
                }
            },
            // Never saved: nothing persisted, nothing to request.
            None => {
                self.ui.status("Deleted annotation.");
                DeleteStatus::Deleted
            }
        };

        self.refresh_overview();
        let change = self.tools.activate_default();
        self.apply_tool_change(change);
        status
    }

    /// Overview "delete" action: resolve a record to its shape, center on
    /// it, then run the confirmed delete flow.
    pub async fn delete_by_record_id(&mut self, record_id: RecordId) -> DeleteStatus {
        let Some(shape_id) = self.identity.shape_for(record_id) else {
            return DeleteStatus::Unknown;
        };
        self.select_by_id_and_center(shape_id);
        self.delete(shape_id).await
    }

    // =========================================================================
    // LOAD
    // =========================================================================

    /// Load persisted shapes into the canvas, marked `Saved`. Entries with
    /// malformed geometry are skipped with a warning; the rest still load.
    /// The view is fit to the union extent of what loaded.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RequestFailed`] when the listing itself fails;
    /// the failure is also surfaced on the status line.
    pub async fn load_shapes(&mut self) -> Result<usize, SyncError> {
        let stored = match self.store.list_shapes().await {
            Ok(stored) => stored,
            Err(store_error) => {
                let error = SyncError::RequestFailed(store_error);
                self.ui.status(&format!("Failed to load shapes: {error}"));
                return Err(error);
            }
        };

        let mut extent: Option<Bounds> = None;
        let mut loaded = 0;
        for shape in stored {
            match geometry::decode(&shape.geometry) {
                Ok(decoded) => {
                    if let Some(bounds) = decoded.bounds() {
                        extent = Some(extent.map_or(bounds, |acc| acc.union(bounds)));
                    }
                    self.save_states.set(shape.shape_id, SaveState::Saved, false);
                    self.engine.insert_shape(shape.shape_id, decoded);
                    loaded += 1;
                }
                Err(error) => {
                    tracing::warn!(error = %error, shape_id = %shape.shape_id, "skipping stored shape with malformed geometry");
                }
            }
        }

        if let Some(bounds) = extent {
            self.engine.fit_view(bounds);
        }
        tracing::info!(loaded, "loaded persisted shapes");
        Ok(loaded)
    }

    /// Load annotation records, rebuild the identity map, re-render the
    /// overview, and refresh the detail view when the selected shape is
    /// bound.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RequestFailed`] when the listing fails; the
    /// failure is also surfaced on the status line.
    pub async fn load_records(&mut self) -> Result<usize, SyncError> {
        let records = match self.store.list_records().await {
            Ok(records) => records,
            Err(store_error) => {
                let error = SyncError::RequestFailed(store_error);
                self.ui.status(&format!("Failed to load annotations: {error}"));
                return Err(error);
            }
        };

        let loaded = records.len();
        self.identity.clear();
        for record in records {
            self.identity.bind(record);
        }
        self.refresh_overview();

        if let Some(shape_id) = self.selection.selected() {
            if let Some(record) = self.identity.record(shape_id) {
                self.ui.show_detail(&record.fields);
            }
        }
        tracing::info!(loaded, "loaded annotation records");
        Ok(loaded)
    }

    fn refresh_overview(&mut self) {
        let records = self.identity.records();
        self.ui.show_overview(&records);
    }
}
