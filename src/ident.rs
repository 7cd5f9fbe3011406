//! Identity map: which canvas shape corresponds to which stored annotation.
//!
//! DESIGN
//! ======
//! Shapes carry session-stable local ids assigned by the canvas engine;
//! persisted annotation records carry server-assigned keys. The map is the
//! only component allowed to translate between the two, in both directions:
//! the sync protocol resolves a shape to its record on save/delete, and the
//! overview listing resolves a displayed record back to a shape for
//! centering and selection. A shape with no binding is a normal state
//! (drawn, never saved), not an error.

#[cfg(test)]
#[path = "ident_test.rs"]
mod ident_test;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session-stable local identifier of a canvas shape.
pub type ShapeId = Uuid;

/// Server-assigned key of a persisted annotation record.
pub type RecordId = i64;

/// Domain-specific annotation field values, opaque to the sync core.
pub type FieldMap = BTreeMap<String, serde_json::Value>;

/// Per-field validation messages reported by the annotation store.
pub type FieldErrors = BTreeMap<String, String>;

/// The persisted counterpart of a canvas shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Server-assigned record key.
    pub id: RecordId,
    /// Local id of the shape this record annotates.
    pub shape_id: ShapeId,
    /// Opaque domain fields.
    pub fields: FieldMap,
}

/// Bidirectional shape-id ↔ record association table.
#[derive(Debug, Default)]
pub struct IdentityMap {
    by_shape: HashMap<ShapeId, AnnotationRecord>,
    by_record: HashMap<RecordId, ShapeId>,
}

impl IdentityMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a shape to a record, replacing any previous binding on either
    /// side. Re-binding the same shape updates the record in place.
    pub fn bind(&mut self, record: AnnotationRecord) {
        if let Some(previous) = self.by_shape.insert(record.shape_id, record.clone()) {
            if previous.id != record.id {
                self.by_record.remove(&previous.id);
            }
        }
        if let Some(stale_shape) = self.by_record.insert(record.id, record.shape_id) {
            if stale_shape != record.shape_id {
                self.by_shape.remove(&stale_shape);
            }
        }
    }

    /// The record bound to a shape, if any.
    #[must_use]
    pub fn record(&self, shape_id: ShapeId) -> Option<&AnnotationRecord> {
        self.by_shape.get(&shape_id)
    }

    /// The record key bound to a shape, if any.
    #[must_use]
    pub fn record_id(&self, shape_id: ShapeId) -> Option<RecordId> {
        self.by_shape.get(&shape_id).map(|record| record.id)
    }

    /// The shape a record is bound to, if any.
    #[must_use]
    pub fn shape_for(&self, record_id: RecordId) -> Option<ShapeId> {
        self.by_record.get(&record_id).copied()
    }

    /// Remove and return a shape's binding.
    pub fn unbind(&mut self, shape_id: ShapeId) -> Option<AnnotationRecord> {
        let record = self.by_shape.remove(&shape_id)?;
        self.by_record.remove(&record.id);
        Some(record)
    }

    /// Drop all bindings.
    pub fn clear(&mut self) {
        self.by_shape.clear();
        self.by_record.clear();
    }

    /// All bound records, ordered by record key for stable listings.
    #[must_use]
    pub fn records(&self) -> Vec<&AnnotationRecord> {
        let mut records: Vec<&AnnotationRecord> = self.by_shape.values().collect();
        records.sort_by_key(|record| record.id);
        records
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_shape.len()
    }

    /// True when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_shape.is_empty()
    }
}
