//! Protocol-level error taxonomy.
//!
//! Every failure the sync protocol can hit is folded into one of three
//! shapes: a geometry that cannot be encoded or decoded, a transport-level
//! store failure, or a store-side per-field validation rejection. All of
//! them are absorbed at the protocol boundary and surfaced as user-visible
//! status; nothing propagates as an uncaught fault.

use crate::geometry::GeometryError;
use crate::ident::{FieldErrors, ShapeId};
use crate::store::StoreError;

/// A failure handled at the sync-protocol boundary.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A shape's geometry could not be encoded, or a stored payload could
    /// not be decoded. The affected record is skipped.
    #[error("malformed geometry for shape {shape_id}: {source}")]
    MalformedGeometry {
        /// Shape whose geometry failed the codec.
        shape_id: ShapeId,
        /// Underlying codec failure.
        #[source]
        source: GeometryError,
    },
    /// The annotation store request failed at the transport or service
    /// level. Optimistic save-state is rolled back; deletes leave drift.
    #[error("annotation store request failed: {0}")]
    RequestFailed(#[from] StoreError),
    /// The store rejected individual fields. Displayed per field; no local
    /// state is mutated.
    #[error("annotation store rejected {} field(s)", .errors.len())]
    ValidationFailed {
        /// Field name → rejection message.
        errors: FieldErrors,
    },
    /// The operation referenced a shape the canvas no longer contains.
    #[error("no shape with id {0} on the canvas")]
    UnknownShape(ShapeId),
}
