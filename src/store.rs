//! Annotation store: the persistence service behind the sync protocol.
//!
//! DESIGN
//! ======
//! The store is a capability trait so each deployment target implements it
//! once and the sync protocol depends only on the interface. The crate ships
//! [`HttpStore`], a JSON/REST implementation. Requests carry the geometry
//! codec's transport format; record fields stay an opaque string-keyed map.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ident::{AnnotationRecord, FieldErrors, FieldMap, RecordId, ShapeId};

// =============================================================================
// TYPES
// =============================================================================

/// Error returned by annotation store requests.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Transport-level failure: connection, timeout, non-2xx status, or an
    /// undecodable response body.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service reported failure without per-field errors.
    #[error("store reported failure: {0}")]
    Service(String),
    /// The service replied with a body the protocol cannot use.
    #[error("invalid store reply: {0}")]
    InvalidReply(&'static str),
}

/// A persisted shape geometry as listed by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredShape {
    /// Local id the shape was persisted under.
    pub shape_id: ShapeId,
    /// Transport-encoded geometry payload.
    pub geometry: Value,
}

/// Terminal reply to a save request.
#[derive(Clone, Debug, PartialEq)]
pub enum SaveReply {
    /// The record was created or updated.
    Saved(AnnotationRecord),
    /// The store rejected individual fields; nothing was persisted.
    Rejected(FieldErrors),
}

/// Capabilities the sync protocol requires of the persistence service.
///
/// Single-threaded embedders drive these futures on their event loop; no
/// `Send` bound is imposed.
#[allow(async_fn_in_trait)]
pub trait AnnotationStore {
    /// List every persisted shape geometry for the current image.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or service failure.
    async fn list_shapes(&self) -> Result<Vec<StoredShape>, StoreError>;

    /// List every annotation record for the current image.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or service failure.
    async fn list_records(&self) -> Result<Vec<AnnotationRecord>, StoreError>;

    /// Create (`record_id: None`) or update a record with the given
    /// geometry and fields.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or service failure. Per-field
    /// rejections are the `Ok(SaveReply::Rejected)` reply, not an error.
    async fn save_record(
        &self,
        record_id: Option<RecordId>,
        shape_id: ShapeId,
        geometry: &Value,
        fields: &FieldMap,
    ) -> Result<SaveReply, StoreError>;

    /// Delete a record by its key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or service failure.
    async fn delete_record(&self, record_id: RecordId) -> Result<(), StoreError>;
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

#[derive(Serialize)]
struct SaveRequestBody<'a> {
    shape_id: ShapeId,
    geometry: &'a Value,
    fields: &'a FieldMap,
}

#[derive(Deserialize)]
struct SaveResponseBody {
    success: bool,
    #[serde(default)]
    record: Option<AnnotationRecord>,
    #[serde(default)]
    errors: FieldErrors,
}

#[derive(Deserialize)]
struct DeleteResponseBody {
    success: bool,
    #[serde(default)]
    errors: FieldErrors,
}

fn join_errors(errors: &FieldErrors) -> String {
    if errors.is_empty() {
        return "no detail provided".to_owned();
    }
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// HTTP IMPLEMENTATION
// =============================================================================

/// JSON/REST annotation store client.
///
/// Endpoints, relative to the base URL:
/// `GET shapes`, `GET annotations`, `POST annotations` (create),
/// `PUT annotations/{id}` (update), `DELETE annotations/{id}`.
#[derive(Clone, Debug)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    /// Create a client for the store rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into() }
    }

    /// Create a client reusing an existing `reqwest::Client` (shared
    /// connection pool, custom timeouts or headers).
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl AnnotationStore for HttpStore {
    async fn list_shapes(&self) -> Result<Vec<StoredShape>, StoreError> {
        let shapes = self
            .client
            .get(self.url("shapes"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(shapes)
    }

    async fn list_records(&self) -> Result<Vec<AnnotationRecord>, StoreError> {
        let records = self
            .client
            .get(self.url("annotations"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(records)
    }

    async fn save_record(
        &self,
        record_id: Option<RecordId>,
        shape_id: ShapeId,
        geometry: &Value,
        fields: &FieldMap,
    ) -> Result<SaveReply, StoreError> {
        let body = SaveRequestBody { shape_id, geometry, fields };
        let request = match record_id {
            Some(id) => self.client.put(self.url(&format!("annotations/{id}"))),
            None => self.client.post(self.url("annotations")),
        };
        let reply: SaveResponseBody = request
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !reply.success {
            return Ok(SaveReply::Rejected(reply.errors));
        }
        let record = reply
            .record
            .ok_or(StoreError::InvalidReply("successful save reply carried no record"))?;
        Ok(SaveReply::Saved(record))
    }

    async fn delete_record(&self, record_id: RecordId) -> Result<(), StoreError> {
        let reply: DeleteResponseBody = self
            .client
            .delete(self.url(&format!("annotations/{record_id}")))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if reply.success {
            Ok(())
        } else {
            Err(StoreError::Service(join_errors(&reply.errors)))
        }
    }
}
