//! Cursor - opaque "resume after this sort key" handle.
//!
//! A cursor is only ever derived from a document returned by a fetch. It
//! carries the ordering field, that document's sort value and its id (the
//! tie-break key), so resuming after it is unambiguous even when several
//! documents share a sort value.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::query::OrderBy;

/// Error type for cursor token decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    /// The token is empty.
    Empty,
    /// The token is not valid base64url.
    Encoding(String),
    /// The decoded payload is not a cursor.
    Malformed(String),
    /// The token decodes but was not issued by this paginator.
    Unknown,
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorError::Empty => write!(f, "cursor token is empty"),
            CursorError::Encoding(msg) => write!(f, "cursor token encoding error: {}", msg),
            CursorError::Malformed(msg) => write!(f, "malformed cursor token: {}", msg),
            CursorError::Unknown => write!(f, "cursor token does not match an issued cursor"),
        }
    }
}

impl std::error::Error for CursorError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CursorToken {
    f: String,
    v: Value,
    id: String,
}

/// Keyset position: the sort key of one fetched document.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    field: String,
    sort_value: Value,
    document_id: String,
}

impl Cursor {
    /// Derive the cursor for `doc` under `order_by`.
    pub(crate) fn from_document(doc: &Document, order_by: &OrderBy) -> Self {
        Self {
            field: order_by.field.clone(),
            sort_value: doc.value_of(&order_by.field),
            document_id: doc.id.clone(),
        }
    }

    /// Ordering field this cursor was taken on.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Sort value of the anchoring document.
    pub fn sort_value(&self) -> &Value {
        &self.sort_value
    }

    /// Id of the anchoring document (tie-break key).
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Opaque URL-safe token for handing the cursor to a client.
    pub fn token(&self) -> String {
        let token = CursorToken {
            f: self.field.clone(),
            v: self.sort_value.clone(),
            id: self.document_id.clone(),
        };
        // Serializing a struct of strings and a Value cannot fail.
        let bytes = serde_json::to_vec(&token).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Decode a token previously produced by [`Cursor::token`]. Callers go
    /// through `CursorPaginator::resolve_token`, which only accepts cursors
    /// it handed out.
    pub(crate) fn from_token(token: &str) -> Result<Self, CursorError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CursorError::Empty);
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| CursorError::Encoding(e.to_string()))?;
        let decoded: CursorToken =
            serde_json::from_slice(&bytes).map_err(|e| CursorError::Malformed(e.to_string()))?;

        if decoded.f.is_empty() || decoded.id.is_empty() {
            return Err(CursorError::Malformed("empty field or document id".into()));
        }

        Ok(Self {
            field: decoded.f,
            sort_value: decoded.v,
            document_id: decoded.id,
        })
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} (id {})", self.field, self.sort_value, self.document_id)
    }
}
