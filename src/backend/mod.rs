//! Backend - the keyset-only document store contract.
//!
//! A backend can count the documents matching a `QuerySpec` and fetch an
//! ordered run of them, optionally resuming after a cursor. There is no
//! offset or skip primitive; everything page-indexed is built on top of
//! these two calls.
//!
//! ## Example
//!
//! ```ignore
//! use storefront_paging::{DocumentBackend, InMemoryBackend, OrderBy, QuerySpec};
//!
//! let backend = InMemoryBackend::new();
//! backend.insert_json("products", json!({"id": "p1", "created_at": 1}))?;
//!
//! let spec = QuerySpec::new("products", OrderBy::desc("created_at"), 10)?;
//! let total = backend.count(&spec)?;
//! let first = backend.fetch(&spec, None, spec.page_size())?;
//! ```

mod in_memory;

use std::fmt;

use crate::cursor::Cursor;
use crate::document::Document;
use crate::query::QuerySpec;

/// Maximum number of predicates a single query may carry.
pub const MAX_PREDICATES: usize = 2;

/// Error type for document store calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Transport failure or the store is down.
    Unavailable(String),
    /// The predicate/order combination cannot be served by the store.
    UnsupportedQuery(String),
    /// The cursor was not taken on this query's ordering field.
    InvalidCursor(String),
    /// Storage-level error.
    Storage(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            BackendError::UnsupportedQuery(msg) => write!(f, "unsupported query: {}", msg),
            BackendError::InvalidCursor(msg) => write!(f, "invalid cursor: {}", msg),
            BackendError::Storage(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

/// Keyset-paginated document store.
pub trait DocumentBackend {
    /// Count documents matching the query's predicates.
    fn count(&self, query: &QuerySpec) -> Result<u64, BackendError>;

    /// Fetch up to `limit` matching documents in query order, starting
    /// strictly after `after` when given.
    fn fetch(
        &self,
        query: &QuerySpec,
        after: Option<&Cursor>,
        limit: usize,
    ) -> Result<Vec<Document>, BackendError>;
}

impl<B: DocumentBackend + ?Sized> DocumentBackend for &B {
    fn count(&self, query: &QuerySpec) -> Result<u64, BackendError> {
        (**self).count(query)
    }

    fn fetch(
        &self,
        query: &QuerySpec,
        after: Option<&Cursor>,
        limit: usize,
    ) -> Result<Vec<Document>, BackendError> {
        (**self).fetch(query, after, limit)
    }
}

pub use in_memory::{BackendStats, InMemoryBackend};
