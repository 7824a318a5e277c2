//! InMemoryBackend - HashMap-backed document store for testing and development.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::{BackendError, DocumentBackend, MAX_PREDICATES};
use crate::cursor::Cursor;
use crate::document::{Document, DocumentError};
use crate::query::{compare_values, Direction, QuerySpec};

/// Call statistics, for observing remote cost.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackendStats {
    pub count_calls: u64,
    pub fetch_calls: u64,
    pub documents_transferred: u64,
}

type Collection = HashMap<String, Document>;

/// In-memory document store with the same capability limits as the remote
/// keyset store.
///
/// Clone-friendly via Arc: clones share documents, statistics and the
/// availability switch.
#[derive(Clone)]
pub struct InMemoryBackend {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
    stats: Arc<RwLock<BackendStats>>,
    available: Arc<AtomicBool>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(BackendStats::default())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Insert or replace a document.
    pub fn insert(&self, collection: &str, doc: Document) -> Result<(), BackendError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| BackendError::Storage("lock poisoned".into()))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(doc.id.clone(), doc);
        Ok(())
    }

    /// Insert a raw JSON document, validating its shape first.
    pub fn insert_json(&self, collection: &str, value: Value) -> Result<(), BackendError> {
        let doc = Document::from_json(value)
            .map_err(|e: DocumentError| BackendError::Storage(e.to_string()))?;
        self.insert(collection, doc)
    }

    /// Delete a document. Returns true if it existed.
    pub fn delete(&self, collection: &str, id: &str) -> Result<bool, BackendError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| BackendError::Storage("lock poisoned".into()))?;
        Ok(collections
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }

    /// Simulate an outage (`false`) or recovery (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, AtomicOrdering::SeqCst);
    }

    /// Snapshot of call statistics.
    pub fn stats(&self) -> BackendStats {
        self.stats.read().map(|s| *s).unwrap_or_default()
    }

    pub fn reset_stats(&self) {
        if let Ok(mut stats) = self.stats.write() {
            *stats = BackendStats::default();
        }
    }

    fn ensure_available(&self) -> Result<(), BackendError> {
        if self.available.load(AtomicOrdering::SeqCst) {
            Ok(())
        } else {
            Err(BackendError::Unavailable("connection refused".into()))
        }
    }

    fn record(&self, update: impl FnOnce(&mut BackendStats)) {
        if let Ok(mut stats) = self.stats.write() {
            update(&mut stats);
        }
    }

    fn check_capability(query: &QuerySpec) -> Result<(), BackendError> {
        let filters = query.filters();
        if filters.len() > MAX_PREDICATES {
            return Err(BackendError::UnsupportedQuery(format!(
                "{} predicates (max {})",
                filters.len(),
                MAX_PREDICATES
            )));
        }

        let ranges: Vec<_> = filters.iter().filter(|p| p.operator.is_range()).collect();
        if ranges.len() > 1 {
            return Err(BackendError::UnsupportedQuery(
                "at most one range predicate per query".into(),
            ));
        }
        if let Some(range) = ranges.first() {
            if range.field != query.order_by().field {
                return Err(BackendError::UnsupportedQuery(format!(
                    "range predicate on {} requires ordering by {}",
                    range.field,
                    query.order_by().field
                )));
            }
        }
        Ok(())
    }

    fn matching(&self, query: &QuerySpec) -> Result<Vec<Document>, BackendError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| BackendError::Storage("lock poisoned".into()))?;

        Ok(collections
            .get(query.collection())
            .map(|docs| {
                docs.values()
                    .filter(|doc| query.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// True if `doc` sorts strictly after the cursor position.
fn is_after(doc: &Document, cursor: &Cursor, direction: Direction) -> bool {
    let ord = compare_values(&doc.value_of(cursor.field()), cursor.sort_value())
        .then_with(|| doc.id.as_str().cmp(cursor.document_id()));
    match direction {
        Direction::Asc => ord == Ordering::Greater,
        Direction::Desc => ord == Ordering::Less,
    }
}

impl DocumentBackend for InMemoryBackend {
    fn count(&self, query: &QuerySpec) -> Result<u64, BackendError> {
        self.ensure_available()?;
        Self::check_capability(query)?;

        let total = self.matching(query)?.len() as u64;
        self.record(|s| s.count_calls += 1);
        Ok(total)
    }

    fn fetch(
        &self,
        query: &QuerySpec,
        after: Option<&Cursor>,
        limit: usize,
    ) -> Result<Vec<Document>, BackendError> {
        self.ensure_available()?;
        Self::check_capability(query)?;

        let order = query.order_by();
        if let Some(cursor) = after {
            if cursor.field() != order.field {
                return Err(BackendError::InvalidCursor(format!(
                    "cursor on {} used with ordering on {}",
                    cursor.field(),
                    order.field
                )));
            }
        }

        let mut docs = self.matching(query)?;
        docs.sort_by(|a, b| order.compare(a, b));

        let page: Vec<Document> = docs
            .into_iter()
            .filter(|doc| after.map_or(true, |c| is_after(doc, c, order.direction)))
            .take(limit)
            .collect();

        let transferred = page.len() as u64;
        self.record(|s| {
            s.fetch_calls += 1;
            s.documents_transferred += transferred;
        });
        Ok(page)
    }
}
