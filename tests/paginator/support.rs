use std::cell::Cell;

use serde_json::json;
use storefront_paging::{
    BackendError, Cursor, Document, DocumentBackend, InMemoryBackend, OrderBy, QuerySpec,
};

pub const COLLECTION: &str = "orders";

/// Store seeded with `ids` in creation order (`created_at` = position).
pub fn seeded(ids: &[&str]) -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    for (i, id) in ids.iter().enumerate() {
        backend
            .insert_json(COLLECTION, json!({"id": id, "created_at": i as i64}))
            .unwrap();
    }
    backend
}

/// Store with `n` rows whose ids sort in creation order.
pub fn numbered(n: usize) -> InMemoryBackend {
    let ids: Vec<String> = (0..n).map(|i| format!("o{:03}", i)).collect();
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    seeded(&refs)
}

pub fn newest_first(page_size: usize) -> QuerySpec {
    QuerySpec::new(COLLECTION, OrderBy::desc("created_at"), page_size).unwrap()
}

pub fn ids(docs: &[Document]) -> Vec<String> {
    docs.iter().map(|d| d.id.clone()).collect()
}

/// Wraps a backend and fails every fetch once `fail_after` fetches have
/// gone through.
pub struct FlakyBackend {
    inner: InMemoryBackend,
    fetches: Cell<usize>,
    fail_after: Cell<Option<usize>>,
}

impl FlakyBackend {
    pub fn new(inner: InMemoryBackend) -> Self {
        Self {
            inner,
            fetches: Cell::new(0),
            fail_after: Cell::new(None),
        }
    }

    pub fn fail_after(&self, fetches: usize) {
        self.fetches.set(0);
        self.fail_after.set(Some(fetches));
    }
}

impl DocumentBackend for FlakyBackend {
    fn count(&self, query: &QuerySpec) -> Result<u64, BackendError> {
        self.inner.count(query)
    }

    fn fetch(
        &self,
        query: &QuerySpec,
        after: Option<&Cursor>,
        limit: usize,
    ) -> Result<Vec<Document>, BackendError> {
        if let Some(budget) = self.fail_after.get() {
            if self.fetches.get() >= budget {
                return Err(BackendError::Unavailable("timeout".into()));
            }
        }
        self.fetches.set(self.fetches.get() + 1);
        self.inner.fetch(query, after, limit)
    }
}
