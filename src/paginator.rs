//! CursorPaginator - page-indexed navigation over a keyset-only store.
//!
//! The store can only resume after a cursor, so every visited page is cached
//! with its first/last cursors. Jumping to an unvisited page walks the ordered
//! prefix up to that page's offset (O(offset) documents transferred), starting
//! from the nearest cached page before it when one exists.
//!
//! Every navigation method performs its remote calls first and commits
//! `current_page`, `total` and the cache only once all of them succeeded. A
//! failed call leaves the paginator exactly as it was.
//!
//! ## Example
//!
//! ```ignore
//! use storefront_paging::{CursorPaginator, InMemoryBackend, OrderBy, QuerySpec};
//!
//! let spec = QuerySpec::new("orders", OrderBy::desc("created_at"), 20)?;
//! let mut pages = CursorPaginator::new(backend.clone(), spec);
//!
//! let first = pages.get_first_page()?;
//! let third = pages.go_to_page(3)?;
//! let info = pages.get_pagination_info();
//! ```

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::backend::DocumentBackend;
use crate::cursor::{Cursor, CursorError};
use crate::document::Document;
use crate::error::{PageError, Step};
use crate::page::{total_pages, PageResult, PaginationInfo};
use crate::query::QuerySpec;

/// One visited page and its keyset anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage {
    pub first_cursor: Option<Cursor>,
    pub last_cursor: Option<Cursor>,
    pub items: Vec<Document>,
}

impl CachedPage {
    fn from_items(items: Vec<Document>, query: &QuerySpec) -> Self {
        let order = query.order_by();
        Self {
            first_cursor: items.first().map(|d| Cursor::from_document(d, order)),
            last_cursor: items.last().map(|d| Cursor::from_document(d, order)),
            items,
        }
    }
}

/// Page-indexed access to one ordered, filtered query.
pub struct CursorPaginator<B> {
    backend: B,
    query: QuerySpec,
    current_page: u64,
    total: Option<u64>,
    cache: BTreeMap<u64, CachedPage>,
}

impl<B: DocumentBackend> CursorPaginator<B> {
    pub fn new(backend: B, query: QuerySpec) -> Self {
        Self {
            backend,
            query,
            current_page: 1,
            total: None,
            cache: BTreeMap::new(),
        }
    }

    pub fn query(&self) -> &QuerySpec {
        &self.query
    }

    pub fn page_size(&self) -> usize {
        self.query.page_size()
    }

    /// Replace the query. Cached cursors belong to the old predicate set, so
    /// the cache, the current page and the total are all dropped.
    pub fn set_query(&mut self, query: QuerySpec) {
        self.query = query;
        self.cache.clear();
        self.current_page = 1;
        self.total = None;
    }

    /// Count matching documents and store the total. A smaller total pulls
    /// the current page back onto the last page.
    pub fn get_total_count(&mut self) -> Result<u64, PageError> {
        let total = self.backend.count(&self.query)?;
        debug!(collection = self.query.collection(), total, "counted documents");
        self.total = Some(total);
        let last = total_pages(total, self.page_size()).max(1);
        if self.current_page > last {
            self.current_page = last;
        }
        Ok(total)
    }

    /// Pages derived from the last count; `0` before any count.
    pub fn total_pages(&self) -> u64 {
        self.total
            .map(|t| total_pages(t, self.page_size()))
            .unwrap_or(0)
    }

    pub fn get_pagination_info(&self) -> PaginationInfo {
        PaginationInfo {
            current_page: self.current_page,
            total_pages: self.total_pages(),
            total: self.total,
        }
    }

    pub fn cached_page(&self, n: u64) -> Option<&CachedPage> {
        self.cache.get(&n)
    }

    /// Match a client-held token against the cursors this paginator issued.
    /// Tokens that decode but were never handed out are rejected.
    pub fn resolve_token(&self, token: &str) -> Result<&Cursor, CursorError> {
        let decoded = Cursor::from_token(token)?;
        self.cache
            .values()
            .flat_map(|page| [page.first_cursor.as_ref(), page.last_cursor.as_ref()])
            .flatten()
            .find(|cursor| **cursor == decoded)
            .ok_or(CursorError::Unknown)
    }

    /// Page numbers currently held in the cursor cache.
    pub fn cached_pages(&self) -> Vec<u64> {
        self.cache.keys().copied().collect()
    }

    pub fn get_first_page(&mut self) -> Result<PageResult<Document>, PageError> {
        let total = self.known_total()?;
        let items = self.backend.fetch(&self.query, None, self.page_size())?;
        Ok(self.commit(1, CachedPage::from_items(items, &self.query), total))
    }

    pub fn get_next_page(&mut self) -> Result<PageResult<Document>, PageError> {
        let total = self.known_total()?;
        let pages = total_pages(total, self.page_size());
        if self.current_page >= pages {
            return Err(PageError::OutOfRange {
                step: Step::Next,
                current_page: self.current_page,
                total_pages: pages,
            });
        }

        let target = self.current_page + 1;
        let anchor = self
            .cache
            .get(&self.current_page)
            .and_then(|page| page.last_cursor.clone());

        let page = match anchor {
            Some(cursor) => {
                let items = self
                    .backend
                    .fetch(&self.query, Some(&cursor), self.page_size())?;
                CachedPage::from_items(items, &self.query)
            }
            // Current page was never fetched (e.g. right after `reset`).
            None => self.locate(target)?,
        };
        Ok(self.commit(target, page, total))
    }

    pub fn get_previous_page(&mut self) -> Result<PageResult<Document>, PageError> {
        if self.current_page <= 1 {
            return Err(PageError::OutOfRange {
                step: Step::Previous,
                current_page: self.current_page,
                total_pages: self.total_pages(),
            });
        }

        let total = self.known_total()?;
        let target = self.current_page - 1;
        let page = match self.cache.get(&target) {
            Some(page) => page.clone(),
            // Only reachable after a direct jump past unvisited pages.
            None => self.locate(target)?,
        };
        Ok(self.commit(target, page, total))
    }

    /// Jump to page `n` (1-based).
    pub fn go_to_page(&mut self, n: u64) -> Result<PageResult<Document>, PageError> {
        let total = self.known_total()?;
        let pages = total_pages(total, self.page_size());
        if n < 1 || n > pages {
            return Err(PageError::InvalidPage {
                requested: n,
                total_pages: pages,
            });
        }

        let page = match self.cache.get(&n) {
            Some(page) => {
                debug!(page = n, cached = true, "serving page from cursor cache");
                page.clone()
            }
            None => self.locate(n)?,
        };
        Ok(self.commit(n, page, total))
    }

    /// Drop the cursor cache and return to page 1. The total is kept until
    /// the next `get_total_count`.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.current_page = 1;
    }

    /// `reset` followed by a fresh count.
    pub fn refresh(&mut self) -> Result<u64, PageError> {
        let total = self.backend.count(&self.query)?;
        self.reset();
        self.total = Some(total);
        Ok(total)
    }

    fn known_total(&self) -> Result<u64, PageError> {
        match self.total {
            Some(total) => Ok(total),
            None => Ok(self.backend.count(&self.query)?),
        }
    }

    /// Fetch page `n` without touching state, walking the ordered prefix from
    /// the closest cached page before it.
    fn locate(&self, n: u64) -> Result<CachedPage, PageError> {
        let page_size = self.page_size();
        let offset = (n - 1) as usize * page_size;

        let anchor = self
            .cache
            .range(..n)
            .next_back()
            .and_then(|(&k, page)| page.last_cursor.clone().map(|c| (k, c)));

        let (skip, start) = match anchor {
            Some((k, cursor)) => ((n - 1 - k) as usize * page_size, Some(cursor)),
            None => (offset, None),
        };

        let cursor = if skip == 0 {
            start
        } else {
            warn!(
                page = n,
                skip,
                "walking ordered prefix to reach unvisited page"
            );
            let prefix = self.backend.fetch(&self.query, start.as_ref(), skip)?;
            if prefix.len() < skip {
                // Offset is past the rows that exist now; serve the first page.
                None
            } else {
                prefix
                    .last()
                    .map(|d| Cursor::from_document(d, self.query.order_by()))
            }
        };

        let items = self
            .backend
            .fetch(&self.query, cursor.as_ref(), page_size)?;
        Ok(CachedPage::from_items(items, &self.query))
    }

    fn commit(&mut self, n: u64, page: CachedPage, total: u64) -> PageResult<Document> {
        let content = page.items.clone();
        self.cache.insert(n, page);
        self.current_page = n;
        self.total = Some(total);
        debug!(page = n, total, items = content.len(), "page committed");
        PageResult::new(content, n, total, self.page_size())
    }
}
