//! HybridFilterSortEngine - client-side facets and sorts over a bounded
//! candidate window.
//!
//! The store can only combine a couple of equality predicates with one
//! ordering, so the engine asks it for the newest `candidate_cap` published
//! products (optionally in one category) in a single round trip, then applies
//! the remaining facets and the chosen sort in memory. Filtering and sorting
//! are exact within that window; products older than the window are never
//! considered.
//!
//! ## Example
//!
//! ```ignore
//! use storefront_paging::catalog::{EngineConfig, HybridFilterSortEngine, PriceRange, SortBy};
//!
//! let mut engine = HybridFilterSortEngine::new(backend.clone(), EngineConfig::default())?;
//! engine.filters_mut().set_price_range(Some(PriceRange::between(50.0, 100.0)));
//! engine.filters_mut().set_sort(SortBy::PriceAsc);
//!
//! let first = engine.apply_filters()?;
//! let second = engine.next_page()?;
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::compare::sort_products;
use super::filter::FilterState;
use super::product::Product;
use crate::backend::DocumentBackend;
use crate::error::{PageError, Step};
use crate::page::{total_pages, PageResult, PaginationInfo};
use crate::query::{OrderBy, Predicate, QueryError, QuerySpec};

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub collection: String,
    pub page_size: usize,
    /// Upper bound on products fetched per `apply_filters`.
    pub candidate_cap: usize,
    pub published_field: String,
    pub created_field: String,
    pub category_field: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collection: "products".into(),
            page_size: 9,
            candidate_cap: 50,
            published_field: "published".into(),
            created_field: "created_at".into(),
            category_field: "category".into(),
        }
    }
}

/// Distinct facet values present in the candidate window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetSummary {
    pub colors: BTreeSet<String>,
    pub sizes: BTreeSet<String>,
    pub styles: BTreeSet<String>,
}

impl FacetSummary {
    fn collect(products: &[Product]) -> Self {
        let mut summary = Self::default();
        for product in products {
            summary.colors.extend(product.colors.iter().cloned());
            summary.sizes.extend(product.sizes.iter().cloned());
            summary.styles.extend(product.style.iter().cloned());
        }
        summary
    }
}

pub struct HybridFilterSortEngine<B> {
    backend: B,
    config: EngineConfig,
    base_query: QuerySpec,
    filters: FilterState,
    filtered: Option<Vec<Product>>,
    facets: FacetSummary,
    current_page: u64,
}

impl<B: DocumentBackend> HybridFilterSortEngine<B> {
    pub fn new(backend: B, config: EngineConfig) -> Result<Self, QueryError> {
        if config.page_size == 0 {
            return Err(QueryError::ZeroPageSize);
        }
        if config.candidate_cap == 0 {
            return Err(QueryError::ZeroLimit);
        }
        let base_query = QuerySpec::new(
            config.collection.clone(),
            OrderBy::desc(config.created_field.clone()),
            config.page_size,
        )?
        .filter(Predicate::equals(config.published_field.clone(), Value::Bool(true)));

        Ok(Self {
            backend,
            config,
            base_query,
            filters: FilterState::default(),
            filtered: None,
            facets: FacetSummary::default(),
            current_page: 1,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Facet setters live on `FilterState`; changes take effect on the next
    /// `apply_filters`.
    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    /// The retained filtered and sorted window, if loaded.
    pub fn filtered(&self) -> Option<&[Product]> {
        self.filtered.as_deref()
    }

    pub fn available_facets(&self) -> &FacetSummary {
        &self.facets
    }

    pub fn total(&self) -> u64 {
        self.filtered.as_ref().map_or(0, |f| f.len() as u64)
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.total(), self.config.page_size)
    }

    pub fn pagination_info(&self) -> PaginationInfo {
        PaginationInfo {
            current_page: self.current_page,
            total_pages: self.total_pages(),
            total: self.filtered.as_ref().map(|f| f.len() as u64),
        }
    }

    /// Store-side query for the current filters: published, optionally one
    /// category, newest first.
    pub fn candidate_query(&self) -> QuerySpec {
        let query = self.base_query.clone();
        match &self.filters.category {
            Some(category) => query.filter(Predicate::equals(
                self.config.category_field.clone(),
                Value::String(category.clone()),
            )),
            None => query,
        }
    }

    /// Refetch the candidate window, filter and sort it, and return page 1.
    pub fn apply_filters(&mut self) -> Result<PageResult<Product>, PageError> {
        let query = self.candidate_query();
        let docs = self
            .backend
            .fetch(&query, None, self.config.candidate_cap)?;

        if docs.len() >= self.config.candidate_cap {
            warn!(
                cap = self.config.candidate_cap,
                "candidate window is full; older products are not considered"
            );
        }

        let mut candidates = Vec::with_capacity(docs.len());
        for doc in &docs {
            match Product::from_document(doc) {
                Ok(product) => candidates.push(product),
                Err(err) => warn!(id = doc.id.as_str(), error = %err, "skipping malformed product"),
            }
        }

        let facets = FacetSummary::collect(&candidates);
        let mut filtered: Vec<Product> = candidates
            .into_iter()
            .filter(|p| self.filters.matches(p))
            .collect();
        sort_products(&mut filtered, self.filters.sort_by);

        debug!(
            candidates = docs.len(),
            matched = filtered.len(),
            sort = %self.filters.sort_by,
            "filters applied"
        );

        self.filtered = Some(filtered);
        self.facets = facets;
        self.current_page = 1;
        Ok(self.slice(1))
    }

    /// Page `n` of the retained window; no remote call once loaded.
    pub fn load_page(&mut self, n: u64) -> Result<PageResult<Product>, PageError> {
        if self.filtered.is_none() {
            self.apply_filters()?;
        }
        let pages = self.total_pages();
        if n < 1 || n > pages.max(1) {
            return Err(PageError::InvalidPage {
                requested: n,
                total_pages: pages,
            });
        }
        self.current_page = n;
        Ok(self.slice(n))
    }

    pub fn next_page(&mut self) -> Result<PageResult<Product>, PageError> {
        if self.filtered.is_none() {
            self.apply_filters()?;
        }
        let pages = self.total_pages();
        if self.current_page >= pages {
            return Err(PageError::OutOfRange {
                step: Step::Next,
                current_page: self.current_page,
                total_pages: pages,
            });
        }
        self.load_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> Result<PageResult<Product>, PageError> {
        if self.current_page <= 1 {
            return Err(PageError::OutOfRange {
                step: Step::Previous,
                current_page: self.current_page,
                total_pages: self.total_pages(),
            });
        }
        self.load_page(self.current_page - 1)
    }

    /// Reset every facet and the sort key, then refetch.
    pub fn clear_filters(&mut self) -> Result<PageResult<Product>, PageError> {
        self.filters.clear();
        self.apply_filters()
    }

    fn slice(&self, n: u64) -> PageResult<Product> {
        let filtered = self.filtered.as_deref().unwrap_or_default();
        let page_size = self.config.page_size;
        let start = ((n - 1) as usize * page_size).min(filtered.len());
        let end = (start + page_size).min(filtered.len());
        PageResult::new(
            filtered[start..end].to_vec(),
            n,
            filtered.len() as u64,
            page_size,
        )
    }
}
