//! Catalog browsing - facets and sorts the store cannot express, applied
//! in memory over a bounded candidate window.
//!
//! ## Example
//!
//! ```ignore
//! use storefront_paging::catalog::{EngineConfig, HybridFilterSortEngine, SortBy};
//!
//! let mut engine = HybridFilterSortEngine::new(backend, EngineConfig::default())?;
//! engine.filters_mut().set_category(Some("dresses".into()));
//! engine.filters_mut().toggle_size("M");
//! engine.filters_mut().set_sort(SortBy::Rating);
//! let page = engine.apply_filters()?;
//! ```

mod compare;
mod engine;
mod filter;
mod product;

pub use compare::{average_rating, compare, effective_price, sort_products, total_ratings};
pub use engine::{EngineConfig, FacetSummary, HybridFilterSortEngine};
pub use filter::{FilterState, PriceRange, SortBy};
pub use product::{Product, RatingHistogram};
