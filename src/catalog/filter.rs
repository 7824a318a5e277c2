//! FilterState - active facets and sort key for a catalog browsing session.
//!
//! Setters only mutate; nothing is fetched until the engine's
//! `apply_filters` is called.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::compare::effective_price;
use super::product::Product;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Most ratings first.
    #[default]
    Popular,
    /// Highest average rating first.
    Rating,
    Newest,
    PriceAsc,
    PriceDesc,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Popular => "popular",
            SortBy::Rating => "rating",
            SortBy::Newest => "newest",
            SortBy::PriceAsc => "price_asc",
            SortBy::PriceDesc => "price_desc",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(SortBy::Popular),
            "rating" => Ok(SortBy::Rating),
            "newest" => Ok(SortBy::Newest),
            "price_asc" => Ok(SortBy::PriceAsc),
            "price_desc" => Ok(SortBy::PriceDesc),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

/// Inclusive bounds on effective price. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Server-side facet.
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
    pub colors: BTreeSet<String>,
    pub sizes: BTreeSet<String>,
    pub style: Option<String>,
    pub sort_by: SortBy,
}

impl FilterState {
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }

    pub fn set_price_range(&mut self, range: Option<PriceRange>) {
        self.price_range = range;
    }

    /// Add the color if absent, remove it if present.
    pub fn toggle_color(&mut self, color: &str) {
        toggle(&mut self.colors, color);
    }

    pub fn toggle_size(&mut self, size: &str) {
        toggle(&mut self.sizes, size);
    }

    pub fn set_style(&mut self, style: Option<String>) {
        self.style = style;
    }

    pub fn set_sort(&mut self, sort_by: SortBy) {
        self.sort_by = sort_by;
    }

    /// Back to defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// True if the product passes every client-side facet. The category
    /// facet is applied by the store and is not rechecked here.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(range) = &self.price_range {
            if !range.contains(effective_price(product)) {
                return false;
            }
        }
        if !intersects(&self.colors, &product.colors) {
            return false;
        }
        if !intersects(&self.sizes, &product.sizes) {
            return false;
        }
        match &self.style {
            Some(style) => product.style.as_deref() == Some(style.as_str()),
            None => true,
        }
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

/// An empty selection matches everything.
fn intersects(selected: &BTreeSet<String>, values: &[String]) -> bool {
    selected.is_empty() || values.iter().any(|v| selected.contains(v))
}
