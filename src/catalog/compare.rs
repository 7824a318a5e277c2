//! Derived product metrics and the comparator for each sort key.

use std::cmp::Ordering;

use super::filter::SortBy;
use super::product::{Product, RatingHistogram};

/// `base_price * (1 - discount)`.
pub fn effective_price(product: &Product) -> f64 {
    product.base_price * (1.0 - product.discount)
}

/// Number of ratings across all star levels. Empty histogram is `0`.
pub fn total_ratings(histogram: &RatingHistogram) -> u64 {
    histogram.values().sum()
}

/// `sum(stars * count) / sum(count)`. Empty histogram is `0.0`.
pub fn average_rating(histogram: &RatingHistogram) -> f64 {
    let count = total_ratings(histogram);
    if count == 0 {
        return 0.0;
    }
    let weighted: u64 = histogram
        .iter()
        .map(|(&stars, &n)| u64::from(stars) * n)
        .sum();
    weighted as f64 / count as f64
}

/// Ordering of two products under `sort_by`. Equal products compare
/// `Equal`, so a stable sort keeps their input order.
pub fn compare(sort_by: SortBy, a: &Product, b: &Product) -> Ordering {
    match sort_by {
        SortBy::Popular => total_ratings(&b.ratings).cmp(&total_ratings(&a.ratings)),
        SortBy::Rating => average_rating(&b.ratings).total_cmp(&average_rating(&a.ratings)),
        SortBy::Newest => b.created_at.cmp(&a.created_at),
        SortBy::PriceAsc => effective_price(a).total_cmp(&effective_price(b)),
        SortBy::PriceDesc => effective_price(b).total_cmp(&effective_price(a)),
    }
}

/// Stable in-place sort.
pub fn sort_products(products: &mut [Product], sort_by: SortBy) {
    products.sort_by(|a, b| compare(sort_by, a, b));
}
