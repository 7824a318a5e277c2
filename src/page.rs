//! PageResult - the value object both pagination strategies hand to rendering.

use serde::Serialize;

/// Number of pages needed for `total` items; `0` when `total == 0`.
pub fn total_pages(total: u64, page_size: usize) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size as u64)
}

/// One rendered page plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    pub content: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PageResult<T> {
    pub(crate) fn new(content: Vec<T>, current_page: u64, total: u64, page_size: usize) -> Self {
        let total_pages = total_pages(total, page_size);
        Self {
            content,
            current_page,
            total_pages,
            total,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Read-only navigation snapshot (`getPaginationInfo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub current_page: u64,
    pub total_pages: u64,
    /// `None` until a count has been taken.
    pub total: Option<u64>,
}
