use std::fmt;

use crate::backend::BackendError;

/// Which way a relative navigation was heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Next => f.write_str("next"),
            Step::Previous => f.write_str("previous"),
        }
    }
}

/// Error type for page navigation.
///
/// `InvalidPage` and `OutOfRange` are expected conditions: state is left
/// untouched and the caller keeps rendering the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Requested page is outside `[1, total_pages]`.
    InvalidPage { requested: u64, total_pages: u64 },
    /// Next/previous requested at a boundary.
    OutOfRange {
        step: Step,
        current_page: u64,
        total_pages: u64,
    },
    /// The document store failed; passed through unchanged.
    BackendUnavailable(BackendError),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::InvalidPage {
                requested,
                total_pages,
            } => write!(
                f,
                "page {} is out of bounds (valid pages 1..={})",
                requested, total_pages
            ),
            PageError::OutOfRange {
                step,
                current_page,
                total_pages,
            } => write!(
                f,
                "no {} page from page {} of {}",
                step, current_page, total_pages
            ),
            PageError::BackendUnavailable(err) => write!(f, "backend unavailable: {}", err),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PageError::BackendUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BackendError> for PageError {
    fn from(err: BackendError) -> Self {
        PageError::BackendUnavailable(err)
    }
}
