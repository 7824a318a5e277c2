pub mod backend;
pub mod catalog;
mod cursor;
mod document;
mod error;
mod lookup;
mod page;
mod paginator;
mod query;

pub use backend::{BackendError, BackendStats, DocumentBackend, InMemoryBackend, MAX_PREDICATES};
pub use cursor::{Cursor, CursorError};
pub use document::{Document, DocumentError};
pub use error::{PageError, Step};
pub use lookup::LookupCache;
pub use page::{total_pages, PageResult, PaginationInfo};
pub use paginator::{CachedPage, CursorPaginator};
pub use query::{compare_values, Direction, Operator, OrderBy, Predicate, QueryError, QuerySpec};
