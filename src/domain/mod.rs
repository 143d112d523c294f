//! Domain models for the catalog
//!
//! Contains the core book types without any I/O concerns.

mod id;
mod book;
mod search;

pub use id::{BookId, IdError};
pub use book::{Book, BookError, BookRecord, BookStatus, STATUS_AVAILABLE, STATUS_CHECKED_OUT};
pub use search::{parse_year, Predicate, SearchCriteria, SearchError, SearchField};
