//! Nizami - A local-first library catalog manager
//!
//! Keeps a catalog of books in a single JSON file. Books can be listed,
//! added, deleted, searched, and marked as available or checked out, either
//! through one-shot subcommands or an interactive shell.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Book, BookId, BookStatus, SearchCriteria, SearchField};
pub use storage::{CatalogError, CatalogStore, LoadOutcome};
