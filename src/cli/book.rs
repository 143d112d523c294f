//! Catalog commands
//!
//! Shared by the one-shot subcommands and the interactive shell. Arguments
//! arrive as raw text, are checked for shape here, and only then reach the
//! store. Every mutating command saves the catalog straight after.

use anyhow::{Context, Result};
use thiserror::Error;

use super::output::Output;
use crate::domain::{parse_year, BookId, SearchCriteria, SearchError, SearchField};
use crate::storage::CatalogStore;

pub const ADD_USAGE: &str = "add <title> <author> <year>";
pub const DELETE_USAGE: &str = "delete <id_of_the_book>";
pub const UPDATE_STATUS_USAGE: &str = "update_status <id_of_the_book> <status>";
pub const SEARCH_USAGE: &str = "search <option> <value> [<option> <value> ...]";

/// Most criteria a single search accepts (one per field)
pub const MAX_SEARCH_OPTIONS: usize = 3;

/// Argument shape errors, reported before the store is touched
#[derive(Debug, Error, PartialEq)]
pub enum UsageError {
    #[error("Invalid number of arguments. Usage: {0}")]
    ArgumentCount(&'static str),

    #[error("<{0}> must not be empty.")]
    Empty(&'static str),

    #[error("<year> must be an integer.")]
    InvalidYear,

    #[error("<id_of_the_book> must be a positive integer.")]
    InvalidId,

    #[error("search command requires at least one option with a value. Usage: {}", SEARCH_USAGE)]
    NoSearchOptions,

    #[error("search command accepts at most three options. Usage: {}", SEARCH_USAGE)]
    TooManySearchOptions,

    #[error("Invalid argument: {0}. Type `help search` to see correct usage")]
    InvalidOption(String),

    #[error("Value is missing for {0}. Type `help search` to see correct usage")]
    MissingValue(String),

    #[error("Option {0} given more than once")]
    DuplicateOption(String),
}

/// A validated catalog command
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    List,
    Add {
        title: String,
        author: String,
        year: i32,
    },
    Delete(BookId),
    UpdateStatus {
        id: BookId,
        status: String,
    },
    Search(SearchCriteria),
}

impl Action {
    pub fn add(title: &str, author: &str, year: &str) -> Result<Self, UsageError> {
        if title.trim().is_empty() {
            return Err(UsageError::Empty("title"));
        }
        if author.trim().is_empty() {
            return Err(UsageError::Empty("author"));
        }
        let year = parse_year(year).map_err(|_| UsageError::InvalidYear)?;

        Ok(Action::Add {
            title: title.to_string(),
            author: author.to_string(),
            year,
        })
    }

    pub fn delete(id: &str) -> Result<Self, UsageError> {
        Ok(Action::Delete(parse_id(id)?))
    }

    /// The status value is checked by the store, not here
    pub fn update_status(id: &str, status: &str) -> Result<Self, UsageError> {
        Ok(Action::UpdateStatus {
            id: parse_id(id)?,
            status: status.to_string(),
        })
    }

    /// Builds a search from field/value pairs; year values are checked by the store
    pub fn search(pairs: &[(SearchField, String)]) -> Result<Self, UsageError> {
        if pairs.is_empty() {
            return Err(UsageError::NoSearchOptions);
        }
        if pairs.len() > MAX_SEARCH_OPTIONS {
            return Err(UsageError::TooManySearchOptions);
        }

        let mut criteria = SearchCriteria::new();
        for (field, value) in pairs {
            criteria.insert(*field, value.clone()).map_err(|e| match e {
                SearchError::DuplicateField(field) => UsageError::DuplicateOption(field.to_string()),
                other => UsageError::InvalidOption(other.to_string()),
            })?;
        }

        Ok(Action::Search(criteria))
    }

    /// Returns true if the command changes the catalog
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Action::Add { .. } | Action::Delete(_) | Action::UpdateStatus { .. }
        )
    }
}

fn parse_id(id: &str) -> Result<BookId, UsageError> {
    id.parse().map_err(|_| UsageError::InvalidId)
}

/// Runs a command against the store, saving after a successful mutation
pub fn execute(action: Action, store: &mut CatalogStore, output: &Output) -> Result<()> {
    let mutates = action.is_mutation();

    match action {
        Action::List => list(store, output),
        Action::Add {
            title,
            author,
            year,
        } => add(store, output, title, author, year)?,
        Action::Delete(id) => delete(store, output, id)?,
        Action::UpdateStatus { id, status } => update_status(store, output, id, &status)?,
        Action::Search(criteria) => search(store, output, &criteria)?,
    }

    if mutates {
        persist(store, output)?;
    }

    Ok(())
}

fn persist(store: &CatalogStore, output: &Output) -> Result<()> {
    store
        .save()
        .with_context(|| format!("Failed to save catalog to {}", store.path().display()))?;
    output.verbose_ctx("save", &format!("Saved catalog to {}", store.path().display()));
    Ok(())
}

fn list(store: &CatalogStore, output: &Output) {
    output.header("List of All Books");
    output.books(store.books());
}

fn add(store: &mut CatalogStore, output: &Output, title: String, author: String, year: i32) -> Result<()> {
    let id = store.add_book(title, author, year)?;

    if let Some(book) = store.get(id) {
        if output.is_json() {
            output.data(&book.to_record());
        } else {
            output.success(&format!("Added book {}: {}", id, book.title()));
        }
    }

    Ok(())
}

fn delete(store: &mut CatalogStore, output: &Output, id: BookId) -> Result<()> {
    let book = store.delete_book(id)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "deleted": book.to_record() }));
    } else {
        output.success(&format!("Deleted book {}: {}", id, book.title()));
    }

    Ok(())
}

fn update_status(store: &mut CatalogStore, output: &Output, id: BookId, status: &str) -> Result<()> {
    let status = store.change_status(id, status)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "status": status,
        }));
    } else {
        output.success(&format!("Book {} is now '{}'", id, status));
    }

    Ok(())
}

fn search(store: &CatalogStore, output: &Output, criteria: &SearchCriteria) -> Result<()> {
    output.verbose_ctx("search", &format!("Searching with {} criteria", criteria.len()));

    let books = store.search_books(criteria)?;

    output.header("Search Results");
    if !output.is_json() {
        let noun = if books.len() == 1 { "book" } else { "books" };
        println!("{} {} found\n", books.len(), noun);
    }
    output.books(books);

    Ok(())
}
