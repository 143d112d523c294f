//! Book domain model
//!
//! A book is one catalog item. Everything except its status is fixed at
//! creation; the status flips between available and checked out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::BookId;

/// On-disk string for [`BookStatus::Available`]
pub const STATUS_AVAILABLE: &str = "в наличии";

/// On-disk string for [`BookStatus::CheckedOut`]
pub const STATUS_CHECKED_OUT: &str = "выдана";

#[derive(Debug, Error, PartialEq)]
pub enum BookError {
    #[error("Invalid status '{0}', must be 'в наличии' or 'выдана'")]
    InvalidStatus(String),

    #[error("Book {0} must not be empty")]
    EmptyField(&'static str),
}

/// Availability of a book
///
/// Serialized with the literal strings existing catalog files use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BookStatus {
    #[default]
    #[serde(rename = "в наличии")]
    Available,
    #[serde(rename = "выдана")]
    CheckedOut,
}

impl BookStatus {
    /// Returns the persisted string for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => STATUS_AVAILABLE,
            BookStatus::CheckedOut => STATUS_CHECKED_OUT,
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = BookError;

    /// Accepts the persisted strings plus ASCII aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            STATUS_AVAILABLE | "available" => Ok(BookStatus::Available),
            STATUS_CHECKED_OUT | "checked_out" | "checked-out" => Ok(BookStatus::CheckedOut),
            other => Err(BookError::InvalidStatus(other.to_string())),
        }
    }
}

/// Plain record form of a book, as stored in the catalog file
///
/// Field order matches the persisted layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub status: BookStatus,
}

/// A book in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    year: i32,
    status: BookStatus,
}

impl Book {
    /// Creates a fresh book; the caller owns id assignment
    pub fn new(id: BookId, title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
            status: BookStatus::Available,
        }
    }

    /// Rebuilds a book from already-known fields
    pub fn restore(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        status: BookStatus,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
            status,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn status(&self) -> BookStatus {
        self.status
    }

    /// Sets the status from user input
    ///
    /// Leaves the book untouched when the value is not a known status.
    pub fn change_status(&mut self, status: &str) -> Result<BookStatus, BookError> {
        let status: BookStatus = status.parse()?;
        self.set_status(status);
        Ok(status)
    }

    /// Sets the status; both directions are always allowed
    pub fn set_status(&mut self, status: BookStatus) {
        self.status = status;
    }

    /// Returns the record form used for serialization
    pub fn to_record(&self) -> BookRecord {
        BookRecord {
            id: self.id,
            title: self.title.clone(),
            author: self.author.clone(),
            year: self.year,
            status: self.status,
        }
    }

    /// Renders the multi-line listing block, ending with a blank line
    pub fn render(&self) -> String {
        format!(
            "{} {}\nid: {}\nauthor: {}\nyear: {}\nstatus: {}\n\n",
            self.title,
            "_".repeat(10),
            self.id,
            self.author,
            self.year,
            self.status
        )
    }
}

impl TryFrom<BookRecord> for Book {
    type Error = BookError;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        if record.title.trim().is_empty() {
            return Err(BookError::EmptyField("title"));
        }
        if record.author.trim().is_empty() {
            return Err(BookError::EmptyField("author"));
        }
        Ok(Book::restore(
            record.id,
            record.title,
            record.author,
            record.year,
            record.status,
        ))
    }
}

impl From<&Book> for BookRecord {
    fn from(book: &Book) -> Self {
        book.to_record()
    }
}
