//! Search criteria for the catalog
//!
//! Only three fields are searchable. Each criterion is an exact match and
//! all criteria must hold (logical AND).

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::book::Book;

#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("Unknown search field '{0}', expected one of: title, author, year")]
    UnknownField(String),

    #[error("Search field '{0}' given more than once")]
    DuplicateField(SearchField),

    #[error("Year must be an integer, got '{0}'")]
    InvalidYear(String),
}

/// A searchable book field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Title,
    Author,
    Year,
}

impl SearchField {
    pub const ALL: [SearchField; 3] = [SearchField::Title, SearchField::Author, SearchField::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Year => "year",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            "year" => Ok(SearchField::Year),
            other => Err(SearchError::UnknownField(other.to_string())),
        }
    }
}

/// Field/value pairs to match, in the order they were given
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria(Vec<(SearchField, String)>);

impl SearchCriteria {
    /// Creates empty criteria (matches every book)
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds criteria from raw field names, rejecting unknown or repeated fields
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut criteria = Self::new();
        for (key, value) in pairs {
            let field: SearchField = key.as_ref().parse()?;
            criteria.insert(field, value)?;
        }
        Ok(criteria)
    }

    /// Adds a criterion
    pub fn insert(&mut self, field: SearchField, value: impl Into<String>) -> Result<(), SearchError> {
        if self.get(field).is_some() {
            return Err(SearchError::DuplicateField(field));
        }
        self.0.push((field, value.into()));
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, field: SearchField, value: impl Into<String>) -> Result<Self, SearchError> {
        self.insert(field, value)?;
        Ok(self)
    }

    /// Gets the value for a field
    pub fn get(&self, field: SearchField) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SearchField, &str)> {
        self.0.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Coerces values to their field types
    ///
    /// Fails on a non-integer year, whatever else the criteria contain.
    pub fn predicates(&self) -> Result<Vec<Predicate>, SearchError> {
        self.iter()
            .map(|(field, value)| match field {
                SearchField::Title => Ok(Predicate::Title(value.to_string())),
                SearchField::Author => Ok(Predicate::Author(value.to_string())),
                SearchField::Year => parse_year(value).map(Predicate::Year),
            })
            .collect()
    }
}

/// Parses a year the same way for `add` and `search`
pub fn parse_year(value: &str) -> Result<i32, SearchError> {
    value
        .trim()
        .parse()
        .map_err(|_| SearchError::InvalidYear(value.to_string()))
}

/// A single typed match against one book field
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Title(String),
    Author(String),
    Year(i32),
}

impl Predicate {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            Predicate::Title(title) => book.title() == title,
            Predicate::Author(author) => book.author() == author,
            Predicate::Year(year) => book.year() == *year,
        }
    }
}
