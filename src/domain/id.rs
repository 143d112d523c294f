//! Book identity
//!
//! Ids are positive integers handed out by the catalog from a monotonic
//! counter. A deleted id is never handed out again.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid book ID: expected a positive integer, got '{0}'")]
    InvalidBookId(String),
}

/// Book ID, a positive integer unique within one catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct BookId(u64);

impl BookId {
    /// Creates an ID from a raw value, rejecting zero
    pub fn new(value: u64) -> Result<Self, IdError> {
        if value == 0 {
            return Err(IdError::InvalidBookId(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Returns the id that follows a counter value, or `None` once the
    /// counter is exhausted
    pub fn after(counter: u64) -> Option<Self> {
        counter.checked_add(1).map(Self)
    }

    /// Returns the raw integer value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // Only plain digits: no sign, no whitespace inside
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::InvalidBookId(s.to_string()));
        }
        let value: u64 = s
            .parse()
            .map_err(|_| IdError::InvalidBookId(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<u64> for BookId {
    type Error = IdError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BookId> for u64 {
    fn from(id: BookId) -> Self {
        id.0
    }
}
