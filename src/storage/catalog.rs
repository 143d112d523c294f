//! JSON storage for the book catalog
//!
//! The whole catalog lives in one JSON document holding the book list and
//! the id counter. The file is opened, locked, read or written in full, and
//! closed on every access; nothing is held open between operations.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{Book, BookError, BookId, BookRecord, BookStatus, SearchCriteria, SearchError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Book not found: {0}")]
    NotFound(BookId),

    #[error("Invalid status '{0}', must be 'в наличии' or 'выдана'")]
    InvalidStatus(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No book ids left: lastId is already {0}")]
    IdsExhausted(u64),

    #[error("Malformed catalog file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to access catalog file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize catalog")]
    Serialize(#[from] serde_json::Error),
}

impl From<BookError> for CatalogError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::InvalidStatus(status) => CatalogError::InvalidStatus(status),
            other => CatalogError::InvalidArgument(other.to_string()),
        }
    }
}

impl From<SearchError> for CatalogError {
    fn from(err: SearchError) -> Self {
        CatalogError::InvalidArgument(err.to_string())
    }
}

/// What [`CatalogStore::load`] found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was read and every book restored
    Loaded { books: usize, last_id: u64 },
    /// No catalog file yet; the store starts empty
    Missing,
}

/// Persisted layout: `{"books": [...], "lastId": n}`
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    books: Vec<BookRecord>,
    #[serde(rename = "lastId")]
    last_id: u64,
}

/// In-memory catalog backed by a JSON file
///
/// Mutations only touch memory; call [`save`](Self::save) to persist them.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    books: Vec<Book>,
    last_id: u64,
}

impl CatalogStore {
    /// Creates an empty store for the given file without touching disk
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            books: Vec::new(),
            last_id: 0,
        }
    }

    /// Creates a store and loads it from its file
    pub fn open(path: impl Into<PathBuf>) -> Result<(Self, LoadOutcome), CatalogError> {
        let mut store = Self::new(path);
        let outcome = store.load()?;
        Ok((store, outcome))
    }

    /// Returns the path to the catalog file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns all books in insertion order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Returns the highest id ever assigned (0 for a new catalog)
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Finds a book by id
    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id() == id)
    }

    /// Replaces the in-memory catalog with the file contents
    ///
    /// A missing file is not an error. On any other failure the store keeps
    /// its previous contents.
    pub fn load(&mut self) -> Result<LoadOutcome, CatalogError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "catalog file not found, starting empty");
                self.books.clear();
                self.last_id = 0;
                return Ok(LoadOutcome::Missing);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        // Lock is released when file is dropped
        file.lock_shared().map_err(|e| self.io_error(e))?;

        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|e| self.io_error(e))?;

        let data: CatalogFile =
            serde_json::from_slice(&content).map_err(|e| self.parse_error(e.to_string()))?;
        let (books, last_id) = self.decode(data)?;

        info!(path = %self.path.display(), books = books.len(), last_id, "loaded catalog");

        self.books = books;
        self.last_id = last_id;

        Ok(LoadOutcome::Loaded {
            books: self.books.len(),
            last_id,
        })
    }

    /// Checks the decoded file against the catalog invariants
    fn decode(&self, data: CatalogFile) -> Result<(Vec<Book>, u64), CatalogError> {
        let mut seen = HashSet::new();
        let mut books = Vec::with_capacity(data.books.len());

        for (index, record) in data.books.into_iter().enumerate() {
            let id = record.id;
            if id.get() > data.last_id {
                return Err(self.parse_error(format!(
                    "book {} has id {} above lastId {}",
                    index, id, data.last_id
                )));
            }
            if !seen.insert(id) {
                return Err(self.parse_error(format!("duplicate book id {}", id)));
            }

            let book =
                Book::try_from(record).map_err(|e| self.parse_error(format!("book {}: {}", index, e)))?;
            books.push(book);
        }

        Ok((books, data.last_id))
    }

    /// Writes the whole catalog to its file
    ///
    /// Writes go to a sibling temp file that is then renamed over the target.
    pub fn save(&self) -> Result<(), CatalogError> {
        self.write_file().inspect_err(|e| {
            warn!(path = %self.path.display(), error = %e, "failed to save catalog");
        })
    }

    fn write_file(&self) -> Result<(), CatalogError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let data = CatalogFile {
            books: self.books.iter().map(Book::to_record).collect(),
            last_id: self.last_id,
        };

        // Readers lock the catalog file itself, so hold its exclusive lock
        // until the new contents have been renamed into place
        let target = match File::open(&self.path) {
            Ok(file) => {
                file.lock_exclusive().map_err(|e| self.io_error(e))?;
                Some(file)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(self.io_error(e)),
        };

        let temp_path = self.temp_path();

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| self.io_error(e))?;

            let mut writer = BufWriter::new(&file);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
            data.serialize(&mut serializer)?;

            writeln!(writer).map_err(|e| self.io_error(e))?;
            writer.flush().map_err(|e| self.io_error(e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;
        drop(target);

        debug!(path = %self.path.display(), books = self.books.len(), last_id = self.last_id, "saved catalog");
        Ok(())
    }

    /// Adds a new available book under the next id
    ///
    /// Fails without changing the catalog once the id counter is exhausted.
    pub fn add_book(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
    ) -> Result<BookId, CatalogError> {
        let id = self.next_id()?;
        let book = Book::new(id, title, author, year);
        debug!(%id, title = book.title(), "added book");
        self.books.push(book);
        Ok(id)
    }

    /// Removes the book with the given id
    pub fn delete_book(&mut self, id: BookId) -> Result<Book, CatalogError> {
        let index = self
            .books
            .iter()
            .position(|b| b.id() == id)
            .ok_or(CatalogError::NotFound(id))?;

        let book = self.books.remove(index);
        debug!(%id, "deleted book");
        Ok(book)
    }

    /// Changes a book's status from user input
    pub fn change_status(&mut self, id: BookId, status: &str) -> Result<BookStatus, CatalogError> {
        let book = self.get_mut(id)?;
        let status = book.change_status(status)?;
        debug!(%id, %status, "changed book status");
        Ok(status)
    }

    /// Changes a book's status
    pub fn set_status(&mut self, id: BookId, status: BookStatus) -> Result<(), CatalogError> {
        self.get_mut(id)?.set_status(status);
        debug!(%id, %status, "changed book status");
        Ok(())
    }

    /// Returns the books matching every criterion, in catalog order
    ///
    /// Empty criteria return every book. A non-integer year fails the whole
    /// search instead of matching nothing.
    pub fn search_books(&self, criteria: &SearchCriteria) -> Result<Vec<&Book>, CatalogError> {
        let predicates = criteria.predicates()?;

        Ok(self
            .books
            .iter()
            .filter(|book| predicates.iter().all(|p| p.matches(book)))
            .collect())
    }

    fn get_mut(&mut self, id: BookId) -> Result<&mut Book, CatalogError> {
        self.books
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or(CatalogError::NotFound(id))
    }

    fn next_id(&mut self) -> Result<BookId, CatalogError> {
        let id = BookId::after(self.last_id).ok_or(CatalogError::IdsExhausted(self.last_id))?;
        self.last_id = id.get();
        Ok(id)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "catalog".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> CatalogError {
        CatalogError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn parse_error(&self, message: String) -> CatalogError {
        CatalogError::Parse {
            path: self.path.clone(),
            message,
        }
    }
}
