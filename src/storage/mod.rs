//! # Storage Layer
//!
//! Persistence for the catalog plus user configuration.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Catalog | JSON (`books` + `lastId`) | `books.json` or configured path |
//! | Config | TOML | `<config dir>/nizami-cli/config.toml` |
//!
//! ## Catalog File
//!
//! ```text
//! {
//!     "books": [
//!         { "id": 1, "title": "Dune", "author": "Herbert",
//!           "year": 1965, "status": "в наличии" }
//!     ],
//!     "lastId": 1
//! }
//! ```
//!
//! `status` is `"в наличии"` (available) or `"выдана"` (checked out).
//! These strings are kept as-is for compatibility with existing files.
//!
//! ## Key Types
//!
//! - [`CatalogStore`] - In-memory catalog with explicit load/save
//! - [`Config`] - User configuration

mod catalog;
mod config;

pub use catalog::{CatalogError, CatalogStore, LoadOutcome};
pub use config::{Config, ConfigError, FormatSetting, DEFAULT_CATALOG_FILE, DEFAULT_PROMPT};
