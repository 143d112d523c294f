//! # Command-Line Interface
//!
//! User-facing commands, the interactive shell, and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose | Example |
//! |---------|---------|---------|
//! | `list` | Show every book | `nizami list` |
//! | `add` | Add a book | `nizami add "Dune" "Frank Herbert" 1965` |
//! | `delete` | Remove a book | `nizami delete 3` |
//! | `update-status` | Mark available / checked out | `nizami update-status 3 выдана` |
//! | `search` | Exact-match search | `nizami search --author "Frank Herbert"` |
//! | `shell` | Interactive prompt (default) | `nizami` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Catalog File
//!
//! `--file`, then `$NIZAMI_CATALOG`, then `catalog_file` from the config
//! file, then `books.json` in the current directory.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod book;
mod shell;

pub use app::{Cli, Commands, run};
pub use book::{Action, UsageError};
pub use output::{Output, OutputFormat};
pub use shell::{parse_line, LineError, ShellCommand};
