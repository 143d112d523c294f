//! Main CLI application structure

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::book::{self, Action};
use super::output::{Output, OutputFormat};
use super::shell;
use crate::domain::SearchField;
use crate::storage::{CatalogStore, Config, LoadOutcome};

#[derive(Parser)]
#[command(name = "nizami")]
#[command(author, version, about = "Local-first library catalog manager")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Catalog file (defaults to books.json in the current directory)
    #[arg(long, global = true, env = "NIZAMI_CATALOG")]
    pub file: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true, env = "NIZAMI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Runs the interactive shell when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all books
    List,

    /// Add a new book
    Add {
        /// Book title
        title: String,

        /// Book author
        author: String,

        /// Publication year
        #[arg(allow_hyphen_values = true)]
        year: String,
    },

    /// Delete a book
    Delete {
        /// Book ID
        id: String,
    },

    /// Change the status of a book
    ///
    /// Status is 'в наличии' (or 'available') or 'выдана' (or 'checked_out').
    #[command(alias = "update_status")]
    UpdateStatus {
        /// Book ID
        id: String,

        /// New status
        status: String,
    },

    /// Search books by exact title, author and/or year
    Search {
        /// Match title
        #[arg(long)]
        title: Option<String>,

        /// Match author
        #[arg(long)]
        author: Option<String>,

        /// Match year
        #[arg(long, allow_hyphen_values = true)]
        year: Option<String>,
    },

    /// Start the interactive shell
    Shell,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or_else(|| config.default_format.into());
    let output = Output::new(format, cli.verbose);

    // Argument shape is checked before the catalog file is touched
    let action = match cli.command {
        Some(command) => action_for(command)?,
        None => None,
    };
    let interactive = action.is_none();

    let path = config.catalog_path(cli.file.as_deref());
    output.verbose_ctx("catalog", &format!("Using catalog file: {}", path.display()));

    let (mut store, outcome) = CatalogStore::open(&path)
        .with_context(|| format!("Could not load catalog {}; fix or move the file first", path.display()))?;

    match outcome {
        LoadOutcome::Loaded { books, last_id } => {
            output.verbose_ctx("catalog", &format!("Loaded {} books, last id {}", books, last_id));
        }
        LoadOutcome::Missing if interactive => {
            output.info(&format!("File ({}) not found, starting with an empty catalog", path.display()));
        }
        LoadOutcome::Missing => {
            output.verbose_ctx("catalog", "No catalog file yet, starting empty");
        }
    }

    match action {
        Some(action) => book::execute(action, &mut store, &output)?,
        None => {
            let stdin = io::stdin();
            shell::run(&mut store, &output, config.prompt(), stdin.lock())?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Converts a one-shot subcommand into a catalog action; `None` means the shell
fn action_for(command: Commands) -> Result<Option<Action>> {
    let action = match command {
        Commands::List => Action::List,
        Commands::Add {
            title,
            author,
            year,
        } => Action::add(&title, &author, &year)?,
        Commands::Delete { id } => Action::delete(&id)?,
        Commands::UpdateStatus { id, status } => Action::update_status(&id, &status)?,
        Commands::Search {
            title,
            author,
            year,
        } => {
            let pairs: Vec<_> = [
                (SearchField::Title, title),
                (SearchField::Author, author),
                (SearchField::Year, year),
            ]
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| (field, v)))
            .collect();
            Action::search(&pairs)?
        }
        Commands::Shell => return Ok(None),
    };

    Ok(Some(action))
}

/// Logs go to stderr; `RUST_LOG` overrides the level picked by `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}
