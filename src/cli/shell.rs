//! Interactive catalog shell
//!
//! Reads one command per line, runs it, and prints a single corrective
//! message when it fails. The loop ends on `quit`, `exit`, or end of input.
//! Nothing is saved on exit; mutating commands have already saved.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use super::book::{self, Action, UsageError, ADD_USAGE, DELETE_USAGE, SEARCH_USAGE, UPDATE_STATUS_USAGE};
use super::output::Output;
use crate::domain::{SearchField, STATUS_AVAILABLE, STATUS_CHECKED_OUT};
use crate::storage::CatalogStore;

pub const INTRO: &str =
    "Welcome to Nizami library management system. Type help or ? to list commands.";

pub const FAREWELL: &str = "Bye ...";

const INVALID_UTF8: &str = "Input is not valid UTF-8";

/// One parsed shell line
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Run(Action),
    Help(Option<String>),
    Quit,
}

/// Why a line could not be turned into a command
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LineError {
    #[error("*** Unknown syntax: {0}")]
    UnknownCommand(String),

    #[error("Invalid quoting: {0}")]
    Quoting(String),

    #[error(transparent)]
    Usage(#[from] UsageError),
}

/// Parses one input line; blank lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, LineError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    // `?topic` is help, as in most line-oriented shells
    if let Some(topic) = line.strip_prefix('?') {
        let topic = topic.trim();
        return Ok(Some(ShellCommand::Help(
            (!topic.is_empty()).then(|| topic.to_string()),
        )));
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name {
        "list" => {
            if !rest.is_empty() {
                return Err(UsageError::ArgumentCount("list").into());
            }
            ShellCommand::Run(Action::List)
        }
        "add" => {
            let args = split(rest)?;
            match args.as_slice() {
                [title, author, year] => ShellCommand::Run(Action::add(title, author, year)?),
                _ => return Err(UsageError::ArgumentCount(ADD_USAGE).into()),
            }
        }
        "delete" => {
            let args = split(rest)?;
            match args.as_slice() {
                [id] => ShellCommand::Run(Action::delete(id)?),
                _ => return Err(UsageError::ArgumentCount(DELETE_USAGE).into()),
            }
        }
        "update_status" => {
            let args = split(rest)?;
            match args.as_slice() {
                [id, status] => ShellCommand::Run(Action::update_status(id, status)?),
                _ => return Err(UsageError::ArgumentCount(UPDATE_STATUS_USAGE).into()),
            }
        }
        "search" => ShellCommand::Run(parse_search(&split(rest)?)?),
        "help" => ShellCommand::Help((!rest.is_empty()).then(|| rest.to_string())),
        "quit" | "exit" | "EOF" => ShellCommand::Quit,
        _ => return Err(LineError::UnknownCommand(line.to_string())),
    };

    Ok(Some(command))
}

fn split(rest: &str) -> Result<Vec<String>, LineError> {
    shell_words::split(rest).map_err(|e| LineError::Quoting(e.to_string()))
}

/// Parses `-title T -author A -year Y` in any order
fn parse_search(args: &[String]) -> Result<Action, UsageError> {
    if args.len() < 2 {
        return Err(UsageError::NoSearchOptions);
    }
    if args.len() > 2 * book::MAX_SEARCH_OPTIONS {
        return Err(UsageError::TooManySearchOptions);
    }

    let mut pairs = Vec::new();
    for chunk in args.chunks(2) {
        let option = &chunk[0];
        let field = option
            .strip_prefix('-')
            .and_then(|name| name.parse::<SearchField>().ok())
            .ok_or_else(|| UsageError::InvalidOption(option.clone()))?;
        let value = chunk
            .get(1)
            .ok_or_else(|| UsageError::MissingValue(option.clone()))?;
        pairs.push((field, value.clone()));
    }

    Action::search(&pairs)
}

/// Returns help text for a topic, or the command overview
pub fn help_text(topic: Option<&str>) -> String {
    match topic {
        None => [
            "Documented commands (type help <topic>):",
            "========================================",
            "list  add  delete  update_status  search  help  quit",
        ]
        .join("\n"),
        Some("list") => "List all books: list".to_string(),
        Some("add") => format!("Adds new book: {}", ADD_USAGE),
        Some("delete") => format!("Deletes the book: {}", DELETE_USAGE),
        Some("update_status") => format!(
            "Changes the status of the book: {}\nstatus: '{}' or '{}'",
            UPDATE_STATUS_USAGE, STATUS_AVAILABLE, STATUS_CHECKED_OUT
        ),
        Some("search") => {
            let mut text = format!("Searches for books: {}\nOptions", SEARCH_USAGE);
            for field in SearchField::ALL {
                text.push_str(&format!("\n\t-{0}: search by {0}", field));
            }
            text
        }
        Some("quit") | Some("exit") => "Exit the shell: quit".to_string(),
        Some("help") => "List available commands with \"help\" or detailed help with \"help cmd\".".to_string(),
        Some(other) => format!("*** No help on {}", other),
    }
}

/// Runs the read-eval loop until quit or end of input
pub fn run<R: BufRead>(store: &mut CatalogStore, output: &Output, prompt: &str, mut input: R) -> Result<()> {
    output.info(INTRO);

    let mut buf = Vec::new();
    loop {
        if !output.is_json() {
            print!("{}", prompt);
            io::stdout().flush().context("Failed to flush prompt")?;
        }

        buf.clear();
        let read = input.read_until(b'\n', &mut buf).context("Failed to read command")?;
        if read == 0 {
            // End of input: finish the prompt line before leaving
            output.info("");
            break;
        }

        let Ok(line) = std::str::from_utf8(&buf) else {
            output.error(INVALID_UTF8);
            continue;
        };

        match parse_line(line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(ShellCommand::Help(topic))) => output.info(&help_text(topic.as_deref())),
            Ok(Some(ShellCommand::Run(action))) => {
                if let Err(e) = book::execute(action, store, output) {
                    output.error(&format!("{:#}", e));
                }
            }
            Err(e) => output.error(&e.to_string()),
        }
    }

    output.info(FAREWELL);
    Ok(())
}
