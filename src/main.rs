//! Nizami - Local-first library catalog manager

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = nizami_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
