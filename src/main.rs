//! gallery - browse versioned artifacts in the terminal

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = artifact_gallery::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
