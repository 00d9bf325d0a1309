//! vmp_keygen - VMProtect serial number generator
//!
//! Generates serial numbers from an exported key pair and decodes existing
//! serials for inspection.

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}
