use integrity_core::logging;

mod cli;

use crate::cli::{Cli, EXIT_CONFIG_ERROR};

fn main() {
    // Initialize logging as early as possible.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    // Parse CLI and dispatch; clap exits with status 2 on usage errors.
    match Cli::run_from_args() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("integrity error: {:#}", err);
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    }
}
