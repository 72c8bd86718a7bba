//! User-facing messages and exit codes for each verification outcome.

use console::style;
use integrity_core::VerificationResult;

pub const EXIT_MATCH: i32 = 0;
pub const EXIT_MISMATCH: i32 = 1;
// 2 is clap's usage-error status, which covers an unknown algorithm name.
pub const EXIT_FILE_NOT_FOUND: i32 = 3;
pub const EXIT_IO_ERROR: i32 = 4;
pub const EXIT_CONFIG_ERROR: i32 = 5;

const MATCH_MSG: &str = "The hashes match. Your file's integrity is intact.";
const MISMATCH_MSG: &str =
    "The hashes did not match. Your file is either corrupt or has been tampered with.";
const NOT_FOUND_MSG: &str = "Invalid path. Check your file path and try again.";

pub fn exit_code(result: &VerificationResult) -> i32 {
    match result {
        VerificationResult::Match { .. } => EXIT_MATCH,
        VerificationResult::Mismatch { .. } => EXIT_MISMATCH,
        VerificationResult::FileNotFound { .. } => EXIT_FILE_NOT_FOUND,
        VerificationResult::IoError { .. } => EXIT_IO_ERROR,
    }
}

/// One line for stdout. Colors are dropped when stdout is not a terminal.
pub fn render(result: &VerificationResult) -> String {
    match result {
        VerificationResult::Match { .. } => style(MATCH_MSG).green().to_string(),
        VerificationResult::Mismatch { .. } => style(MISMATCH_MSG).red().to_string(),
        VerificationResult::FileNotFound { .. } => NOT_FOUND_MSG.to_string(),
        VerificationResult::IoError { path, source } => {
            style(format!("Could not read {}: {}", path.display(), source))
                .red()
                .to_string()
        }
    }
}
