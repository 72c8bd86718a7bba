//! Streaming digest verification of files against an expected hex digest.

pub mod algorithm;
pub mod checksum;
pub mod config;
pub mod logging;
pub mod verify;

pub use algorithm::{Algorithm, UnknownAlgorithm, DEFAULT_XOF_OUTPUT_LEN, MAX_XOF_OUTPUT_LEN};
pub use checksum::{digest_file, digest_reader, DigestError, DigestOptions, Hasher};
pub use verify::{verify, verify_path, VerificationRequest, VerificationResult};
