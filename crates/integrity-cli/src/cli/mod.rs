//! CLI for the integrity checker.

mod report;

use anyhow::Result;
use clap::Parser;
use integrity_core::checksum::DigestOptions;
use integrity_core::config::{self, IntegrityConfig};
use integrity_core::{verify, Algorithm, VerificationRequest, MAX_XOF_OUTPUT_LEN};
use std::path::PathBuf;

pub use report::{exit_code, EXIT_CONFIG_ERROR};

/// Verify a file against an expected digest.
#[derive(Debug, Parser)]
#[command(name = "integrity", version)]
#[command(about = "Check a file's integrity by comparing its digest to an expected hash", long_about = None)]
pub struct Cli {
    /// Path of the file whose integrity you are checking.
    #[arg(short = 'p', long, value_name = "PATH")]
    pub path: PathBuf,

    /// Hash that the file digest needs to match (hex, any case).
    #[arg(long = "hash", value_name = "HEX")]
    pub hash: String,

    /// Hashing algorithm [default: sha256, or default_algorithm from config].
    ///
    /// One of: md5, sha1, sha224, sha256, sha384, sha512, sha3_224, sha3_256,
    /// sha3_384, sha3_512, blake2b, blake2s, shake_128, shake_256.
    #[arg(short = 'a', long, value_name = "NAME")]
    pub algorithm: Option<Algorithm>,

    /// Output length in bytes for shake_128/shake_256, 1 to 4096 [default: 32].
    #[arg(
        long,
        value_name = "BYTES",
        value_parser = clap::value_parser!(u32).range(1..=MAX_XOF_OUTPUT_LEN as i64)
    )]
    pub shake_length: Option<u32>,

    /// Read settings from this TOML file instead of ~/.config/integrity/config.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse arguments, verify, print the report, and return the process exit code.
    pub fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        let request = cli.request(&cfg);
        let result = verify(&request);
        println!("{}", report::render(&result));
        Ok(exit_code(&result))
    }

    /// Merge flags over config into an immutable request.
    pub fn request(&self, cfg: &IntegrityConfig) -> VerificationRequest {
        let algorithm = self.algorithm.unwrap_or(cfg.default_algorithm);
        let options = DigestOptions {
            xof_output_len: self
                .shake_length
                .map(|n| n as usize)
                .unwrap_or(cfg.shake_output_bytes),
            ..cfg.digest_options()
        };
        VerificationRequest::with_options(&self.path, self.hash.clone(), algorithm, options)
    }
}
