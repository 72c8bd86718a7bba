//! The closed set of supported digest algorithms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default output length in bytes for the SHAKE family (64 hex characters).
pub const DEFAULT_XOF_OUTPUT_LEN: usize = 32;
/// Largest SHAKE output accepted; longer requests are clamped to this.
pub const MAX_XOF_OUTPUT_LEN: usize = 4096;

/// Digest algorithm selectable on the command line or in config.
///
/// Canonical names use underscores (`sha3_256`, `shake_128`); parsing also
/// accepts hyphenated and compact spellings and ignores ASCII case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b,
    Blake2s,
    Shake128,
    Shake256,
}

impl Algorithm {
    pub const ALL: [Algorithm; 14] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Sha3_224,
        Algorithm::Sha3_256,
        Algorithm::Sha3_384,
        Algorithm::Sha3_512,
        Algorithm::Blake2b,
        Algorithm::Blake2s,
        Algorithm::Shake128,
        Algorithm::Shake256,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
            Algorithm::Sha3_224 => "sha3_224",
            Algorithm::Sha3_256 => "sha3_256",
            Algorithm::Sha3_384 => "sha3_384",
            Algorithm::Sha3_512 => "sha3_512",
            Algorithm::Blake2b => "blake2b",
            Algorithm::Blake2s => "blake2s",
            Algorithm::Shake128 => "shake_128",
            Algorithm::Shake256 => "shake_256",
        }
    }

    /// True for extendable-output functions, whose length is caller-chosen.
    pub fn is_xof(self) -> bool {
        matches!(self, Algorithm::Shake128 | Algorithm::Shake256)
    }

    /// Digest length in bytes. `xof_output_len` applies only to SHAKE and is
    /// clamped to `1..=MAX_XOF_OUTPUT_LEN`.
    pub fn output_len(self, xof_output_len: usize) -> usize {
        match self {
            Algorithm::Md5 => 16,
            Algorithm::Sha1 => 20,
            Algorithm::Sha224 | Algorithm::Sha3_224 => 28,
            Algorithm::Sha256 | Algorithm::Sha3_256 | Algorithm::Blake2s => 32,
            Algorithm::Sha384 | Algorithm::Sha3_384 => 48,
            Algorithm::Sha512 | Algorithm::Sha3_512 | Algorithm::Blake2b => 64,
            Algorithm::Shake128 | Algorithm::Shake256 => {
                xof_output_len.clamp(1, MAX_XOF_OUTPUT_LEN)
            }
        }
    }

    /// Comma-separated canonical names, for help and error text.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm '{}' (expected one of: {})", .name, Algorithm::names())]
pub struct UnknownAlgorithm {
    pub name: String,
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Fold `sha3-256`, `SHA3_256`, `shake128` and `sha-256` onto one key.
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let algorithm = match key.as_str() {
            "md5" => Algorithm::Md5,
            "sha1" => Algorithm::Sha1,
            "sha224" => Algorithm::Sha224,
            "sha256" => Algorithm::Sha256,
            "sha384" => Algorithm::Sha384,
            "sha512" => Algorithm::Sha512,
            "sha3224" => Algorithm::Sha3_224,
            "sha3256" => Algorithm::Sha3_256,
            "sha3384" => Algorithm::Sha3_384,
            "sha3512" => Algorithm::Sha3_512,
            "blake2b" => Algorithm::Blake2b,
            "blake2s" => Algorithm::Blake2s,
            "shake128" => Algorithm::Shake128,
            "shake256" => Algorithm::Shake256,
            _ => {
                return Err(UnknownAlgorithm {
                    name: s.to_string(),
                })
            }
        };
        Ok(algorithm)
    }
}

impl TryFrom<String> for Algorithm {
    type Error = UnknownAlgorithm;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Algorithm> for String {
    fn from(value: Algorithm) -> Self {
        value.name().to_string()
    }
}
