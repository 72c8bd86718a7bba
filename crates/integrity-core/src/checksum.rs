//! Streaming digest computation.
//!
//! Input is fed to the selected algorithm in fixed-size chunks so memory use
//! stays bounded regardless of file size. Chunk size never affects the digest.

use crate::algorithm::{Algorithm, DEFAULT_XOF_OUTPUT_LEN, MAX_XOF_OUTPUT_LEN};
use sha2::Digest;
use sha3::digest::{ExtendableOutput, Update};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Reference read size.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;
/// Largest read buffer accepted; larger requests are clamped to this.
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Knobs that shape how a digest is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestOptions {
    /// Bytes requested per read, clamped to `1..=MAX_CHUNK_SIZE`.
    pub chunk_size: usize,
    /// Output length in bytes for SHAKE128/SHAKE256, clamped to
    /// `1..=MAX_XOF_OUTPUT_LEN` so a zero length never yields an empty digest.
    /// Ignored for fixed-length algorithms.
    pub xof_output_len: usize,
}

impl DigestOptions {
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.clamp(1, MAX_CHUNK_SIZE)
    }

    pub fn effective_xof_output_len(&self) -> usize {
        self.xof_output_len.clamp(1, MAX_XOF_OUTPUT_LEN)
    }
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            xof_output_len: DEFAULT_XOF_OUTPUT_LEN,
        }
    }
}

/// Failure while digesting a file on disk.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Incremental hash state for one [`Algorithm`].
pub enum Hasher {
    Md5(md5::Md5),
    Sha1(sha1::Sha1),
    Sha224(sha2::Sha224),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
    Sha3_224(sha3::Sha3_224),
    Sha3_256(sha3::Sha3_256),
    Sha3_384(sha3::Sha3_384),
    Sha3_512(sha3::Sha3_512),
    Blake2b(blake2::Blake2b512),
    Blake2s(blake2::Blake2s256),
    Shake128(sha3::Shake128, usize),
    Shake256(sha3::Shake256, usize),
}

impl Hasher {
    /// `xof_output_len` is clamped to `1..=MAX_XOF_OUTPUT_LEN`.
    pub fn new(algorithm: Algorithm, xof_output_len: usize) -> Self {
        let xof_output_len = xof_output_len.clamp(1, MAX_XOF_OUTPUT_LEN);
        match algorithm {
            Algorithm::Md5 => Hasher::Md5(md5::Md5::new()),
            Algorithm::Sha1 => Hasher::Sha1(sha1::Sha1::new()),
            Algorithm::Sha224 => Hasher::Sha224(sha2::Sha224::new()),
            Algorithm::Sha256 => Hasher::Sha256(sha2::Sha256::new()),
            Algorithm::Sha384 => Hasher::Sha384(sha2::Sha384::new()),
            Algorithm::Sha512 => Hasher::Sha512(sha2::Sha512::new()),
            Algorithm::Sha3_224 => Hasher::Sha3_224(sha3::Sha3_224::new()),
            Algorithm::Sha3_256 => Hasher::Sha3_256(sha3::Sha3_256::new()),
            Algorithm::Sha3_384 => Hasher::Sha3_384(sha3::Sha3_384::new()),
            Algorithm::Sha3_512 => Hasher::Sha3_512(sha3::Sha3_512::new()),
            Algorithm::Blake2b => Hasher::Blake2b(blake2::Blake2b512::new()),
            Algorithm::Blake2s => Hasher::Blake2s(blake2::Blake2s256::new()),
            Algorithm::Shake128 => Hasher::Shake128(sha3::Shake128::default(), xof_output_len),
            Algorithm::Shake256 => Hasher::Shake256(sha3::Shake256::default(), xof_output_len),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Md5(h) => Digest::update(h, data),
            Hasher::Sha1(h) => Digest::update(h, data),
            Hasher::Sha224(h) => Digest::update(h, data),
            Hasher::Sha256(h) => Digest::update(h, data),
            Hasher::Sha384(h) => Digest::update(h, data),
            Hasher::Sha512(h) => Digest::update(h, data),
            Hasher::Sha3_224(h) => Digest::update(h, data),
            Hasher::Sha3_256(h) => Digest::update(h, data),
            Hasher::Sha3_384(h) => Digest::update(h, data),
            Hasher::Sha3_512(h) => Digest::update(h, data),
            Hasher::Blake2b(h) => Digest::update(h, data),
            Hasher::Blake2s(h) => Digest::update(h, data),
            Hasher::Shake128(h, _) => Update::update(h, data),
            Hasher::Shake256(h, _) => Update::update(h, data),
        }
    }

    /// Consume the state and return the digest as lowercase hex.
    pub fn finalize_hex(self) -> String {
        match self {
            Hasher::Md5(h) => hex::encode(h.finalize()),
            Hasher::Sha1(h) => hex::encode(h.finalize()),
            Hasher::Sha224(h) => hex::encode(h.finalize()),
            Hasher::Sha256(h) => hex::encode(h.finalize()),
            Hasher::Sha384(h) => hex::encode(h.finalize()),
            Hasher::Sha512(h) => hex::encode(h.finalize()),
            Hasher::Sha3_224(h) => hex::encode(h.finalize()),
            Hasher::Sha3_256(h) => hex::encode(h.finalize()),
            Hasher::Sha3_384(h) => hex::encode(h.finalize()),
            Hasher::Sha3_512(h) => hex::encode(h.finalize()),
            Hasher::Blake2b(h) => hex::encode(h.finalize()),
            Hasher::Blake2s(h) => hex::encode(h.finalize()),
            Hasher::Shake128(h, len) => hex::encode(xof_output(h, len)),
            Hasher::Shake256(h, len) => hex::encode(xof_output(h, len)),
        }
    }
}

fn xof_output<X: ExtendableOutput>(hasher: X, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    hasher.finalize_xof_into(&mut out);
    out
}

/// Digest everything `reader` yields until EOF.
///
/// Any read error aborts the digest; no partial result is returned.
pub fn digest_reader<R: Read>(
    mut reader: R,
    algorithm: Algorithm,
    options: &DigestOptions,
) -> io::Result<String> {
    let mut hasher = Hasher::new(algorithm, options.effective_xof_output_len());
    let mut buf = vec![0u8; options.effective_chunk_size()];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize_hex())
}

/// Compute the digest of a file and return it as lowercase hex.
pub fn digest_file(
    path: &Path,
    algorithm: Algorithm,
    options: &DigestOptions,
) -> Result<String, DigestError> {
    let file = File::open(path).map_err(|source| DigestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    digest_reader(file, algorithm, options).map_err(|source| DigestError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Case-insensitive comparison of an expected digest against a computed one.
pub fn digests_match(expected: &str, actual: &str) -> bool {
    expected.eq_ignore_ascii_case(actual)
}
