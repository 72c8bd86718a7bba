//! File verification: digest a file and compare against an expected value.

use crate::algorithm::Algorithm;
use crate::checksum::{digest_reader, digests_match, DigestOptions};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// What to verify. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    file_path: PathBuf,
    expected_digest: String,
    algorithm: Algorithm,
    options: DigestOptions,
}

impl VerificationRequest {
    pub fn new(
        file_path: impl Into<PathBuf>,
        expected_digest: impl Into<String>,
        algorithm: Algorithm,
    ) -> Self {
        Self::with_options(file_path, expected_digest, algorithm, DigestOptions::default())
    }

    pub fn with_options(
        file_path: impl Into<PathBuf>,
        expected_digest: impl Into<String>,
        algorithm: Algorithm,
        options: DigestOptions,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            expected_digest: expected_digest.into(),
            algorithm,
            options,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn expected_digest(&self) -> &str {
        &self.expected_digest
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn options(&self) -> &DigestOptions {
        &self.options
    }
}

/// Outcome of a single verification.
#[derive(Debug)]
pub enum VerificationResult {
    /// Computed digest equals the expected one (ignoring case).
    Match { digest: String },
    /// File was read completely but the digests differ.
    Mismatch { expected: String, actual: String },
    /// Path is missing, not openable, or not a regular file. Nothing was read.
    FileNotFound { path: PathBuf },
    /// Reading failed after the file was opened; no digest was produced.
    IoError { path: PathBuf, source: io::Error },
}

impl VerificationResult {
    pub fn is_match(&self) -> bool {
        matches!(self, VerificationResult::Match { .. })
    }
}

/// Verify `request.file_path()` against `request.expected_digest()`.
///
/// The file is opened read-only and closed before returning on every path.
pub fn verify(request: &VerificationRequest) -> VerificationResult {
    let path = request.file_path();
    tracing::debug!(
        "verify path={} algorithm={} chunk_size={}",
        path.display(),
        request.algorithm(),
        request.options().chunk_size
    );

    let file = match open_regular_file(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::info!("cannot open {}: {}", path.display(), e);
            return VerificationResult::FileNotFound {
                path: path.to_path_buf(),
            };
        }
    };

    let result = verify_stream(file, request);
    match &result {
        VerificationResult::Match { digest } => {
            tracing::info!("digest match for {} ({})", path.display(), digest)
        }
        VerificationResult::Mismatch { expected, actual } => tracing::warn!(
            "digest mismatch for {}: expected {} got {}",
            path.display(),
            expected,
            actual
        ),
        VerificationResult::IoError { source, .. } => {
            tracing::error!("read failed for {}: {}", path.display(), source)
        }
        VerificationResult::FileNotFound { .. } => {}
    }
    result
}

/// Convenience form of [`verify`] with default options.
pub fn verify_path(path: &Path, expected_digest: &str, algorithm: Algorithm) -> VerificationResult {
    verify(&VerificationRequest::new(path, expected_digest, algorithm))
}

// Type is checked before open: opening a FIFO blocks and a device never hits EOF.
fn open_regular_file(path: &Path) -> io::Result<File> {
    ensure_regular(&fs::metadata(path)?)?;
    let file = File::open(path)?;
    // Path may have been swapped between the two checks.
    ensure_regular(&file.metadata()?)?;
    Ok(file)
}

fn ensure_regular(metadata: &fs::Metadata) -> io::Result<()> {
    if metadata.is_file() {
        Ok(())
    } else {
        Err(io::Error::new(io::ErrorKind::Other, "not a regular file"))
    }
}

fn verify_stream<R: Read>(reader: R, request: &VerificationRequest) -> VerificationResult {
    match digest_reader(reader, request.algorithm(), request.options()) {
        Ok(actual) if digests_match(request.expected_digest(), &actual) => {
            VerificationResult::Match { digest: actual }
        }
        Ok(actual) => VerificationResult::Mismatch {
            expected: request.expected_digest().to_string(),
            actual,
        },
        Err(source) => VerificationResult::IoError {
            path: request.file_path().to_path_buf(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_MD5: &str = "900150983cd24fb0d6963f7d28e17f72";

    fn file_with(content: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn empty_file_sha256_matches() {
        let f = file_with(b"");
        let result = verify_path(f.path(), EMPTY_SHA256, Algorithm::Sha256);
        match result {
            VerificationResult::Match { digest } => assert_eq!(digest, EMPTY_SHA256),
            other => panic!("expected Match, got {:?}", other),
        }
    }

    #[test]
    fn abc_md5_matches_in_either_case() {
        let f = file_with(b"abc");
        assert!(verify_path(f.path(), ABC_MD5, Algorithm::Md5).is_match());
        assert!(verify_path(f.path(), &ABC_MD5.to_uppercase(), Algorithm::Md5).is_match());
    }

    #[test]
    fn abc_md5_wrong_digest_mismatches() {
        let f = file_with(b"abc");
        match verify_path(f.path(), "deadbeef", Algorithm::Md5) {
            VerificationResult::Mismatch { expected, actual } => {
                assert_eq!(expected, "deadbeef");
                assert_eq!(actual, ABC_MD5);
            }
            other => panic!("expected Mismatch, got {:?}", other),
        }
    }

    #[test]
    fn missing_path_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.iso");
        match verify_path(&path, ABC_MD5, Algorithm::Md5) {
            VerificationResult::FileNotFound { path: p } => assert_eq!(p, path),
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn directory_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = verify_path(dir.path(), EMPTY_SHA256, Algorithm::Sha256);
        assert!(matches!(result, VerificationResult::FileNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn character_device_is_file_not_found() {
        for device in ["/dev/null", "/dev/zero"] {
            let result = verify_path(Path::new(device), EMPTY_SHA256, Algorithm::Sha256);
            assert!(matches!(result, VerificationResult::FileNotFound { .. }), "{device}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn fifo_is_file_not_found_without_blocking() {
        let dir = tempfile::tempdir().unwrap();
        let fifo = dir.path().join("pipe");
        let status = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .unwrap();
        assert!(status.success());
        // No writer ever opens the pipe, so an open() here would hang the test.
        let result = verify_path(&fifo, EMPTY_SHA256, Algorithm::Sha256);
        assert!(matches!(result, VerificationResult::FileNotFound { .. }));
    }

    #[test]
    fn oversized_shake_length_does_not_abort() {
        let f = file_with(b"abc");
        let options = DigestOptions {
            chunk_size: 4096,
            xof_output_len: usize::MAX / 2,
        };
        let request = VerificationRequest::with_options(f.path(), "00", Algorithm::Shake128, options);
        assert!(matches!(verify(&request), VerificationResult::Mismatch { .. }));
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "revoked"))
        }
    }

    #[test]
    fn read_failure_is_io_error() {
        let request = VerificationRequest::new("/data/file.bin", EMPTY_SHA256, Algorithm::Sha256);
        match verify_stream(BrokenReader, &request) {
            VerificationResult::IoError { path, source } => {
                assert_eq!(path, PathBuf::from("/data/file.bin"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected IoError, got {:?}", other),
        }
    }

    #[test]
    fn verification_does_not_modify_file() {
        let f = file_with(b"payload");
        let before = std::fs::read(f.path()).unwrap();
        let _ = verify_path(f.path(), "00", Algorithm::Sha1);
        assert_eq!(std::fs::read(f.path()).unwrap(), before);
    }

    #[test]
    fn request_accessors() {
        let options = DigestOptions {
            chunk_size: 512,
            xof_output_len: 48,
        };
        let request =
            VerificationRequest::with_options("a.bin", "ff", Algorithm::Shake256, options);
        assert_eq!(request.file_path(), Path::new("a.bin"));
        assert_eq!(request.expected_digest(), "ff");
        assert_eq!(request.algorithm(), Algorithm::Shake256);
        assert_eq!(request.options(), &options);
    }
}
