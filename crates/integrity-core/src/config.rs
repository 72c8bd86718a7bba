use crate::algorithm::{Algorithm, DEFAULT_XOF_OUTPUT_LEN, MAX_XOF_OUTPUT_LEN};
use crate::checksum::{DigestOptions, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Global configuration loaded from `~/.config/integrity/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityConfig {
    /// Algorithm used when `--algorithm` is not given.
    pub default_algorithm: Algorithm,
    /// Read buffer size in bytes, 1 to 64 MiB.
    pub chunk_bytes: usize,
    /// Output length in bytes for shake_128/shake_256, 1 to 4096.
    pub shake_output_bytes: usize,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            default_algorithm: Algorithm::Sha256,
            chunk_bytes: DEFAULT_CHUNK_SIZE,
            shake_output_bytes: DEFAULT_XOF_OUTPUT_LEN,
        }
    }
}

impl IntegrityConfig {
    pub fn digest_options(&self) -> DigestOptions {
        DigestOptions {
            chunk_size: self.chunk_bytes,
            xof_output_len: self.shake_output_bytes,
        }
    }

    fn validate(self, path: &Path) -> Result<Self, ConfigError> {
        for (key, value, max) in [
            ("chunk_bytes", self.chunk_bytes, MAX_CHUNK_SIZE),
            ("shake_output_bytes", self.shake_output_bytes, MAX_XOF_OUTPUT_LEN),
        ] {
            if value == 0 || value > max {
                return Err(ConfigError::Invalid {
                    path: path.to_path_buf(),
                    message: format!("{key} must be between 1 and {max}, got {value}"),
                });
            }
        }
        Ok(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot locate config directory: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}

/// Existing config file in the XDG config dirs, if any.
pub fn config_path() -> Result<Option<PathBuf>, ConfigError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("integrity")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load the XDG config file, or defaults when none exists. Never writes.
pub fn load() -> Result<IntegrityConfig, ConfigError> {
    match config_path()? {
        Some(path) => load_from(&path),
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok(IntegrityConfig::default())
        }
    }
}

/// Load an explicit config file; a missing file is an error.
pub fn load_from(path: &Path) -> Result<IntegrityConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: IntegrityConfig = toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("loaded config from {}", path.display());
    cfg.validate(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let f = tempfile::NamedTempFile::new().unwrap();
        fs::write(f.path(), body).unwrap();
        f
    }

    #[test]
    fn default_config_values() {
        let cfg = IntegrityConfig::default();
        assert_eq!(cfg.default_algorithm, Algorithm::Sha256);
        assert_eq!(cfg.chunk_bytes, 4096);
        assert_eq!(cfg.shake_output_bytes, 32);
        assert_eq!(cfg.digest_options(), DigestOptions::default());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = IntegrityConfig {
            default_algorithm: Algorithm::Sha3_384,
            chunk_bytes: 65536,
            shake_output_bytes: 64,
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        assert!(toml.contains("default_algorithm = \"sha3_384\""));
        let parsed: IntegrityConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let cfg: IntegrityConfig = toml::from_str("default_algorithm = \"blake2b\"").unwrap();
        assert_eq!(cfg.default_algorithm, Algorithm::Blake2b);
        assert_eq!(cfg.chunk_bytes, DEFAULT_CHUNK_SIZE);
        assert_eq!(cfg.shake_output_bytes, DEFAULT_XOF_OUTPUT_LEN);
    }

    #[test]
    fn load_from_custom_values() {
        let f = write_config(
            r#"
            default_algorithm = "shake-256"
            chunk_bytes = 1_048_576
            shake_output_bytes = 48
        "#,
        );
        let cfg = load_from(f.path()).unwrap();
        assert_eq!(cfg.default_algorithm, Algorithm::Shake256);
        assert_eq!(cfg.chunk_bytes, 1_048_576);
        assert_eq!(cfg.digest_options().xof_output_len, 48);
    }

    #[test]
    fn load_from_rejects_unknown_algorithm() {
        let f = write_config("default_algorithm = \"crc32\"");
        let err = load_from(f.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_from_rejects_zero_sizes() {
        let f = write_config("chunk_bytes = 0");
        match load_from(f.path()).unwrap_err() {
            ConfigError::Invalid { message, .. } => assert!(message.contains("chunk_bytes")),
            other => panic!("expected Invalid, got {:?}", other),
        }
        let f = write_config("shake_output_bytes = 0");
        assert!(matches!(
            load_from(f.path()).unwrap_err(),
            ConfigError::Invalid { .. }
        ));
    }

    #[test]
    fn load_from_rejects_oversized_values() {
        let f = write_config("shake_output_bytes = 9223372036854775807");
        match load_from(f.path()).unwrap_err() {
            ConfigError::Invalid { message, .. } => {
                assert!(message.contains("shake_output_bytes"))
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
        let f = write_config(&format!("chunk_bytes = {}", MAX_CHUNK_SIZE + 1));
        match load_from(f.path()).unwrap_err() {
            ConfigError::Invalid { message, .. } => assert!(message.contains("chunk_bytes")),
            other => panic!("expected Invalid, got {:?}", other),
        }
        let f = write_config(&format!(
            "chunk_bytes = {}\nshake_output_bytes = {}",
            MAX_CHUNK_SIZE, MAX_XOF_OUTPUT_LEN
        ));
        assert!(load_from(f.path()).is_ok());
    }

    #[test]
    fn load_from_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
