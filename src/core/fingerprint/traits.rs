//! Trait definitions for content fingerprinting.

use crate::error::FingerprintError;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// A 128-bit digest of a file's full byte content.
///
/// Equal content always produces an equal fingerprint. The reverse only holds
/// with high probability: two different files sharing a fingerprint would be
/// classified as duplicates, and with deletion enabled the later one would be
/// lost. The 128-bit width keeps that chance negligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u128);

impl Fingerprint {
    /// Wrap a raw digest value
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// The raw digest value
    pub const fn value(&self) -> u128 {
        self.0
    }

    /// Get the fingerprint as a 32-character hexadecimal string
    pub fn to_hex(&self) -> String {
        format!("{:032x}", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Trait for content digest implementations
pub trait ContentHasher: Send + Sync {
    /// Short name of the digest, for logs
    fn name(&self) -> &'static str;

    /// Digest everything `reader` yields until EOF.
    fn hash_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint>;

    /// Fingerprint a file on disk.
    ///
    /// The path must name an existing regular file. Anything else (directory,
    /// symlink, FIFO, device, socket, missing path) is rejected without
    /// opening it. The file handle is dropped before returning.
    fn fingerprint_file(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FingerprintError::InvalidInput {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(FingerprintError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if !metadata.file_type().is_file() {
            return Err(FingerprintError::InvalidInput {
                path: path.to_path_buf(),
            });
        }

        let mut file = File::open(path).map_err(|source| FingerprintError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.hash_reader(&mut file)
            .map_err(|source| FingerprintError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}
