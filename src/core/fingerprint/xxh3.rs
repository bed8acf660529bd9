//! XXH3-128 content hasher.

use super::traits::{ContentHasher, Fingerprint};
use std::io::{self, Read};
use xxhash_rust::xxh3::Xxh3;

/// Read buffer used when streaming file content into the digest
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Streams content through XXH3 and keeps the full 128-bit result.
#[derive(Debug, Clone)]
pub struct Xxh3Hasher {
    buffer_size: usize,
}

impl Xxh3Hasher {
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Override the read chunk size. The digest does not depend on it.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }
}

impl Default for Xxh3Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHasher for Xxh3Hasher {
    fn name(&self) -> &'static str {
        "xxh3-128"
    }

    fn hash_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint> {
        let mut state = Xxh3::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => state.update(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(Fingerprint::new(state.digest128()))
    }
}
