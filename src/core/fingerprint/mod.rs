//! # Fingerprint Module
//!
//! Computes fixed-size digests of whole file contents.
//!
//! ## Identity Model
//! Two files are treated as identical when their fingerprints match. This is
//! a probabilistic check: a digest collision between unrelated files would
//! make the later one look like a duplicate, and with deletion enabled it
//! would be removed for good. The default digest is XXH3-128, wide enough
//! that an accidental collision is not a practical concern. Weaker in-memory
//! hashes (64 bits or less) must not be used here.
//!
//! The whole file is always hashed. Sampling or prefix hashing would turn
//! files that merely share a header into false duplicates.
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_file_cleaner::core::fingerprint::{ContentHasher, Xxh3Hasher};
//!
//! let fingerprint = Xxh3Hasher::new().fingerprint_file(&path)?;
//! println!("{}", fingerprint);
//! ```

mod traits;
mod xxh3;

pub use traits::{ContentHasher, Fingerprint};
pub use xxh3::{Xxh3Hasher, DEFAULT_BUFFER_SIZE};

/// The digest used when the caller does not pick one
pub fn default_hasher() -> Box<dyn ContentHasher> {
    Box::new(Xxh3Hasher::new())
}
