//! # Duplicate File Cleaner
//!
//! Finds files with byte-identical content under a directory, optionally
//! deletes the copies, and optionally gives the surviving files random,
//! collision-free numeric names.
//!
//! ## Architecture
//! The library is split into a core engine and presentation layers:
//! - `core` - Fingerprinting, classification and renaming
//! - `events` - Structured run reporting (the core never prints)
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DuplicateFinderError, Result};

/// Initialize tracing for the library
///
/// `RUST_LOG` wins when set; otherwise `default_level` is used. Calling this
/// twice is harmless.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
