//! # Core Module
//!
//! The UI-agnostic duplicate detection engine.
//!
//! ## Modules
//! - `scanner` - Discovers regular files under a root directory
//! - `fingerprint` - Computes 128-bit content digests
//! - `registry` - Remembers the first path seen for each digest
//! - `rename` - Generates unique random names for survivors
//! - `pipeline` - Orchestrates the full workflow

pub mod fingerprint;
pub mod pipeline;
pub mod registry;
pub mod rename;
pub mod scanner;

// Re-export commonly used types
pub use fingerprint::{ContentHasher, Fingerprint, Xxh3Hasher};
pub use pipeline::{DuplicateRecord, Pipeline, PipelineResult};
pub use registry::{Registration, Registry};
pub use rename::{RenameConfig, RenamedFile};
pub use scanner::ScannedFile;
