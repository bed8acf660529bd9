//! # Scanner Module
//!
//! Discovers regular files under a root directory.
//!
//! Traversal is recursive, does not follow symbolic links, and by default
//! visits the entries of each directory in file-name order so repeated runs
//! see files in the same sequence. Directories, symlinks and special files
//! (FIFOs, sockets, devices) are never yielded.
//!
//! ## Example
//! ```rust,ignore
//! use duplicate_file_cleaner::core::scanner::{FileScanner, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::default();
//! for file in scanner.walk(Path::new("/data"))? {
//!     println!("{:?}", file?.path);
//! }
//! ```

mod walker;

pub use walker::{validate_root, ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A regular file found during traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedFile {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Result of a full, collected scan
#[derive(Debug)]
pub struct ScanResult {
    /// Regular files in traversal order
    pub files: Vec<ScannedFile>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for file scanners
///
/// Implement this trait to create custom scanners (e.g., for testing).
pub trait FileScanner: Send + Sync {
    /// Validate `root` and lazily yield its regular files.
    ///
    /// An invalid root is returned as the outer error before anything is
    /// read. Per-entry failures are yielded inline.
    fn walk<'a>(
        &'a self,
        root: &Path,
    ) -> Result<Box<dyn Iterator<Item = Result<ScannedFile, ScanError>> + 'a>, ScanError>;

    /// Collect the whole walk into memory
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError>;
}
