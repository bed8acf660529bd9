//! # Error Module
//!
//! Error types for the duplicate file cleaner.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Fatal vs. local** - only an invalid root aborts a run; every
//!   per-file failure is reported and skipped

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DuplicateFinderError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Rename error: {0}")]
    Rename(#[from] RenameError),
}

impl DuplicateFinderError {
    /// True when the run was rejected because of its root path.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, DuplicateFinderError::Scan(e) if e.is_invalid_input())
    }
}

/// Errors that occur while walking the directory tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Path is empty")]
    EmptyPath,

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Selected path isn't a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read metadata of {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Root-path problems that abort the run before any traversal.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ScanError::EmptyPath
                | ScanError::DirectoryNotFound { .. }
                | ScanError::NotADirectory { .. }
        )
    }
}

/// Errors that occur while fingerprinting a single file
#[derive(Error, Debug)]
pub enum FingerprintError {
    #[error("Not a regular file: {path}")]
    InvalidInput { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while renaming a surviving file
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("No unused identifier found after {attempts} attempts")]
    IdentifiersExhausted { attempts: usize },

    #[error("Invalid identifier range {low}..={high}")]
    InvalidRange { low: u64, high: u64 },

    #[error("File has no parent directory: {path}")]
    NoParent { path: PathBuf },

    #[error("Target already exists: {path}")]
    DestinationExists { path: PathBuf },

    #[error("Failed to rename {from} to {to}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DuplicateFinderError>;
