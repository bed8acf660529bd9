//! Fingerprint → first-seen path registry.
//!
//! The registry holds exactly one path per distinct fingerprint: the first
//! one registered. It lives for the classification phase only and is consumed
//! into the list of survivors once traversal ends, so stale paths can never
//! be looked up after files start being renamed.

use super::fingerprint::Fingerprint;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Outcome of registering a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration<'a> {
    /// First file with this content; it is now the canonical copy
    Canonical,
    /// Content already seen; `canonical` is the path that was seen first
    Duplicate { canonical: &'a Path },
}

/// Maps each distinct fingerprint to its canonical path
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<Fingerprint, PathBuf>,
    /// Canonical paths in the order they were first registered
    order: Vec<Fingerprint>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` under `fingerprint`.
    ///
    /// The first path for a fingerprint is kept; later ones are reported as
    /// duplicates and never replace it.
    pub fn register(&mut self, fingerprint: Fingerprint, path: &Path) -> Registration<'_> {
        match self.entries.entry(fingerprint) {
            Entry::Occupied(occupied) => Registration::Duplicate {
                canonical: occupied.into_mut().as_path(),
            },
            Entry::Vacant(vacant) => {
                vacant.insert(path.to_path_buf());
                self.order.push(fingerprint);
                Registration::Canonical
            }
        }
    }

    /// Canonical path for a fingerprint, if any
    pub fn canonical(&self, fingerprint: &Fingerprint) -> Option<&Path> {
        self.entries.get(fingerprint).map(PathBuf::as_path)
    }

    /// Number of distinct fingerprints registered
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the registry, yielding canonical paths in first-seen order.
    pub fn into_survivors(mut self) -> Vec<PathBuf> {
        self.order
            .iter()
            .filter_map(|fingerprint| self.entries.remove(fingerprint))
            .collect()
    }
}
