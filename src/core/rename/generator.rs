//! Random identifier generator for renamed files.
//!
//! Identifiers are drawn uniformly from a closed range. Each value is handed
//! out at most once per generator, and the number of draws per identifier is
//! capped so a nearly exhausted range fails instead of spinning forever.

use crate::error::RenameError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Smallest generated identifier (ten decimal digits)
pub const ID_RANGE_LOW: u64 = 1_000_000_000;
/// Largest generated identifier
pub const ID_RANGE_HIGH: u64 = 9_999_999_999;
/// Draws allowed before giving up on a single identifier
pub const MAX_NAME_ATTEMPTS: usize = 64;

/// Settings for identifier generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameConfig {
    /// Inclusive lower bound
    pub low: u64,
    /// Inclusive upper bound
    pub high: u64,
    /// Draws per identifier before reporting exhaustion
    pub max_attempts: usize,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            low: ID_RANGE_LOW,
            high: ID_RANGE_HIGH,
            max_attempts: MAX_NAME_ATTEMPTS,
        }
    }
}

impl RenameConfig {
    pub fn validate(&self) -> Result<(), RenameError> {
        if self.low > self.high {
            return Err(RenameError::InvalidRange {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}

/// Hands out identifiers that are unique within one run
#[derive(Debug)]
pub struct UniqueNameGenerator<R: Rng = StdRng> {
    rng: R,
    config: RenameConfig,
    issued: HashSet<u64>,
}

impl UniqueNameGenerator<StdRng> {
    /// Generator seeded from OS entropy, so separate runs draw different
    /// sequences.
    pub fn new(config: RenameConfig) -> Result<Self, RenameError> {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> UniqueNameGenerator<R> {
    /// Generator driven by a caller-supplied RNG
    pub fn with_rng(config: RenameConfig, rng: R) -> Result<Self, RenameError> {
        config.validate()?;
        Ok(Self {
            rng,
            config,
            issued: HashSet::new(),
        })
    }

    /// Draw an identifier not issued before by this generator.
    pub fn next_id(&mut self) -> Result<u64, RenameError> {
        for _ in 0..self.config.max_attempts {
            let candidate = self.rng.gen_range(self.config.low..=self.config.high);
            if self.issued.insert(candidate) {
                return Ok(candidate);
            }
        }

        Err(RenameError::IdentifiersExhausted {
            attempts: self.config.max_attempts,
        })
    }

    /// Settings this generator draws with
    pub fn config(&self) -> &RenameConfig {
        &self.config
    }

    /// Identifiers issued so far
    pub fn issued(&self) -> &HashSet<u64> {
        &self.issued
    }
}

/// `{parent}/{id}{.extension}` for `original`.
///
/// Only the last extension is kept (`a.tar.gz` becomes `<id>.gz`), and a
/// file without one gets a bare identifier.
pub fn target_path(original: &Path, id: u64) -> Result<PathBuf, RenameError> {
    let parent = original.parent().ok_or_else(|| RenameError::NoParent {
        path: original.to_path_buf(),
    })?;

    let mut name = OsString::from(id.to_string());
    if let Some(extension) = original.extension() {
        name.push(".");
        name.push(extension);
    }

    Ok(parent.join(name))
}
