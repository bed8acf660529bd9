//! Applies generated names to surviving files.

use super::generator::{target_path, RenameConfig, UniqueNameGenerator};
use crate::error::RenameError;
use crate::events::{Event, EventSender, RenameEvent};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A successful rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedFile {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
}

/// Result of the rename phase
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenameResult {
    pub renamed: Vec<RenamedFile>,
    /// Survivors that were gone (or no longer regular files) at rename time
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// Renames survivors one at a time
pub struct RenameExecutor<R: Rng = StdRng> {
    generator: UniqueNameGenerator<R>,
}

impl RenameExecutor<StdRng> {
    /// Executor with an entropy-seeded generator
    pub fn new(config: RenameConfig) -> Result<Self, RenameError> {
        Ok(Self {
            generator: UniqueNameGenerator::new(config)?,
        })
    }
}

impl<R: Rng> RenameExecutor<R> {
    pub fn with_generator(generator: UniqueNameGenerator<R>) -> Self {
        Self { generator }
    }

    /// Identifiers handed out so far
    pub fn generator(&self) -> &UniqueNameGenerator<R> {
        &self.generator
    }

    /// Rename one file to a fresh identifier.
    ///
    /// Returns `Ok(None)` when `path` is no longer a regular file. An existing
    /// file at the target is never overwritten: another identifier is drawn,
    /// up to `max_attempts` times.
    pub fn rename_file(&mut self, path: &Path) -> Result<Option<PathBuf>, RenameError> {
        let still_regular = fs::symlink_metadata(path)
            .map(|m| m.file_type().is_file())
            .unwrap_or(false);
        if !still_regular {
            return Ok(None);
        }

        let target = self.free_target(path)?;

        fs::rename(path, &target).map_err(|source| RenameError::Io {
            from: path.to_path_buf(),
            to: target.clone(),
            source,
        })?;

        Ok(Some(target))
    }

    fn free_target(&mut self, path: &Path) -> Result<PathBuf, RenameError> {
        let mut occupied = None;

        for _ in 0..self.generator.config().max_attempts.max(1) {
            let target = target_path(path, self.generator.next_id()?)?;
            if fs::symlink_metadata(&target).is_err() {
                return Ok(target);
            }
            debug!(target = %target.display(), "target taken, drawing again");
            occupied = Some(target);
        }

        Err(RenameError::DestinationExists {
            path: occupied.unwrap_or_else(|| path.to_path_buf()),
        })
    }

    /// Rename every survivor, reporting each outcome through `events`.
    pub fn execute(&mut self, survivors: &[PathBuf], events: &EventSender) -> RenameResult {
        let mut result = RenameResult::default();

        for path in survivors {
            match self.rename_file(path) {
                Ok(Some(new_path)) => {
                    debug!(old = %path.display(), new = %new_path.display(), "renamed");
                    events.send(Event::Rename(RenameEvent::FileRenamed {
                        old_path: path.clone(),
                        new_path: new_path.clone(),
                    }));
                    result.renamed.push(RenamedFile {
                        old_path: path.clone(),
                        new_path,
                    });
                }
                Ok(None) => {
                    debug!(path = %path.display(), "no longer a regular file, not renamed");
                    result.skipped += 1;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "rename failed");
                    events.send(Event::Rename(RenameEvent::RenameFailed {
                        path: path.clone(),
                        reason: e.to_string(),
                    }));
                    result.errors.push(format!("{}: {}", path.display(), e));
                }
            }
        }

        result
    }
}
