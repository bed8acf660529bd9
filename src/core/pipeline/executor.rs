//! Pipeline execution implementation.

use crate::core::fingerprint::{default_hasher, ContentHasher};
use crate::core::registry::{Registration, Registry};
use crate::core::rename::{RenameConfig, RenameExecutor, RenamedFile};
use crate::core::scanner::{validate_root, FileScanner, ScanConfig, WalkDirScanner};
use crate::error::{DuplicateFinderError, ScanError};
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary, ScanEvent,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A file classified as a copy of an earlier one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    pub duplicate_path: PathBuf,
    pub canonical_path: PathBuf,
    /// Whether the duplicate was removed from disk
    pub deleted: bool,
    /// Size of the duplicate in bytes
    pub size_bytes: u64,
}

/// Result of pipeline execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Directory that was processed
    pub root: PathBuf,
    /// Regular files visited
    pub files_scanned: usize,
    /// Files classified as duplicates
    pub duplicate_count: usize,
    /// Every duplicate, in traversal order
    pub duplicates: Vec<DuplicateRecord>,
    /// Canonical paths as they were at the end of classification
    pub survivors: Vec<PathBuf>,
    /// Survivors that received a generated name
    pub renamed: Vec<RenamedFile>,
    /// Survivors that vanished before they could be renamed
    pub skipped_renames: usize,
    /// Bytes freed by deleting duplicates
    pub reclaimed_bytes: u64,
    /// Per-file failures (non-fatal)
    pub errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PipelineResult {
    /// Number of duplicates actually removed
    pub fn deleted_count(&self) -> usize {
        self.duplicates.iter().filter(|d| d.deleted).count()
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory to process
    pub root: PathBuf,
    /// Give survivors random names after classification
    pub rename: bool,
    /// Remove duplicates as soon as they are found
    pub delete_duplicates: bool,
    /// Scanner configuration
    pub scan_config: ScanConfig,
    /// Identifier generation settings
    pub rename_config: RenameConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            rename: false,
            delete_duplicates: false,
            scan_config: ScanConfig::default(),
            rename_config: RenameConfig::default(),
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    hasher: Option<Box<dyn ContentHasher>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            hasher: None,
        }
    }

    /// Set the directory to process
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Rename survivors after classification
    pub fn rename(mut self, enabled: bool) -> Self {
        self.config.rename = enabled;
        self
    }

    /// Delete duplicates during classification
    pub fn delete_duplicates(mut self, enabled: bool) -> Self {
        self.config.delete_duplicates = enabled;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Limit traversal depth
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.config.scan_config.max_depth = depth;
        self
    }

    /// Set identifier generation settings
    pub fn rename_config(mut self, config: RenameConfig) -> Self {
        self.config.rename_config = config;
        self
    }

    /// Replace the content digest
    pub fn hasher(mut self, hasher: Box<dyn ContentHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            scanner: WalkDirScanner::new(self.config.scan_config.clone()),
            config: self.config,
            hasher: self.hasher.unwrap_or_else(default_hasher),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One dedup-and-rename run over a directory tree
pub struct Pipeline {
    config: PipelineConfig,
    scanner: WalkDirScanner,
    hasher: Box<dyn ContentHasher>,
}

/// Mutable state of the classification phase
struct Classification {
    registry: Registry,
    files_scanned: usize,
    duplicates: Vec<DuplicateRecord>,
    reclaimed_bytes: u64,
    errors: Vec<String>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// The configuration this pipeline runs with
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, DuplicateFinderError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// Only an invalid root (or an invalid rename configuration) is returned
    /// as an error, before anything on disk is touched. Every per-file problem
    /// is reported as an event and recorded in [`PipelineResult::errors`].
    pub fn run_with_events(
        &self,
        events: &EventSender,
    ) -> Result<PipelineResult, DuplicateFinderError> {
        let start_time = Instant::now();
        let root = self.config.root.as_path();

        events.send(Event::Pipeline(PipelineEvent::Started {
            root: root.to_path_buf(),
        }));

        let mut renamer = self
            .prepare(root)
            .map_err(|e| Self::abort(root, e, events))?;

        let classification = self.scan_phase(root, events)?;
        let duplicate_count = classification.duplicates.len();

        events.send(Event::Scan(ScanEvent::Summary { duplicate_count }));
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Classified,
        }));
        info!(
            files = classification.files_scanned,
            duplicates = duplicate_count,
            "classification finished"
        );

        let Classification {
            registry,
            files_scanned,
            duplicates,
            reclaimed_bytes,
            mut errors,
        } = classification;

        // The registry is consumed here; its paths go stale once renaming starts
        let survivors = registry.into_survivors();

        // Phase 2: rename survivors
        let mut renamed = Vec::new();
        let mut skipped_renames = 0;

        if let Some(renamer) = renamer.as_mut() {
            events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Renaming,
            }));
            info!(survivors = survivors.len(), "renaming");

            let outcome = renamer.execute(&survivors, events);
            renamed = outcome.renamed;
            skipped_renames = outcome.skipped;
            errors.extend(outcome.errors);
        }

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Done,
        }));

        let duration_ms = start_time.elapsed().as_millis() as u64;
        let result = PipelineResult {
            root: root.to_path_buf(),
            files_scanned,
            duplicate_count,
            duplicates,
            survivors,
            renamed,
            skipped_renames,
            reclaimed_bytes,
            errors,
            duration_ms,
        };

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                files_scanned: result.files_scanned,
                duplicate_count: result.duplicate_count,
                deleted_count: result.deleted_count(),
                renamed_count: result.renamed.len(),
                error_count: result.errors.len(),
                duration_ms,
            },
        }));

        Ok(result)
    }

    /// Report a fatal error once and hand it back to the caller.
    fn abort(
        root: &Path,
        error: DuplicateFinderError,
        events: &EventSender,
    ) -> DuplicateFinderError {
        warn!(root = %root.display(), error = %error, "run aborted");
        events.send(Event::Pipeline(PipelineEvent::Aborted {
            message: error.to_string(),
        }));
        error
    }

    /// Checks done before any traversal; failures abort the run.
    fn prepare(&self, root: &Path) -> Result<Option<RenameExecutor>, DuplicateFinderError> {
        validate_root(root)?;

        if self.config.rename {
            Ok(Some(RenameExecutor::new(self.config.rename_config)?))
        } else {
            Ok(None)
        }
    }

    /// Phase 1: scan and classify. The root is checked again by the walk,
    /// so a root that vanished since `prepare` still aborts the run.
    fn scan_phase(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<Classification, DuplicateFinderError> {
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));
        info!(root = %root.display(), hasher = self.hasher.name(), "scanning");

        self.classify(root, events)
            .map_err(|e| Self::abort(root, e, events))
    }

    fn classify(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<Classification, DuplicateFinderError> {
        let mut state = Classification {
            registry: Registry::new(),
            files_scanned: 0,
            duplicates: Vec::new(),
            reclaimed_bytes: 0,
            errors: Vec::new(),
        };

        for item in self.scanner.walk(root)? {
            let file = match item {
                Ok(file) => file,
                Err(e) => {
                    let path = match &e {
                        ScanError::PermissionDenied { path }
                        | ScanError::ReadDirectory { path, .. }
                        | ScanError::ReadEntry { path, .. } => path.clone(),
                        _ => root.to_path_buf(),
                    };
                    warn!(path = %path.display(), error = %e, "unreadable entry");
                    events.send(Event::Scan(ScanEvent::FileUnreadable {
                        path,
                        reason: e.to_string(),
                    }));
                    state.errors.push(e.to_string());
                    continue;
                }
            };

            state.files_scanned += 1;

            let fingerprint = match self.hasher.fingerprint_file(&file.path) {
                Ok(fingerprint) => fingerprint,
                Err(e) => {
                    warn!(path = %file.path.display(), error = %e, "cannot fingerprint");
                    events.send(Event::Scan(ScanEvent::FileUnreadable {
                        path: file.path.clone(),
                        reason: e.to_string(),
                    }));
                    state.errors.push(e.to_string());
                    continue;
                }
            };

            let canonical_path = match state.registry.register(fingerprint, &file.path) {
                Registration::Canonical => {
                    debug!(path = %file.path.display(), %fingerprint, "canonical");
                    continue;
                }
                Registration::Duplicate { canonical } => canonical.to_path_buf(),
            };

            let mut delete_error = None;
            let deleted = if self.config.delete_duplicates {
                match fs::remove_file(&file.path) {
                    Ok(()) => true,
                    Err(e) => {
                        delete_error = Some(e.to_string());
                        false
                    }
                }
            } else {
                false
            };

            debug!(
                duplicate = %file.path.display(),
                canonical = %canonical_path.display(),
                deleted,
                "duplicate"
            );
            events.send(Event::Scan(ScanEvent::DuplicateFound {
                duplicate_path: file.path.clone(),
                canonical_path: canonical_path.clone(),
                deleted,
            }));

            if let Some(reason) = delete_error {
                warn!(path = %file.path.display(), error = %reason, "delete failed");
                events.send(Event::Scan(ScanEvent::DeleteFailed {
                    path: file.path.clone(),
                    reason: reason.clone(),
                }));
                state
                    .errors
                    .push(format!("{}: {}", file.path.display(), reason));
            }

            if deleted {
                state.reclaimed_bytes += file.size;
            }

            state.duplicates.push(DuplicateRecord {
                duplicate_path: file.path,
                canonical_path,
                deleted,
                size_bytes: file.size,
            });
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fingerprint::{Fingerprint, Xxh3Hasher};
    use crate::error::FingerprintError;
    use crate::events::EventChannel;
    use std::io::{self, Read};
    use tempfile::TempDir;

    /// Maps every input to the same fingerprint
    struct CollidingHasher;

    impl ContentHasher for CollidingHasher {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn hash_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint> {
            io::copy(reader, &mut io::sink())?;
            Ok(Fingerprint::new(0))
        }
    }

    /// Refuses to digest files whose whole content is `bad`
    struct PickyHasher;

    impl ContentHasher for PickyHasher {
        fn name(&self) -> &'static str {
            "picky"
        }

        fn hash_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint> {
            let mut content = Vec::new();
            reader.read_to_end(&mut content)?;
            if content == b"bad" {
                return Err(io::Error::new(io::ErrorKind::Other, "boom"));
            }
            Xxh3Hasher::new().hash_reader(&mut content.as_slice())
        }
    }

    /// Removes `victim` right after fingerprinting it, like a concurrent
    /// cleanup racing the run
    struct RemovingHasher {
        victim: PathBuf,
    }

    impl ContentHasher for RemovingHasher {
        fn name(&self) -> &'static str {
            "removing"
        }

        fn hash_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint> {
            Xxh3Hasher::new().hash_reader(reader)
        }

        fn fingerprint_file(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
            let fingerprint = Xxh3Hasher::new().fingerprint_file(path)?;
            if path == self.victim {
                fs::remove_file(path).unwrap();
            }
            Ok(fingerprint)
        }
    }

    fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn pipeline_builder_sets_flags() {
        let pipeline = Pipeline::builder()
            .root("/data")
            .rename(true)
            .delete_duplicates(true)
            .max_depth(Some(3))
            .build();

        assert_eq!(pipeline.config().root, PathBuf::from("/data"));
        assert!(pipeline.config().rename);
        assert!(pipeline.config().delete_duplicates);
        assert_eq!(pipeline.config().scan_config.max_depth, Some(3));
    }

    #[test]
    fn pipeline_handles_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let pipeline = Pipeline::builder().root(temp_dir.path()).build();
        let result = pipeline.run().unwrap();

        assert_eq!(result.files_scanned, 0);
        assert_eq!(result.duplicate_count, 0);
        assert!(result.survivors.is_empty());
    }

    #[test]
    fn first_file_in_traversal_order_is_canonical() {
        let temp_dir = TempDir::new().unwrap();
        let a = write(temp_dir.path(), "a.txt", b"same");
        let b = write(temp_dir.path(), "b.txt", b"same");
        let c = write(temp_dir.path(), "c.txt", b"same");

        let result = Pipeline::builder().root(temp_dir.path()).build().run().unwrap();

        assert_eq!(result.duplicate_count, 2);
        assert_eq!(result.survivors, vec![a.clone()]);
        assert_eq!(result.duplicates[0].duplicate_path, b);
        assert_eq!(result.duplicates[1].duplicate_path, c);
        assert!(result.duplicates.iter().all(|d| d.canonical_path == a));
    }

    #[test]
    fn duplicates_across_directories_are_found() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "one/photo.jpg", b"pixels");
        write(temp_dir.path(), "two/deeper/copy.jpg", b"pixels");
        write(temp_dir.path(), "two/other.jpg", b"different");

        let result = Pipeline::builder().root(temp_dir.path()).build().run().unwrap();

        assert_eq!(result.files_scanned, 3);
        assert_eq!(result.duplicate_count, 1);
        assert_eq!(result.survivors.len(), 2);
    }

    #[test]
    fn delete_removes_duplicate_and_keeps_canonical() {
        let temp_dir = TempDir::new().unwrap();
        let a = write(temp_dir.path(), "a.bin", b"0123456789");
        let b = write(temp_dir.path(), "b.bin", b"0123456789");

        let result = Pipeline::builder()
            .root(temp_dir.path())
            .delete_duplicates(true)
            .build()
            .run()
            .unwrap();

        assert!(a.exists());
        assert!(!b.exists());
        assert_eq!(result.deleted_count(), 1);
        assert_eq!(result.reclaimed_bytes, 10);
    }

    #[test]
    fn colliding_hasher_classifies_distinct_content_as_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.txt", b"alpha");
        write(temp_dir.path(), "b.txt", b"beta");

        let result = Pipeline::builder()
            .root(temp_dir.path())
            .hasher(Box::new(CollidingHasher))
            .build()
            .run()
            .unwrap();

        // A collision is indistinguishable from a real duplicate
        assert_eq!(result.duplicate_count, 1);
    }

    #[test]
    fn events_follow_phase_order() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.txt", b"x");
        write(temp_dir.path(), "b.txt", b"x");

        let (sender, receiver) = EventChannel::new();
        Pipeline::builder()
            .root(temp_dir.path())
            .rename(true)
            .build()
            .run_with_events(&sender)
            .unwrap();

        let phases: Vec<PipelinePhase> = receiver
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => Some(phase),
                _ => None,
            })
            .collect();

        assert_eq!(
            phases,
            vec![
                PipelinePhase::Scanning,
                PipelinePhase::Classified,
                PipelinePhase::Renaming,
                PipelinePhase::Done,
            ]
        );
    }

    #[test]
    fn rename_phase_skipped_when_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let a = write(temp_dir.path(), "a.txt", b"x");

        let result = Pipeline::builder().root(temp_dir.path()).build().run().unwrap();

        assert!(result.renamed.is_empty());
        assert!(a.exists());
    }

    #[test]
    fn renamed_survivors_exclude_deleted_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.txt", b"twin");
        write(temp_dir.path(), "b.txt", b"twin");
        write(temp_dir.path(), "c.txt", b"solo");

        let result = Pipeline::builder()
            .root(temp_dir.path())
            .delete_duplicates(true)
            .rename(true)
            .build()
            .run()
            .unwrap();

        assert_eq!(result.renamed.len(), 2);
        assert!(result
            .renamed
            .iter()
            .all(|r| r.old_path != temp_dir.path().join("b.txt")));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn invalid_rename_config_aborts_before_scanning() {
        let temp_dir = TempDir::new().unwrap();
        let a = write(temp_dir.path(), "a.txt", b"dup");
        let b = write(temp_dir.path(), "b.txt", b"dup");

        let result = Pipeline::builder()
            .root(temp_dir.path())
            .rename(true)
            .delete_duplicates(true)
            .rename_config(RenameConfig {
                low: 9,
                high: 1,
                max_attempts: 1,
            })
            .build()
            .run();

        assert!(matches!(result, Err(DuplicateFinderError::Rename(_))));
        assert!(a.exists());
        assert!(b.exists());
    }

    #[test]
    fn nonexistent_root_aborts() {
        let (sender, receiver) = EventChannel::new();
        let result = Pipeline::builder()
            .root("/nonexistent/path/that/does/not/exist")
            .build()
            .run_with_events(&sender);

        let error = result.unwrap_err();
        assert!(error.is_invalid_input());

        let events = receiver.drain();
        assert!(matches!(
            events.last(),
            Some(Event::Pipeline(PipelineEvent::Aborted { .. }))
        ));
    }

    #[test]
    fn unreadable_file_is_reported_and_scan_continues() {
        let temp_dir = TempDir::new().unwrap();
        let a = write(temp_dir.path(), "a", b"bad");
        write(temp_dir.path(), "b", b"xy");
        write(temp_dir.path(), "c", b"xy");
        write(temp_dir.path(), "d", b"zw");

        let (sender, receiver) = EventChannel::new();
        let result = Pipeline::builder()
            .root(temp_dir.path())
            .hasher(Box::new(PickyHasher))
            .build()
            .run_with_events(&sender)
            .unwrap();

        assert_eq!(result.files_scanned, 4);
        assert_eq!(result.duplicate_count, 1);
        assert_eq!(result.survivors.len(), 2);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("boom"));

        let events = receiver.drain();
        let unreadable: Vec<&PathBuf> = events
            .iter()
            .filter_map(|e| match e {
                Event::Scan(ScanEvent::FileUnreadable { path, .. }) => Some(path),
                _ => None,
            })
            .collect();
        assert_eq!(unreadable, vec![&a]);
        assert!(matches!(
            events.last(),
            Some(Event::Pipeline(PipelineEvent::Completed { summary })) if summary.error_count == 1
        ));
    }

    #[test]
    fn failed_delete_is_reported_after_the_duplicate() {
        let temp_dir = TempDir::new().unwrap();
        let a = write(temp_dir.path(), "a.txt", b"twin");
        let b = write(temp_dir.path(), "b.txt", b"twin");
        let c = write(temp_dir.path(), "c.txt", b"twin");

        let (sender, receiver) = EventChannel::new();
        let result = Pipeline::builder()
            .root(temp_dir.path())
            .delete_duplicates(true)
            .hasher(Box::new(RemovingHasher { victim: b.clone() }))
            .build()
            .run_with_events(&sender)
            .unwrap();

        assert_eq!(result.duplicate_count, 2);
        assert_eq!(result.deleted_count(), 1);
        assert_eq!(result.errors.len(), 1);
        assert!(!result.duplicates[0].deleted);
        assert!(result.duplicates[1].deleted);
        assert!(a.exists());
        assert!(!c.exists());

        let scans: Vec<ScanEvent> = receiver
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                Event::Scan(scan) => Some(scan),
                _ => None,
            })
            .collect();

        assert_eq!(
            scans[0],
            ScanEvent::DuplicateFound {
                duplicate_path: b.clone(),
                canonical_path: a.clone(),
                deleted: false,
            }
        );
        assert!(matches!(&scans[1], ScanEvent::DeleteFailed { path, .. } if path == &b));
        assert_eq!(
            scans[2],
            ScanEvent::DuplicateFound {
                duplicate_path: c,
                canonical_path: a,
                deleted: true,
            }
        );
        assert_eq!(scans[3], ScanEvent::Summary { duplicate_count: 2 });
    }

    #[test]
    fn root_vanishing_before_the_walk_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("tree");
        fs::create_dir(&root).unwrap();
        let pipeline = Pipeline::builder().root(&root).build();

        assert!(pipeline.prepare(&root).unwrap().is_none());
        fs::remove_dir(&root).unwrap();

        let (sender, receiver) = EventChannel::new();
        let error = pipeline.scan_phase(&root, &sender).err().unwrap();

        assert!(error.is_invalid_input());
        assert!(matches!(
            receiver.drain().as_slice(),
            [
                Event::Pipeline(PipelineEvent::PhaseChanged {
                    phase: PipelinePhase::Scanning
                }),
                Event::Pipeline(PipelineEvent::Aborted { .. }),
            ]
        ));
    }
}
