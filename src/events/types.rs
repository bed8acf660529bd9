//! Event type definitions for run reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the duplicate finder pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Scanning and classification events
    Scan(ScanEvent),
    /// Rename phase events
    Rename(RenameEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the scanning and classification phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanEvent {
    /// A file has the same content as an earlier file
    DuplicateFound {
        duplicate_path: PathBuf,
        canonical_path: PathBuf,
        /// Whether the duplicate was removed from disk
        deleted: bool,
    },
    /// A file or directory entry could not be read; scanning continues
    FileUnreadable { path: PathBuf, reason: String },
    /// Removing a duplicate failed; the file is left in place
    DeleteFailed { path: PathBuf, reason: String },
    /// Traversal finished
    Summary { duplicate_count: usize },
}

/// Events during the rename phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenameEvent {
    /// A surviving file received its generated name
    FileRenamed { old_path: PathBuf, new_path: PathBuf },
    /// A surviving file kept its name because renaming failed
    RenameFailed { path: PathBuf, reason: String },
}

/// Pipeline-level events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started { root: PathBuf },
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed
    Completed { summary: PipelineSummary },
    /// The root path was rejected; nothing was touched
    Aborted { message: String },
}

/// Phases of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Classified,
    Renaming,
    Done,
}

/// Summary of pipeline results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Regular files visited
    pub files_scanned: usize,
    /// Files classified as duplicates of an earlier file
    pub duplicate_count: usize,
    /// Duplicates actually removed
    pub deleted_count: usize,
    /// Survivors that received a new name
    pub renamed_count: usize,
    /// Per-file failures of any kind
    pub error_count: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Classified => write!(f, "Classified"),
            PipelinePhase::Renaming => write!(f, "Renaming"),
            PipelinePhase::Done => write!(f, "Done"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Scan(ScanEvent::DuplicateFound {
            duplicate_path: PathBuf::from("/data/b.txt"),
            canonical_path: PathBuf::from("/data/a.txt"),
            deleted: true,
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, event);
    }

    #[test]
    fn pipeline_summary_is_serializable() {
        let summary = PipelineSummary {
            files_scanned: 1000,
            duplicate_count: 150,
            deleted_count: 150,
            renamed_count: 850,
            error_count: 0,
            duration_ms: 5000,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"renamed_count\":850"));
    }

    #[test]
    fn phase_display() {
        assert_eq!(PipelinePhase::Classified.to_string(), "Classified");
        assert_eq!(PipelinePhase::Done.to_string(), "Done");
    }
}
