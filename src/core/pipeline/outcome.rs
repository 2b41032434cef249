//! Per-file outcomes and the run summary built from them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Terminal state of a single source directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Extension outside the allow-list; left untouched
    SkippedNonImage { path: PathBuf },
    /// Subdirectory; left untouched
    SkippedDirectory { path: PathBuf },
    /// Moved into the gallery
    Moved {
        from: PathBuf,
        to: PathBuf,
        fingerprint: String,
    },
    /// Gallery already has this name; left untouched
    SkippedDuplicate {
        path: PathBuf,
        existing: PathBuf,
        fingerprint: String,
    },
    /// Dry run: would be moved
    Planned {
        from: PathBuf,
        to: PathBuf,
        fingerprint: String,
    },
    /// Reading, decoding, hashing or moving failed; left untouched
    Failed { path: PathBuf, message: String },
}

/// Counts of each outcome over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_entries: usize,
    pub moved: usize,
    pub planned: usize,
    pub duplicates: usize,
    pub non_images: usize,
    pub directories: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

impl RunSummary {
    /// Count one outcome
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.total_entries += 1;
        match outcome {
            FileOutcome::SkippedNonImage { .. } => self.non_images += 1,
            FileOutcome::SkippedDirectory { .. } => self.directories += 1,
            FileOutcome::Moved { .. } => self.moved += 1,
            FileOutcome::SkippedDuplicate { .. } => self.duplicates += 1,
            FileOutcome::Planned { .. } => self.planned += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }
}
