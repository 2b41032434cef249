//! Event type definitions for progress reporting.

use crate::core::pipeline::{FileOutcome, RunSummary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the gallery pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Directory listing events
    Scan(ScanEvent),
    /// Hashing events
    Hash(HashEvent),
    /// Placement events, one per directory entry
    Place(PlaceEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events while listing the source directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Listing has started
    Started { path: PathBuf },
    /// An entry was found
    EntryFound { path: PathBuf },
    /// An entry could not be read but listing continues
    Error { path: PathBuf, message: String },
    /// Listing completed
    Completed { total_entries: usize },
}

/// Events while hashing a single image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    /// An image was hashed
    Hashed { path: PathBuf, fingerprint: String },
    /// Decoding or hashing failed, the file stays in place
    Error { path: PathBuf, message: String },
}

/// Events describing what happened to each entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaceEvent {
    /// An entry reached its terminal state
    Progress(PlaceProgress),
}

/// Progress information after each processed entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceProgress {
    /// Number of entries processed so far
    pub completed: usize,
    /// Total number of entries in the source directory
    pub total: usize,
    /// What happened to the entry
    pub outcome: FileOutcome,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed
    Completed { summary: RunSummary },
    /// Pipeline hit a fatal setup error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Processing,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Processing => write!(f, "Processing"),
        }
    }
}
