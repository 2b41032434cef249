//! Pipeline execution implementation.

use super::outcome::{FileOutcome, RunSummary};
use crate::core::hasher::{FingerprintHasher, PerceptualHasher};
use crate::core::placer::{Placement, Placer};
use crate::core::scanner::{
    EntryKind, EntryScanner, ScanConfig, ScanResult, SourceFile, WalkDirScanner,
};
use crate::error::{GalleryError, ScanError};
use crate::events::{
    null_sender, Event, EventSender, HashEvent, PipelineEvent, PipelinePhase, PlaceEvent,
    PlaceProgress,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

/// Default source directory
pub const DEFAULT_SOURCE_DIR: &str = "./raw_images";
/// Default gallery directory
pub const DEFAULT_GALLERY_DIR: &str = "./gallery";

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// One outcome per source entry, in file name order
    pub outcomes: Vec<FileOutcome>,
    /// Aggregated counts
    pub summary: RunSummary,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory to read images from
    pub source: PathBuf,
    /// Directory to move renamed images into
    pub gallery: PathBuf,
    /// Report what would happen without moving anything
    pub dry_run: bool,
    /// Scanner configuration
    pub scan_config: ScanConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE_DIR),
            gallery: PathBuf::from(DEFAULT_GALLERY_DIR),
            dry_run: false,
            scan_config: ScanConfig::default(),
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    hasher: Option<Box<dyn FingerprintHasher>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            hasher: None,
        }
    }

    /// Set the source directory
    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.config.source = source.into();
        self
    }

    /// Set the gallery directory
    pub fn gallery(mut self, gallery: impl Into<PathBuf>) -> Self {
        self.config.gallery = gallery.into();
        self
    }

    /// Enable or disable dry-run mode
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Replace the fingerprint hasher
    pub fn hasher(mut self, hasher: Box<dyn FingerprintHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            placer: Placer::new(self.config.gallery.clone()).dry_run(self.config.dry_run),
            config: self.config,
            hasher: self
                .hasher
                .unwrap_or_else(|| Box::new(PerceptualHasher::new())),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A listed entry, or one the walk could not read
enum Pending {
    Entry(EntryKind),
    Unreadable(ScanError),
}

impl Pending {
    fn path(&self) -> &Path {
        match self {
            Pending::Entry(entry) => entry.path(),
            Pending::Unreadable(error) => error.path(),
        }
    }
}

/// Interleave unreadable entries with readable ones by file name
fn in_name_order(scan: ScanResult) -> Vec<Pending> {
    let mut pending: Vec<Pending> = scan
        .entries
        .into_iter()
        .map(Pending::Entry)
        .chain(scan.errors.into_iter().map(Pending::Unreadable))
        .collect();
    pending.sort_by(|a, b| a.path().file_name().cmp(&b.path().file_name()));
    pending
}

/// Walk → hash → place, one entry at a time
pub struct Pipeline {
    config: PipelineConfig,
    hasher: Box<dyn FingerprintHasher>,
    placer: Placer,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, GalleryError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// Only setup failures (missing source, uncreatable gallery) are
    /// returned as errors; every per-file problem becomes a `Failed`
    /// outcome and the run continues.
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, GalleryError> {
        let start_time = Instant::now();

        events.send(Event::Pipeline(PipelineEvent::Started));
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let setup = self.placer.ensure_gallery().map_err(GalleryError::from).and_then(|()| {
            let scanner = WalkDirScanner::new(self.config.scan_config.clone());
            scanner
                .scan_with_events(&self.config.source, events)
                .map_err(GalleryError::from)
        });

        let scan_result = match setup {
            Ok(result) => result,
            Err(e) => {
                events.send(Event::Pipeline(PipelineEvent::Error {
                    message: e.to_string(),
                }));
                return Err(e);
            }
        };

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Processing,
        }));

        let total = scan_result.entries.len() + scan_result.errors.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut summary = RunSummary::default();
        let mut planned_names = HashSet::new();

        for item in in_name_order(scan_result) {
            let outcome = match item {
                Pending::Entry(entry) => self.process_entry(entry, events, &mut planned_names),
                Pending::Unreadable(error) => {
                    warn!(path = %error.path().display(), error = %error, "unreadable entry");
                    FileOutcome::Failed {
                        path: error.path().to_path_buf(),
                        message: error.to_string(),
                    }
                }
            };
            self.record(outcome, total, &mut summary, &mut outcomes, events);
        }

        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: summary.clone(),
        }));

        Ok(PipelineResult { outcomes, summary })
    }

    fn record(
        &self,
        outcome: FileOutcome,
        total: usize,
        summary: &mut RunSummary,
        outcomes: &mut Vec<FileOutcome>,
        events: &EventSender,
    ) {
        summary.record(&outcome);
        events.send(Event::Place(PlaceEvent::Progress(PlaceProgress {
            completed: summary.total_entries,
            total,
            outcome: outcome.clone(),
        })));
        outcomes.push(outcome);
    }

    fn process_entry(
        &self,
        entry: EntryKind,
        events: &EventSender,
        planned_names: &mut HashSet<PathBuf>,
    ) -> FileOutcome {
        match entry {
            EntryKind::NonImage { path } => {
                debug!(path = %path.display(), "skipping non-image");
                FileOutcome::SkippedNonImage { path }
            }
            EntryKind::Directory { path } => {
                debug!(path = %path.display(), "skipping directory");
                FileOutcome::SkippedDirectory { path }
            }
            EntryKind::Image(file) => self.process_image(file, events, planned_names),
        }
    }

    fn process_image(
        &self,
        file: SourceFile,
        events: &EventSender,
        planned_names: &mut HashSet<PathBuf>,
    ) -> FileOutcome {
        let fingerprint = match self.hasher.hash_file(&file.path, file.format) {
            Ok(fp) => fp,
            Err(e) => {
                warn!(path = %file.path.display(), error = %e, "hashing failed");
                events.send(Event::Hash(HashEvent::Error {
                    path: file.path.clone(),
                    message: e.to_string(),
                }));
                return FileOutcome::Failed {
                    path: file.path,
                    message: e.to_string(),
                };
            }
        };

        events.send(Event::Hash(HashEvent::Hashed {
            path: file.path.clone(),
            fingerprint: fingerprint.to_hex(),
        }));

        // A dry run moves nothing, so earlier plans have to count as taken names
        if self.config.dry_run {
            let destination = self.placer.destination(&fingerprint, &file.extension);
            if !planned_names.insert(destination.clone()) {
                return FileOutcome::SkippedDuplicate {
                    path: file.path,
                    existing: destination,
                    fingerprint: fingerprint.to_hex(),
                };
            }
        }

        match self.placer.place(&file, fingerprint) {
            Ok(Placement::Moved(entry)) => FileOutcome::Moved {
                from: file.path,
                to: entry.path,
                fingerprint: entry.fingerprint.to_hex(),
            },
            Ok(Placement::Planned(entry)) => FileOutcome::Planned {
                from: file.path,
                to: entry.path,
                fingerprint: entry.fingerprint.to_hex(),
            },
            Ok(Placement::Duplicate(entry)) => FileOutcome::SkippedDuplicate {
                path: file.path,
                existing: entry.path,
                fingerprint: entry.fingerprint.to_hex(),
            },
            Err(e) => {
                warn!(path = %file.path.display(), error = %e, "move failed");
                FileOutcome::Failed {
                    path: file.path,
                    message: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::Fingerprint;
    use crate::core::scanner::ImageFormat;
    use crate::error::HashError;
    use crate::events::channel;
    use image::DynamicImage;
    use std::fs;
    use tempfile::TempDir;

    /// Fingerprints files by their size, skipping decoding entirely
    struct SizeHasher;

    impl FingerprintHasher for SizeHasher {
        fn hash_image(&self, _image: &DynamicImage) -> Result<Fingerprint, HashError> {
            unreachable!("hash_file is overridden")
        }

        fn hash_file(&self, path: &Path, _format: ImageFormat) -> Result<Fingerprint, HashError> {
            let len = fs::metadata(path)
                .map_err(|e| HashError::IoError {
                    path: path.to_path_buf(),
                    source: e,
                })?
                .len();
            if len == 0 {
                return Err(HashError::EmptyImage {
                    path: path.to_path_buf(),
                });
            }
            Ok(Fingerprint::new(len.to_be_bytes()))
        }
    }

    fn pipeline(raw: &TempDir, gallery: &Path) -> PipelineBuilder {
        Pipeline::builder()
            .source(raw.path())
            .gallery(gallery)
            .hasher(Box::new(SizeHasher))
    }

    #[test]
    fn defaults_point_at_fixed_directories() {
        let config = PipelineConfig::default();
        assert_eq!(config.source, PathBuf::from("./raw_images"));
        assert_eq!(config.gallery, PathBuf::from("./gallery"));
        assert!(!config.dry_run);
    }

    #[test]
    fn run_creates_gallery_and_moves_images() {
        let raw = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let gallery = root.path().join("gallery");
        fs::write(raw.path().join("a.PNG"), b"abc").unwrap();

        let result = pipeline(&raw, &gallery).build().run().unwrap();

        assert_eq!(result.summary.moved, 1);
        assert!(gallery.join("0000000000000003.png").exists());
        assert!(!raw.path().join("a.PNG").exists());
    }

    #[test]
    fn same_fingerprint_and_extension_keeps_second_in_source() {
        let raw = TempDir::new().unwrap();
        let gallery = TempDir::new().unwrap();
        fs::write(raw.path().join("first.jpg"), b"1234").unwrap();
        fs::write(raw.path().join("second.jpg"), b"5678").unwrap();

        let result = pipeline(&raw, gallery.path()).build().run().unwrap();

        assert_eq!(result.summary.moved, 1);
        assert_eq!(result.summary.duplicates, 1);
        assert!(raw.path().join("second.jpg").exists());
        assert!(!raw.path().join("first.jpg").exists());
    }

    #[test]
    fn failures_do_not_stop_the_run() {
        let raw = TempDir::new().unwrap();
        let gallery = TempDir::new().unwrap();
        fs::write(raw.path().join("a_empty.gif"), b"").unwrap();
        fs::write(raw.path().join("b_ok.gif"), b"xy").unwrap();

        let result = pipeline(&raw, gallery.path()).build().run().unwrap();

        assert_eq!(result.summary.failed, 1);
        assert_eq!(result.summary.moved, 1);
        assert!(matches!(result.outcomes[0], FileOutcome::Failed { .. }));
        assert!(raw.path().join("a_empty.gif").exists());
    }

    #[test]
    fn dry_run_reports_collisions_among_planned_moves() {
        let raw = TempDir::new().unwrap();
        let gallery = TempDir::new().unwrap();
        fs::write(raw.path().join("a.bmp"), b"same").unwrap();
        fs::write(raw.path().join("b.bmp"), b"size").unwrap();

        let result = pipeline(&raw, gallery.path())
            .dry_run(true)
            .build()
            .run()
            .unwrap();

        assert_eq!(result.summary.planned, 1);
        assert_eq!(result.summary.duplicates, 1);
        assert!(raw.path().join("a.bmp").exists());
        assert!(raw.path().join("b.bmp").exists());
    }

    #[test]
    fn missing_source_is_fatal() {
        let root = TempDir::new().unwrap();

        let result = Pipeline::builder()
            .source(root.path().join("raw_images"))
            .gallery(root.path().join("gallery"))
            .build()
            .run();

        assert!(matches!(result, Err(GalleryError::Scan(_))));
    }

    #[test]
    fn unreadable_entries_keep_their_place_in_name_order() {
        let scan = ScanResult {
            entries: vec![
                EntryKind::NonImage {
                    path: PathBuf::from("/raw/a.txt"),
                },
                EntryKind::Directory {
                    path: PathBuf::from("/raw/c"),
                },
            ],
            errors: vec![ScanError::PermissionDenied {
                path: PathBuf::from("/raw/b.png"),
            }],
        };

        let order: Vec<_> = in_name_order(scan)
            .iter()
            .map(|p| p.path().to_path_buf())
            .collect();

        assert_eq!(
            order,
            vec![
                PathBuf::from("/raw/a.txt"),
                PathBuf::from("/raw/b.png"),
                PathBuf::from("/raw/c"),
            ]
        );
    }

    #[test]
    fn emits_one_progress_event_per_entry() {
        let raw = TempDir::new().unwrap();
        let gallery = TempDir::new().unwrap();
        fs::write(raw.path().join("a.txt"), b"text").unwrap();
        fs::write(raw.path().join("b.webp"), b"w").unwrap();
        fs::create_dir(raw.path().join("c")).unwrap();

        let (sender, receiver) = channel();
        let result = pipeline(&raw, gallery.path())
            .build()
            .run_with_events(&sender)
            .unwrap();
        drop(sender);

        let progress: Vec<_> = receiver
            .iter()
            .filter_map(|e| match e {
                Event::Place(PlaceEvent::Progress(p)) => Some(p),
                _ => None,
            })
            .collect();

        assert_eq!(progress.len(), 3);
        assert_eq!(progress.last().unwrap().completed, 3);
        assert_eq!(result.summary.non_images, 1);
        assert_eq!(result.summary.directories, 1);
        assert_eq!(result.summary.moved, 1);
    }
}
