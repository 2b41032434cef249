//! # Pipeline Module
//!
//! Runs the whole workflow over one source directory.
//!
//! ## Stages (per entry)
//! 1. **Scan** - List the source directory and classify entries
//! 2. **Hash** - Fingerprint each image
//! 3. **Place** - Move it to `<fingerprint><ext>` in the gallery, or skip
//!
//! Entries are processed sequentially; each ends in exactly one
//! [`FileOutcome`], and the outcomes are tallied into a [`RunSummary`].

mod executor;
mod outcome;

pub use executor::{
    Pipeline, PipelineBuilder, PipelineConfig, PipelineResult, DEFAULT_GALLERY_DIR,
    DEFAULT_SOURCE_DIR,
};
pub use outcome::{FileOutcome, RunSummary};
