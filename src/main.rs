//! # phash-gallery CLI
//!
//! ## Usage
//! ```bash
//! phash-gallery
//! phash-gallery --source ~/Downloads/memes --gallery ~/Pictures/gallery --dry-run
//! RUST_LOG=phash_gallery=debug phash-gallery --output json
//! ```

mod cli;

use phash_gallery::Result;

fn main() -> Result<()> {
    phash_gallery::init_tracing();
    cli::run()
}
