//! # Events Module
//!
//! Progress reporting for front ends.
//!
//! The pipeline emits one event per processed entry through a channel,
//! so the CLI (or anything else) can render progress while the pipeline
//! stays free of console code.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = events::channel();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Place(PlaceEvent::Progress(p)) = event {
//!             println!("{}/{}: {:?}", p.completed, p.total, p.outcome);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{channel, null_sender, EventReceiver, EventSender};
pub use types::*;
