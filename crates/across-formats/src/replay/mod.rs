//! Replay (`.rec`) files
//!
//! A replay records the bike state once per frame plus a list of events.
//! Frame data is stored column by column and exposed row by row through the
//! [`Slicing`](crate::codec::Slicing) adapter. Two header variants exist:
//! the current one (version `120`) and the legacy 1.0/1.1 one, whose
//! internal level numbers are remapped to the current numbering.
//!
//! # Example
//!
//! ```rust,no_run
//! use across_formats::replay::Replay;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("00unnamed.rec")?;
//! let replay = Replay::parse(&data)?;
//!
//! println!("version {}, {} frames", replay.header.version(), replay.frames.len());
//! if let Some(duration) = replay.duration() {
//!     println!("last event at {duration:.2}");
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod event;
mod file;
mod frame;
mod header;

pub use builder::ReplayBuilder;
pub use event::{Event, EventKind};
pub use file::{EndMarker, Replay};
pub use frame::{Direction, FRAME_COLUMNS, FRAME_SIZE, Frame, FrameColumns};
pub use header::{
    CURRENT_LEVELS, CURRENT_VERSION, LEGACY_LEVELS, LEGACY_VERSION, LEVEL_REMAP, LegacyLevelRemap,
    ReplayHeader,
};
