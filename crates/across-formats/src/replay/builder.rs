//! Builder pattern for creating replays

use super::event::{Event, EventKind};
use super::file::Replay;
use super::frame::Frame;
use super::header::ReplayHeader;
use crate::error::Result;

/// Builder for creating replays
///
/// # Example
///
/// ```rust
/// use across_formats::replay::{EventKind, Frame, ReplayBuilder};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let replay = ReplayBuilder::new()
///     .external_level(0x1234)
///     .add_frame(Frame::default())
///     .add_event(0.5, EventKind::Bounce, 0.8)
///     .add_object_taken(1.0, 2)
///     .build()?;
///
/// let bytes = replay.build()?;
/// assert_eq!(&bytes[..4], &1u32.to_le_bytes());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReplayBuilder {
    header: ReplayHeader,
    frames: Vec<Frame>,
    events: Vec<Event>,
}

impl ReplayBuilder {
    /// Empty replay of internal level 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing replay
    pub fn from_replay(replay: &Replay) -> Self {
        Self {
            header: replay.header,
            frames: replay.frames.clone(),
            events: replay.events.clone(),
        }
    }

    /// Record on an external level identified by its link number
    #[must_use]
    pub fn external_level(mut self, link_number: u32) -> Self {
        self.header = ReplayHeader::external(link_number);
        self
    }

    /// Record on an internal level
    #[must_use]
    pub fn internal_level(mut self, internal_num: i32) -> Self {
        self.header = ReplayHeader::internal(internal_num);
        self
    }

    /// Use a legacy header; `internal_num` is in the current numbering
    #[must_use]
    pub fn legacy(mut self, internal_num: u32) -> Self {
        self.header = ReplayHeader::Legacy { internal_num };
        self
    }

    /// Append a frame
    #[must_use]
    pub fn add_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Append frames
    #[must_use]
    pub fn frames(mut self, frames: impl IntoIterator<Item = Frame>) -> Self {
        self.frames.extend(frames);
        self
    }

    /// Append an event that does not refer to an object
    #[must_use]
    pub fn add_event(mut self, time: f64, kind: EventKind, volume: f32) -> Self {
        self.events.push(Event::new(time, kind, volume));
        self
    }

    /// Append an object pickup
    #[must_use]
    pub fn add_object_taken(mut self, time: f64, object: i16) -> Self {
        self.events.push(Event::object_taken(time, object));
        self
    }

    /// Produce the replay
    ///
    /// # Errors
    /// - `IntegrityCheckFailed` for an inconsistent header or event
    /// - `ValueOutOfRange` for a legacy level number with no old equivalent
    pub fn build(self) -> Result<Replay> {
        self.header.validate()?;
        for event in &self.events {
            event.validate()?;
        }
        Ok(Replay {
            header: self.header,
            frames: self.frames,
            events: self.events,
        })
    }
}
