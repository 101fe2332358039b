//! Complete replay file

use super::event::Event;
use super::frame::{Frame, FrameColumns};
use super::header::ReplayHeader;
use crate::codec::{
    Adapter, CountContext, Marker, Selector, Slicing, count_u32, read_u32_prefixed,
    write_u32_prefixed,
};
use crate::error::{Result, lift};
use crate::options::FormatOptions;
use binrw::{BinRead, BinResult, BinWrite, Endian, io::Cursor};
use std::io::{Read, Seek, Write};
use tracing::debug;

/// Marker closing every replay
pub type EndMarker = Marker<0x492f75>;

/// Decoded replay
///
/// ```text
/// u32 frame count
/// header (current: u32 120, u32 link, i32 internal; legacy: u32 internal)
/// 14 frame columns
/// u32 event count, events
/// u32 0x492f75
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Replay {
    /// Header variant
    pub header: ReplayHeader,
    /// Frames in recording order
    pub frames: Vec<Frame>,
    /// Events in recording order
    pub events: Vec<Event>,
}

impl Replay {
    /// Parse a replay with default options
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with(data, &FormatOptions::default())
    }

    /// Parse a replay.
    ///
    /// The current header is tried first, then the legacy header when
    /// `options.legacy_replays` is set.
    pub fn parse_with(data: &[u8], options: &FormatOptions) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let replay = Self::read_options(&mut cursor, Endian::Little, options)?;

        debug!(
            version = replay.header.version(),
            frames = replay.frames.len(),
            events = replay.events.len(),
            trailing = data.len() - cursor.position() as usize,
            "parsed replay"
        );
        Ok(replay)
    }

    /// Build the replay
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        self.write_options(&mut cursor, Endian::Little, ())?;

        debug!(
            version = self.header.version(),
            size = buffer.len(),
            frames = self.frames.len(),
            events = self.events.len(),
            "built replay"
        );
        Ok(buffer)
    }

    /// Verify that parse then build reproduces `data` exactly
    pub fn verify_round_trip(data: &[u8]) -> Result<()> {
        <Self as crate::AcrossFormat>::verify_round_trip(data)
    }

    /// Duration in seconds, taken from the last event
    pub fn duration(&self) -> Option<f64> {
        self.events.last().map(|e| e.time)
    }
}

impl BinRead for Replay {
    type Args<'a> = &'a FormatOptions;

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        options: Self::Args<'_>,
    ) -> BinResult<Self> {
        let frame_count = u32::read_options(reader, endian, ())? as usize;

        let mut selector = Selector::new("replay header")
            .variant("current", |r: &mut R| ReplayHeader::read_current(r, endian));
        if options.legacy_replays {
            selector =
                selector.variant("legacy", |r: &mut R| ReplayHeader::read_legacy(r, endian));
        }
        let header = selector.decode(reader)?;

        let columns = FrameColumns::read_options(reader, endian, CountContext::new(frame_count))?;
        let frames = lift(reader, Slicing::<Frame>::new().forward(columns))?;
        let events = read_u32_prefixed(reader, endian)?;
        EndMarker::read_options(reader, endian, ())?;

        Ok(Self {
            header,
            frames,
            events,
        })
    }
}

impl BinWrite for Replay {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        let frame_count = lift(writer, count_u32("frames", self.frames.len()))?;
        frame_count.write_options(writer, endian, ())?;
        self.header.write_options(writer, endian, ())?;

        let columns = lift(writer, Slicing::<Frame>::new().backward(&self.frames))?;
        columns.write_options(writer, endian, ())?;
        write_u32_prefixed(writer, endian, "events", &self.events)?;
        EndMarker::default().write_options(writer, endian, ())
    }
}

impl crate::AcrossFormat for Replay {
    fn parse(data: &[u8]) -> Result<Self> {
        Self::parse(data)
    }

    fn build(&self) -> Result<Vec<u8>> {
        self.build()
    }
}
