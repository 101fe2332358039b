//! Replay events
//!
//! Each event is 16 bytes: `f64` time, `i16` object index, `u8` event type,
//! one padding byte and an `f32` volume.

use crate::codec::{FixedSize, coded_enum, read_padding, write_padding};
use crate::error::{FormatError, Result, lift};
use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::io::{Read, Seek, Write};

coded_enum! {
    /// What happened
    pub enum EventKind: u8 as "event type" {
        /// An object was touched; `object` holds its index
        ObjectTaken = 0,
        /// A wheel bounced
        Bounce = 1,
        /// The run failed
        Failure = 2,
        /// The run was completed
        Success = 3,
        /// An apple was eaten
        Apple = 4,
        /// The bike turned around
        ChangeDirection = 5,
        /// Right volt
        RightVolt = 6,
        /// Left volt
        LeftVolt = 7,
    }
}

/// Timestamped in-replay occurrence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Time of the event
    pub time: f64,
    /// Object index for [`EventKind::ObjectTaken`], `-1` otherwise
    pub object: i16,
    /// Event type
    pub kind: EventKind,
    /// Sound volume
    pub volume: f32,
}

impl FixedSize for Event {
    const SIZE: usize = 16;
}

impl Event {
    /// Event that does not refer to an object
    pub fn new(time: f64, kind: EventKind, volume: f32) -> Self {
        Self {
            time,
            object: -1,
            kind,
            volume,
        }
    }

    /// Object pickup event
    pub fn object_taken(time: f64, object: i16) -> Self {
        Self {
            time,
            object,
            kind: EventKind::ObjectTaken,
            volume: 0.0,
        }
    }

    /// Check the object index against the event type
    pub fn validate(&self) -> Result<()> {
        let valid = match self.kind {
            EventKind::ObjectTaken => self.object >= 0,
            _ => self.object == -1,
        };
        if valid {
            Ok(())
        } else {
            Err(FormatError::IntegrityCheckFailed(format!(
                "{:?} event at {} refers to object {}",
                self.kind, self.time, self.object
            )))
        }
    }
}

impl BinRead for Event {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<Self> {
        let time = f64::read_options(reader, endian, ())?;
        let object = i16::read_options(reader, endian, ())?;
        let kind = EventKind::read_options(reader, endian, ())?;
        read_padding(reader, 1)?;
        let volume = f32::read_options(reader, endian, ())?;

        let event = Self {
            time,
            object,
            kind,
            volume,
        };
        lift(reader, event.validate())?;
        Ok(event)
    }
}

impl BinWrite for Event {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        lift(writer, self.validate())?;
        self.time.write_options(writer, endian, ())?;
        self.object.write_options(writer, endian, ())?;
        self.kind.write_options(writer, endian, ())?;
        write_padding(writer, 1)?;
        self.volume.write_options(writer, endian, ())
    }
}
