//! Level headers for the `POT06` and `POT14` variants
//!
//! - `POT06`: tag, link number, integrity, 15-byte title, zero padding up to
//!   100 bytes
//! - `POT14`: tag, 2 padding bytes, link number, integrity, 51-byte title,
//!   16-byte LGR name, 10-byte ground and sky texture names

use crate::codec::{FixedSize, FixedString, read_padding, read_tag, write_padding};
use crate::integrity::Integrity;
use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::io::{Read, Seek, Write};

/// Total size of the padded `POT06` header
pub const POT06_HEADER_SIZE: usize = 100;

/// Size of the `POT14` header
pub const POT14_HEADER_SIZE: usize = 5 + 2 + 4 + Integrity::SIZE + 51 + 16 + 10 + 10;

const POT06_PAYLOAD_SIZE: usize = 5 + 4 + Integrity::SIZE + 15;

/// Level format variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelVersion {
    /// Across 1.0/1.1 levels
    Pot06,
    /// Across 1.2+ levels
    Pot14,
}

impl LevelVersion {
    /// Version tag at the start of the file
    pub fn tag(self) -> &'static [u8; 5] {
        match self {
            Self::Pot06 => b"POT06",
            Self::Pot14 => b"POT14",
        }
    }
}

/// `POT06` header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pot06Header {
    /// Identifier shared with replays recorded on this level
    pub link_number: u32,
    /// Integrity fields
    pub integrity: Integrity,
    /// Level title
    pub title: FixedString<15>,
}

/// `POT14` header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pot14Header {
    /// Identifier shared with replays recorded on this level
    pub link_number: u32,
    /// Integrity fields
    pub integrity: Integrity,
    /// Level title
    pub title: FixedString<51>,
    /// Graphics set (LGR) file name
    pub lgr: FixedString<16>,
    /// Ground texture name
    pub ground: FixedString<10>,
    /// Sky texture name
    pub sky: FixedString<10>,
}

/// Version-aware level header
#[derive(Debug, Clone, PartialEq)]
pub enum LevelHeader {
    /// Legacy header
    Pot06(Pot06Header),
    /// Current header
    Pot14(Pot14Header),
}

impl LevelHeader {
    /// Format variant
    pub fn version(&self) -> LevelVersion {
        match self {
            Self::Pot06(_) => LevelVersion::Pot06,
            Self::Pot14(_) => LevelVersion::Pot14,
        }
    }

    /// Link number
    pub fn link_number(&self) -> u32 {
        match self {
            Self::Pot06(h) => h.link_number,
            Self::Pot14(h) => h.link_number,
        }
    }

    /// Stored integrity fields
    pub fn integrity(&self) -> Integrity {
        match self {
            Self::Pot06(h) => h.integrity,
            Self::Pot14(h) => h.integrity,
        }
    }

    /// Replace the integrity fields
    pub fn set_integrity(&mut self, integrity: Integrity) {
        match self {
            Self::Pot06(h) => h.integrity = integrity,
            Self::Pot14(h) => h.integrity = integrity,
        }
    }

    /// Title bytes
    pub fn title(&self) -> &[u8] {
        match self {
            Self::Pot06(h) => h.title.as_bytes(),
            Self::Pot14(h) => h.title.as_bytes(),
        }
    }

    /// Header size in bytes
    pub fn header_size(&self) -> usize {
        match self {
            Self::Pot06(_) => POT06_HEADER_SIZE,
            Self::Pot14(_) => POT14_HEADER_SIZE,
        }
    }

    /// Read the header of the given variant
    pub fn read<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        version: LevelVersion,
    ) -> BinResult<Self> {
        Ok(match version {
            LevelVersion::Pot06 => Self::Pot06(Pot06Header::read_options(reader, endian, ())?),
            LevelVersion::Pot14 => Self::Pot14(Pot14Header::read_options(reader, endian, ())?),
        })
    }
}

impl BinWrite for LevelHeader {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        match self {
            Self::Pot06(h) => h.write_options(writer, endian, ()),
            Self::Pot14(h) => h.write_options(writer, endian, ()),
        }
    }
}

impl BinRead for Pot06Header {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<Self> {
        read_tag(reader, "level version", LevelVersion::Pot06.tag())?;
        let link_number = u32::read_options(reader, endian, ())?;
        let integrity = Integrity::read_options(reader, endian, ())?;
        let title = FixedString::read_options(reader, endian, ())?;
        read_padding(reader, POT06_HEADER_SIZE - POT06_PAYLOAD_SIZE)?;
        Ok(Self {
            link_number,
            integrity,
            title,
        })
    }
}

impl BinWrite for Pot06Header {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        writer.write_all(LevelVersion::Pot06.tag())?;
        self.link_number.write_options(writer, endian, ())?;
        self.integrity.write_options(writer, endian, ())?;
        self.title.write_options(writer, endian, ())?;
        write_padding(writer, POT06_HEADER_SIZE - POT06_PAYLOAD_SIZE)
    }
}

impl BinRead for Pot14Header {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<Self> {
        read_tag(reader, "level version", LevelVersion::Pot14.tag())?;
        read_padding(reader, 2)?;
        Ok(Self {
            link_number: u32::read_options(reader, endian, ())?,
            integrity: Integrity::read_options(reader, endian, ())?,
            title: FixedString::read_options(reader, endian, ())?,
            lgr: FixedString::read_options(reader, endian, ())?,
            ground: FixedString::read_options(reader, endian, ())?,
            sky: FixedString::read_options(reader, endian, ())?,
        })
    }
}

impl BinWrite for Pot14Header {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        writer.write_all(LevelVersion::Pot14.tag())?;
        write_padding(writer, 2)?;
        self.link_number.write_options(writer, endian, ())?;
        self.integrity.write_options(writer, endian, ())?;
        self.title.write_options(writer, endian, ())?;
        self.lgr.write_options(writer, endian, ())?;
        self.ground.write_options(writer, endian, ())?;
        self.sky.write_options(writer, endian, ())
    }
}
