//! Resource table entries

use crate::codec::{FixedSize, FixedString};
use crate::error::{FormatError, raise};
use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::io::{Read, Seek, Write};

/// Name slot of a table entry
pub type ResourceName = FixedString<16>;

/// Size of the archive header: file count, table and marker
pub const DATA_OFFSET: u32 = 4 + 150 * 24 + 4;

/// One file table entry
///
/// On disk `offset` counts from the start of the archive; here it counts
/// from the start of the data blob.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceEntry {
    /// File name
    pub name: ResourceName,
    /// Offset of the file data within the data blob
    pub offset: u32,
    /// File size in bytes
    pub size: u32,
}

impl FixedSize for ResourceEntry {
    const SIZE: usize = ResourceName::SIZE + 4 + 4;
}

impl ResourceEntry {
    /// Range of the file data within the data blob
    pub fn data_range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.size as usize
    }
}

impl BinRead for ResourceEntry {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<Self> {
        let name = ResourceName::read_options(reader, endian, ())?;
        let stored = u32::read_options(reader, endian, ())?;
        let size = u32::read_options(reader, endian, ())?;
        let Some(offset) = stored.checked_sub(DATA_OFFSET) else {
            return raise(
                reader,
                FormatError::ValueOutOfRange {
                    field: "resource offset",
                    value: i64::from(stored),
                },
            );
        };
        Ok(Self { name, offset, size })
    }
}

impl BinWrite for ResourceEntry {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        let Some(stored) = self.offset.checked_add(DATA_OFFSET) else {
            return raise(
                writer,
                FormatError::ValueOutOfRange {
                    field: "resource offset",
                    value: i64::from(self.offset),
                },
            );
        };
        self.name.write_options(writer, endian, ())?;
        stored.write_options(writer, endian, ())?;
        self.size.write_options(writer, endian, ())
    }
}
