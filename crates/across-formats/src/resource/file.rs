//! Complete resource archive

use super::entry::{DATA_OFFSET, ResourceEntry, ResourceName};
use crate::codec::{
    EncryptedBlock, FixedSize, Marker, count_u32, read_preallocated, write_preallocated,
};
use crate::error::{FormatError, Result, lift, raise};
use across_crypto::RESOURCE_TABLE;
use binrw::{BinRead, BinResult, BinWrite, Endian, io::Cursor};
use std::io::{Read, Seek, Write};
use tracing::debug;

/// Table slots in every archive
pub const MAX_FILES: usize = 150;

/// Marker after the encrypted table
pub type TableMarker = Marker<0x1490ff>;

const TABLE_BLOCK: EncryptedBlock =
    EncryptedBlock::new(RESOURCE_TABLE, MAX_FILES * ResourceEntry::SIZE);

/// A named file stored in an archive
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceFile {
    /// File name
    pub name: ResourceName,
    /// File content
    pub data: Vec<u8>,
}

/// Decoded resource archive
///
/// ```text
/// u32 file count (<= 150)
/// 3600 encrypted bytes: 150 x (name[16], u32 offset, u32 size)
/// u32 0x1490ff
/// data blob
/// ```
///
/// Files are kept in table order. Building lays the data out contiguously in
/// that order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceArchive {
    /// Stored files
    pub files: Vec<ResourceFile>,
}

impl ResourceArchive {
    /// Parse an archive
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let archive = Self::read_options(&mut cursor, Endian::Little, ())?;

        debug!(
            files = archive.files.len(),
            data_size = data.len().saturating_sub(DATA_OFFSET as usize),
            "parsed resource archive"
        );
        Ok(archive)
    }

    /// Build the archive
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        self.write_options(&mut cursor, Endian::Little, ())?;

        debug!(
            files = self.files.len(),
            size = buffer.len(),
            "built resource archive"
        );
        Ok(buffer)
    }

    /// Verify that parse then build reproduces `data` exactly
    pub fn verify_round_trip(data: &[u8]) -> Result<()> {
        <Self as crate::AcrossFormat>::verify_round_trip(data)
    }

    /// Find a file by name
    pub fn get(&self, name: &str) -> Option<&ResourceFile> {
        self.files
            .iter()
            .find(|f| f.name.as_bytes() == name.as_bytes())
    }

    /// File table for the contiguous layout used by [`build`](Self::build)
    pub fn table(&self) -> Result<Vec<ResourceEntry>> {
        let mut offset = 0u32;
        let mut table = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let size = count_u32("resource size", file.data.len())?;
            table.push(ResourceEntry {
                name: file.name.clone(),
                offset,
                size,
            });
            offset = offset
                .checked_add(size)
                .filter(|end| end.checked_add(DATA_OFFSET).is_some())
                .ok_or_else(|| FormatError::ValueOutOfRange {
                    field: "resource offset",
                    value: i64::from(offset) + i64::from(size),
                })?;
        }
        Ok(table)
    }

    /// Total size of all file data
    pub fn data_size(&self) -> usize {
        self.files.iter().map(|f| f.data.len()).sum()
    }
}

impl BinRead for ResourceArchive {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<Self> {
        let count = u32::read_options(reader, endian, ())? as usize;
        if count > MAX_FILES {
            return raise(
                reader,
                FormatError::LengthMismatch {
                    field: "resource table",
                    expected: MAX_FILES,
                    actual: count,
                },
            );
        }
        let table: Vec<ResourceEntry> = TABLE_BLOCK.read(reader, |inner| {
            read_preallocated(inner, endian, "resource table", count, MAX_FILES)
        })?;
        TableMarker::read_options(reader, endian, ())?;

        let mut blob = Vec::new();
        reader.read_to_end(&mut blob)?;

        let mut files = Vec::with_capacity(table.len());
        for entry in table {
            let range = entry.data_range();
            let Some(data) = blob.get(range.clone()) else {
                return raise(
                    reader,
                    FormatError::LengthMismatch {
                        field: "resource data",
                        expected: blob.len(),
                        actual: range.end,
                    },
                );
            };
            files.push(ResourceFile {
                name: entry.name,
                data: data.to_vec(),
            });
        }
        Ok(Self { files })
    }
}

impl BinWrite for ResourceArchive {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        let table = lift(writer, self.table())?;
        let count = lift(writer, count_u32("resource table", table.len()))?;
        count.write_options(writer, endian, ())?;
        TABLE_BLOCK.write(writer, |inner| {
            write_preallocated(inner, endian, "resource table", &table, MAX_FILES)
        })?;
        TableMarker::default().write_options(writer, endian, ())?;
        for file in &self.files {
            writer.write_all(&file.data)?;
        }
        Ok(())
    }
}

impl crate::AcrossFormat for ResourceArchive {
    fn parse(data: &[u8]) -> Result<Self> {
        Self::parse(data)
    }

    fn build(&self) -> Result<Vec<u8>> {
        self.build()
    }
}
