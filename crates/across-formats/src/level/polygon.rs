//! Polygons: closed vertex chains forming the track boundary

use super::header::LevelVersion;
use crate::codec::{count_u32, read_array, write_array};
use crate::error::{FormatError, lift, raise};
use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::io::{Read, Seek, Write};

/// 2D point with double precision coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, BinRead, BinWrite)]
pub struct Vertex {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Vertex {
    /// Create a vertex
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ordered vertex chain
///
/// `grass` only exists in `POT14` levels; `POT06` levels always carry zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    /// Non-zero for grass polygons
    pub grass: u32,
    /// Vertices in drawing order
    pub vertices: Vec<Vertex>,
}

impl Polygon {
    /// Plain (non-grass) polygon
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { grass: 0, vertices }
    }

    /// Encoded size in bytes for `version`
    pub fn encoded_size(&self, version: LevelVersion) -> usize {
        let grass = match version {
            LevelVersion::Pot06 => 0,
            LevelVersion::Pot14 => 4,
        };
        grass + 4 + self.vertices.len() * 16
    }
}

impl BinRead for Polygon {
    type Args<'a> = LevelVersion;

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        version: Self::Args<'_>,
    ) -> BinResult<Self> {
        let grass = match version {
            LevelVersion::Pot06 => 0,
            LevelVersion::Pot14 => u32::read_options(reader, endian, ())?,
        };
        let count = u32::read_options(reader, endian, ())?;
        let vertices = read_array(reader, endian, count as usize)?;
        Ok(Self { grass, vertices })
    }
}

impl BinWrite for Polygon {
    type Args<'a> = LevelVersion;

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        version: Self::Args<'_>,
    ) -> BinResult<()> {
        match version {
            LevelVersion::Pot06 if self.grass != 0 => {
                return raise(
                    writer,
                    FormatError::ValueOutOfRange {
                        field: "polygon grass",
                        value: i64::from(self.grass),
                    },
                );
            }
            LevelVersion::Pot06 => {}
            LevelVersion::Pot14 => self.grass.write_options(writer, endian, ())?,
        }
        let count = lift(writer, count_u32("polygon vertices", self.vertices.len()))?;
        count.write_options(writer, endian, ())?;
        write_array(writer, endian, &self.vertices)
    }
}
