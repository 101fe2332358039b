//! Level objects: flowers, apples, killers and the start position

use super::header::LevelVersion;
use crate::codec::coded_enum;
use crate::error::{FormatError, raise};
use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::io::{Read, Seek, Write};

coded_enum! {
    /// Object kind
    pub enum ObjectType: u32 as "object type" {
        /// Level exit
        Flower = 1,
        /// Collectible
        Apple = 2,
        /// Touching it fails the run
        Killer = 3,
        /// Bike start position
        Start = 4,
    }
}

coded_enum! {
    /// Gravity change applied when an apple is taken (`POT14` only)
    pub enum Gravity: u32 as "object gravity" {
        /// No change
        Normal = 0,
        /// Gravity points up
        Up = 1,
        /// Gravity points down
        Down = 2,
        /// Gravity points left
        Left = 3,
        /// Gravity points right
        Right = 4,
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::Normal
    }
}

/// Point entity in a level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Object {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
    /// Object kind
    pub kind: ObjectType,
    /// Gravity change (`POT14` only)
    pub gravity: Gravity,
    /// Animation index (`POT14` only)
    pub animation: u32,
}

impl Object {
    /// Object with default gravity and animation
    pub fn new(x: f64, y: f64, kind: ObjectType) -> Self {
        Self {
            x,
            y,
            kind,
            gravity: Gravity::Normal,
            animation: 0,
        }
    }

    /// Encoded size in bytes for `version`
    pub fn encoded_size(version: LevelVersion) -> usize {
        match version {
            LevelVersion::Pot06 => 20,
            LevelVersion::Pot14 => 28,
        }
    }
}

impl BinRead for Object {
    type Args<'a> = LevelVersion;

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        version: Self::Args<'_>,
    ) -> BinResult<Self> {
        let x = f64::read_options(reader, endian, ())?;
        let y = f64::read_options(reader, endian, ())?;
        let kind = ObjectType::read_options(reader, endian, ())?;
        let (gravity, animation) = match version {
            LevelVersion::Pot06 => (Gravity::Normal, 0),
            LevelVersion::Pot14 => (
                Gravity::read_options(reader, endian, ())?,
                u32::read_options(reader, endian, ())?,
            ),
        };
        Ok(Self {
            x,
            y,
            kind,
            gravity,
            animation,
        })
    }
}

impl BinWrite for Object {
    type Args<'a> = LevelVersion;

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        version: Self::Args<'_>,
    ) -> BinResult<()> {
        self.x.write_options(writer, endian, ())?;
        self.y.write_options(writer, endian, ())?;
        self.kind.write_options(writer, endian, ())?;
        match version {
            LevelVersion::Pot06 => {
                if self.gravity != Gravity::Normal {
                    return raise(
                        writer,
                        FormatError::ValueOutOfRange {
                            field: "object gravity",
                            value: i64::from(self.gravity.code()),
                        },
                    );
                }
                if self.animation != 0 {
                    return raise(
                        writer,
                        FormatError::ValueOutOfRange {
                            field: "object animation",
                            value: i64::from(self.animation),
                        },
                    );
                }
                Ok(())
            }
            LevelVersion::Pot14 => {
                self.gravity.write_options(writer, endian, ())?;
                self.animation.write_options(writer, endian, ())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::BinWriterExt;
    use std::io::Cursor;

    #[test]
    fn test_object_type_codes() {
        assert_eq!(ObjectType::Flower.code(), 1);
        assert_eq!(ObjectType::Start.code(), 4);
        assert_eq!(ObjectType::from_code(3), Some(ObjectType::Killer));
        assert_eq!(ObjectType::from_code(0), None);
        assert_eq!(Gravity::from_code(4), Some(Gravity::Right));
        assert_eq!(Gravity::from_code(5), None);
    }

    #[test]
    fn test_pot14_object_round_trip() {
        let object = Object {
            x: -3.5,
            y: 12.25,
            kind: ObjectType::Apple,
            gravity: Gravity::Up,
            animation: 7,
        };
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_le_args(&object, LevelVersion::Pot14).unwrap();
        let bytes = cursor.into_inner();
        assert_eq!(bytes.len(), Object::encoded_size(LevelVersion::Pot14));
        assert_eq!(&bytes[16..20], &2u32.to_le_bytes());
        assert_eq!(&bytes[20..24], &1u32.to_le_bytes());
        assert_eq!(&bytes[24..28], &7u32.to_le_bytes());

        let parsed =
            Object::read_options(&mut Cursor::new(bytes), Endian::Little, LevelVersion::Pot14)
                .unwrap();
        assert_eq!(parsed, object);
    }

    #[test]
    fn test_unknown_object_type() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0.0f64.to_le_bytes());
        bytes.extend_from_slice(&0.0f64.to_le_bytes());
        bytes.extend_from_slice(&9u32.to_le_bytes());
        let err =
            Object::read_options(&mut Cursor::new(bytes), Endian::Little, LevelVersion::Pot06)
                .unwrap_err();
        assert!(matches!(
            FormatError::from(err),
            FormatError::ValueOutOfRange {
                field: "object type",
                value: 9
            }
        ));
    }

    #[test]
    fn test_pot06_rejects_pot14_fields() {
        let mut object = Object::new(0.0, 0.0, ObjectType::Apple);
        object.gravity = Gravity::Down;
        let err = Cursor::new(Vec::new())
            .write_le_args(&object, LevelVersion::Pot06)
            .unwrap_err();
        assert!(matches!(
            FormatError::from(err),
            FormatError::ValueOutOfRange {
                field: "object gravity",
                ..
            }
        ));
    }
}
