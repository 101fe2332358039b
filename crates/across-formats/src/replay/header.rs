//! Replay headers and the legacy level number remap
//!
//! Current replays store `120`, the link number of the level and the
//! internal level number (or `-1` for external levels). Legacy (1.0/1.1)
//! replays store only the internal level number in the old `0..24`
//! numbering; version `100` and link number `0` are implied.

use crate::codec::Adapter;
use crate::error::{FormatError, Result, lift, raise};
use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::io::{Read, Seek, Write};

/// Version stored in current headers
pub const CURRENT_VERSION: u32 = 120;

/// Version implied by legacy headers
pub const LEGACY_VERSION: u32 = 100;

/// Number of internal levels in the legacy numbering
pub const LEGACY_LEVELS: u32 = 24;

/// Upper bound (exclusive) of current internal level numbers
pub const CURRENT_LEVELS: i32 = 100;

/// Old to new internal level numbers; unlisted values are unchanged
pub const LEVEL_REMAP: [(u32, u32); 13] = [
    (11, 81),
    (12, 11),
    (13, 82),
    (14, 84),
    (15, 17),
    (16, 83),
    (17, 18),
    (18, 19),
    (19, 20),
    (20, 21),
    (21, 22),
    (22, 80),
    (23, 38),
];

/// Converts internal level numbers between the legacy and current numbering
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyLevelRemap;

impl Adapter for LegacyLevelRemap {
    type Stored = u32;
    type Exposed = u32;

    fn forward(&self, old: u32) -> Result<u32> {
        if old >= LEGACY_LEVELS {
            return Err(FormatError::ValueOutOfRange {
                field: "legacy internal level",
                value: i64::from(old),
            });
        }
        Ok(LEVEL_REMAP
            .iter()
            .find(|&&(from, _)| from == old)
            .map_or(old, |&(_, to)| to))
    }

    fn backward(&self, new: &u32) -> Result<u32> {
        if let Some(&(from, _)) = LEVEL_REMAP.iter().find(|&&(_, to)| to == *new) {
            return Ok(from);
        }
        if *new >= LEGACY_LEVELS {
            return Err(FormatError::ValueOutOfRange {
                field: "legacy internal level",
                value: i64::from(*new),
            });
        }
        Ok(*new)
    }
}

/// Replay header variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayHeader {
    /// Across 1.2+ header
    Current {
        /// Link number of the level the replay was recorded on
        link_number: u32,
        /// Internal level number, or `-1` for external levels
        internal_num: i32,
    },
    /// Across 1.0/1.1 header
    Legacy {
        /// Internal level number in the current numbering
        internal_num: u32,
    },
}

impl Default for ReplayHeader {
    fn default() -> Self {
        Self::Current {
            link_number: 0,
            internal_num: 0,
        }
    }
}

impl ReplayHeader {
    /// Header for a replay of an external level
    pub fn external(link_number: u32) -> Self {
        Self::Current {
            link_number,
            internal_num: -1,
        }
    }

    /// Header for a replay of an internal level
    pub fn internal(internal_num: i32) -> Self {
        Self::Current {
            link_number: 0,
            internal_num,
        }
    }

    /// Format version (`120`, or `100` for legacy headers)
    pub fn version(&self) -> u32 {
        match self {
            Self::Current { .. } => CURRENT_VERSION,
            Self::Legacy { .. } => LEGACY_VERSION,
        }
    }

    /// Link number (always `0` for legacy headers)
    pub fn link_number(&self) -> u32 {
        match self {
            Self::Current { link_number, .. } => *link_number,
            Self::Legacy { .. } => 0,
        }
    }

    /// Internal level number in the current numbering
    pub fn internal_num(&self) -> i64 {
        match self {
            Self::Current { internal_num, .. } => i64::from(*internal_num),
            Self::Legacy { internal_num } => i64::from(*internal_num),
        }
    }

    /// Whether this is a legacy header
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy { .. })
    }

    /// Encoded size in bytes
    pub fn encoded_size(&self) -> usize {
        match self {
            Self::Current { .. } => 12,
            Self::Legacy { .. } => 4,
        }
    }

    /// Check the link/internal number combination of a current header.
    ///
    /// External levels (`link_number > 0`) must use `-1`, internal levels a
    /// number in `0..100`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Current {
                link_number,
                internal_num,
            } => {
                let valid = if link_number > 0 {
                    internal_num == -1
                } else {
                    (0..CURRENT_LEVELS).contains(&internal_num)
                };
                if valid {
                    Ok(())
                } else {
                    Err(FormatError::IntegrityCheckFailed(format!(
                        "replay header with link number {link_number} has internal level {internal_num}"
                    )))
                }
            }
            Self::Legacy { internal_num } => LegacyLevelRemap.backward(&internal_num).map(|_| ()),
        }
    }

    /// Read a current header
    pub fn read_current<R: Read + Seek>(reader: &mut R, endian: Endian) -> BinResult<Self> {
        let version = u32::read_options(reader, endian, ())?;
        if version != CURRENT_VERSION {
            return raise(
                reader,
                FormatError::ConstMismatch {
                    field: "replay version",
                    expected: CURRENT_VERSION.to_string(),
                    found: version.to_string(),
                },
            );
        }
        let header = Self::Current {
            link_number: u32::read_options(reader, endian, ())?,
            internal_num: i32::read_options(reader, endian, ())?,
        };
        lift(reader, header.validate())?;
        Ok(header)
    }

    /// Read a legacy header, remapping the internal level number
    pub fn read_legacy<R: Read + Seek>(reader: &mut R, endian: Endian) -> BinResult<Self> {
        let old = u32::read_options(reader, endian, ())?;
        let internal_num = lift(reader, LegacyLevelRemap.forward(old))?;
        Ok(Self::Legacy { internal_num })
    }
}

impl BinWrite for ReplayHeader {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        if let Err(e) = self.validate() {
            return raise(writer, e);
        }
        match *self {
            Self::Current {
                link_number,
                internal_num,
            } => {
                CURRENT_VERSION.write_options(writer, endian, ())?;
                link_number.write_options(writer, endian, ())?;
                internal_num.write_options(writer, endian, ())
            }
            Self::Legacy { internal_num } => {
                let old = lift(writer, LegacyLevelRemap.backward(&internal_num))?;
                old.write_options(writer, endian, ())
            }
        }
    }
}
