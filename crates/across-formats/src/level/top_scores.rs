//! Encrypted best-times block trailing a `POT14` level
//!
//! ```text
//! u32 0x67103a
//! 688 encrypted bytes:
//!   single-player table, multiplayer table; each:
//!     u32 count, i32 times[10], name[15] x 10, name[15] x 10
//! u32 0x845d52
//! ```
//!
//! Times, first names and second names are stored as three parallel columns
//! and exposed as one [`TopScore`] row per entry.

use crate::codec::{
    Adapter, EncryptedBlock, FixedSize, FixedString, Marker, Sliced, Slicing, count_u32,
    read_preallocated, write_preallocated,
};
use crate::error::{FormatError, lift, raise};
use across_crypto::LEVEL_TOP_SCORES;
use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::io::{Read, Seek, Write};

/// Entries reserved per table
pub const TABLE_CAPACITY: usize = 10;

/// Encoded size of one table
pub const TABLE_SIZE: usize = 4 + TABLE_CAPACITY * (i32::SIZE + 2 * PlayerName::SIZE);

/// Size of the encrypted region (both tables)
pub const BLOCK_SIZE: usize = 2 * TABLE_SIZE;

/// Marker in front of the encrypted region
pub type StartMarker = Marker<0x67103a>;

/// Marker after the encrypted region
pub type EndMarker = Marker<0x845d52>;

/// Nickname slot
pub type PlayerName = FixedString<15>;

const BLOCK: EncryptedBlock = EncryptedBlock::new(LEVEL_TOP_SCORES, BLOCK_SIZE);

/// One leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopScore {
    /// Time in hundredths of a second
    pub time: i32,
    /// First player
    pub player_a: PlayerName,
    /// Second player (multiplayer) or a repeat of the first
    pub player_b: PlayerName,
}

/// Column storage of a table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopScoreColumns {
    /// Times
    pub times: Vec<i32>,
    /// First names
    pub players_a: Vec<PlayerName>,
    /// Second names
    pub players_b: Vec<PlayerName>,
}

impl Sliced for TopScore {
    type Columns = TopScoreColumns;

    fn column_lengths(columns: &TopScoreColumns) -> Vec<(&'static str, usize)> {
        vec![
            ("times", columns.times.len()),
            ("players_a", columns.players_a.len()),
            ("players_b", columns.players_b.len()),
        ]
    }

    fn empty_columns(rows: usize) -> TopScoreColumns {
        TopScoreColumns {
            times: Vec::with_capacity(rows),
            players_a: Vec::with_capacity(rows),
            players_b: Vec::with_capacity(rows),
        }
    }

    fn row(columns: &TopScoreColumns, index: usize) -> Self {
        Self {
            time: columns.times[index],
            player_a: columns.players_a[index].clone(),
            player_b: columns.players_b[index].clone(),
        }
    }

    fn push_row(&self, columns: &mut TopScoreColumns) {
        columns.times.push(self.time);
        columns.players_a.push(self.player_a.clone());
        columns.players_b.push(self.player_b.clone());
    }
}

/// Single-player and multiplayer leaderboards
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopScores {
    /// Single-player entries, best first
    pub single: Vec<TopScore>,
    /// Multiplayer entries, best first
    pub multi: Vec<TopScore>,
}

fn read_table<R: Read + Seek>(reader: &mut R, endian: Endian) -> BinResult<Vec<TopScore>> {
    let count = u32::read_options(reader, endian, ())? as usize;
    let columns = TopScoreColumns {
        times: read_preallocated(reader, endian, "top score times", count, TABLE_CAPACITY)?,
        players_a: read_preallocated(reader, endian, "top score names", count, TABLE_CAPACITY)?,
        players_b: read_preallocated(reader, endian, "top score names", count, TABLE_CAPACITY)?,
    };
    lift(reader, Slicing::<TopScore>::new().forward(columns))
}

fn write_table<W: Write + Seek>(
    writer: &mut W,
    endian: Endian,
    rows: &Vec<TopScore>,
) -> BinResult<()> {
    if rows.len() > TABLE_CAPACITY {
        return raise(
            writer,
            FormatError::LengthMismatch {
                field: "top scores",
                expected: TABLE_CAPACITY,
                actual: rows.len(),
            },
        );
    }
    let columns = lift(writer, Slicing::<TopScore>::new().backward(rows))?;
    let count = lift(writer, count_u32("top scores", rows.len()))?;
    count.write_options(writer, endian, ())?;
    write_preallocated(
        writer,
        endian,
        "top score times",
        &columns.times,
        TABLE_CAPACITY,
    )?;
    write_preallocated(
        writer,
        endian,
        "top score names",
        &columns.players_a,
        TABLE_CAPACITY,
    )?;
    write_preallocated(
        writer,
        endian,
        "top score names",
        &columns.players_b,
        TABLE_CAPACITY,
    )
}

impl BinRead for TopScores {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<Self> {
        StartMarker::read_options(reader, endian, ())?;
        let scores = BLOCK.read(reader, |inner| {
            Ok(Self {
                single: read_table(inner, endian)?,
                multi: read_table(inner, endian)?,
            })
        })?;
        EndMarker::read_options(reader, endian, ())?;
        Ok(scores)
    }
}

impl BinWrite for TopScores {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        StartMarker::default().write_options(writer, endian, ())?;
        BLOCK.write(writer, |inner| {
            write_table(inner, endian, &self.single)?;
            write_table(inner, endian, &self.multi)
        })?;
        EndMarker::default().write_options(writer, endian, ())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use across_crypto::XorStreamCipher;
    use binrw::{BinReaderExt, BinWriterExt};
    use std::io::Cursor;

    fn score(time: i32, a: &str, b: &str) -> TopScore {
        TopScore {
            time,
            player_a: PlayerName::try_from(a).unwrap(),
            player_b: PlayerName::try_from(b).unwrap(),
        }
    }

    fn sample() -> TopScores {
        TopScores {
            single: vec![score(1234, "alice", "alice"), score(1500, "bob", "bob")],
            multi: vec![score(2100, "alice", "bob")],
        }
    }

    #[test]
    fn test_block_size() {
        assert_eq!(TABLE_SIZE, 344);
        assert_eq!(BLOCK_SIZE, 688);
    }

    #[test]
    fn test_layout_and_decryption() {
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_le(&sample()).unwrap();
        let bytes = cursor.into_inner();

        assert_eq!(bytes.len(), 4 + BLOCK_SIZE + 4);
        assert_eq!(&bytes[..4], &0x67103au32.to_le_bytes());
        assert_eq!(&bytes[4 + BLOCK_SIZE..], &0x845d52u32.to_le_bytes());

        let plain = XorStreamCipher::new(LEVEL_TOP_SCORES).decrypt(&bytes[4..4 + BLOCK_SIZE]);
        assert_eq!(&plain[..4], &2u32.to_le_bytes());
        assert_eq!(&plain[4..8], &1234i32.to_le_bytes());
        assert_eq!(&plain[8..12], &1500i32.to_le_bytes());
        assert!(plain[12..44].iter().all(|&b| b == 0));
        assert_eq!(&plain[44..49], b"alice");
        assert_eq!(&plain[59..62], b"bob");
        assert_eq!(&plain[TABLE_SIZE..TABLE_SIZE + 4], &1u32.to_le_bytes());

        let parsed: TopScores = Cursor::new(bytes).read_le().unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_empty_tables() {
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_le(&TopScores::default()).unwrap();
        let parsed: TopScores = Cursor::new(cursor.into_inner()).read_le().unwrap();
        assert_eq!(parsed, TopScores::default());
    }

    #[test]
    fn test_table_over_capacity() {
        let scores = TopScores {
            single: vec![score(1, "a", "a"); 11],
            multi: Vec::new(),
        };
        let err = Cursor::new(Vec::new()).write_le(&scores).unwrap_err();
        assert!(matches!(
            FormatError::from(err),
            FormatError::LengthMismatch {
                field: "top scores",
                expected: 10,
                actual: 11
            }
        ));
    }

    #[test]
    fn test_count_over_capacity_on_read() {
        let mut plain = vec![0u8; BLOCK_SIZE];
        plain[..4].copy_from_slice(&11u32.to_le_bytes());
        let mut bytes = 0x67103au32.to_le_bytes().to_vec();
        bytes.extend(XorStreamCipher::new(LEVEL_TOP_SCORES).encrypt(&plain));
        bytes.extend_from_slice(&0x845d52u32.to_le_bytes());

        let err = Cursor::new(bytes).read_le::<TopScores>().unwrap_err();
        assert!(matches!(FormatError::from(err), FormatError::LengthMismatch { .. }));
    }
}
