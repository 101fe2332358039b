//! Complete level file: header, polygons, objects, pictures and top scores

use super::header::{LevelHeader, LevelVersion, Pot14Header};
use super::object::Object;
use super::picture::Picture;
use super::polygon::Polygon;
use super::top_scores::TopScores;
use crate::codec::{Adapter, BiasedArray, BiasedCount, InlineArray, Selector, optional_tail};
use crate::error::{FormatError, Result, lift, raise};
use crate::integrity;
use crate::options::FormatOptions;
use binrw::{BinRead, BinResult, BinWrite, Endian, io::Cursor};
use std::io::{Read, Seek, Write};
use tracing::debug;

/// Decoded level
///
/// `POT06` levels have no pictures and no top scores; building one with
/// either present fails with `ValueOutOfRange`.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// Version-specific header
    pub header: LevelHeader,
    /// Track polygons
    pub polygons: Vec<Polygon>,
    /// Objects
    pub objects: Vec<Object>,
    /// Pictures (`POT14` only)
    pub pictures: Vec<Picture>,
    /// Encrypted leaderboard (`POT14` only)
    pub top_scores: Option<TopScores>,
}

impl Default for Level {
    fn default() -> Self {
        Self::new(LevelHeader::Pot14(Pot14Header::default()))
    }
}

impl Level {
    /// Empty level with the given header
    pub fn new(header: LevelHeader) -> Self {
        Self {
            header,
            polygons: Vec::new(),
            objects: Vec::new(),
            pictures: Vec::new(),
            top_scores: None,
        }
    }

    /// Format variant
    pub fn version(&self) -> LevelVersion {
        self.header.version()
    }

    /// Parse a level with default options
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with(data, &FormatOptions::default())
    }

    /// Parse a level.
    ///
    /// `POT14` is tried first, then `POT06` when `options.legacy_levels` is
    /// set. The integrity fields are validated after a variant has been
    /// selected, so a bad hash never causes a fallback to the other variant.
    pub fn parse_with(data: &[u8], options: &FormatOptions) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let level = Self::read_options(&mut cursor, Endian::Little, options)?;

        let consumed = cursor.position() as usize;
        debug!(
            version = ?level.version(),
            polygons = level.polygons.len(),
            objects = level.objects.len(),
            pictures = level.pictures.len(),
            top_scores = level.top_scores.is_some(),
            trailing = data.len() - consumed,
            "parsed level"
        );
        Ok(level)
    }

    /// Build with default options and thread-local randomness
    pub fn build(&self) -> Result<Vec<u8>> {
        self.build_with(&FormatOptions::default())
    }

    /// Build with thread-local randomness for regenerated companions
    pub fn build_with(&self, options: &FormatOptions) -> Result<Vec<u8>> {
        self.build_with_rng(options, &mut rand::rng())
    }

    /// Build the level.
    ///
    /// `integrity_1` is recomputed from the geometry; the companion fields
    /// follow `options.integrity`, drawing from `rng` when new values are
    /// needed.
    pub fn build_with_rng<G: rand::Rng + ?Sized>(
        &self,
        options: &FormatOptions,
        rng: &mut G,
    ) -> Result<Vec<u8>> {
        let mut level = self.clone();
        let hash = integrity::level_hash(&level);
        let refreshed = level
            .header
            .integrity()
            .refresh(hash, options.integrity, rng);
        level.header.set_integrity(refreshed);

        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        level.write_options(&mut cursor, Endian::Little, ())?;

        debug!(
            version = ?level.version(),
            size = buffer.len(),
            polygons = level.polygons.len(),
            objects = level.objects.len(),
            "built level"
        );
        Ok(buffer)
    }

    /// Whether the stored integrity fields match the level content
    pub fn has_valid_integrity(&self) -> bool {
        integrity::level_integrity(self)
    }

    /// Verify that parse then build reproduces `data` exactly
    pub fn verify_round_trip(data: &[u8]) -> Result<()> {
        <Self as crate::AcrossFormat>::verify_round_trip(data)
    }

    fn read_body<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        version: LevelVersion,
    ) -> BinResult<Self> {
        let header = LevelHeader::read(reader, endian, version)?;

        let polygons = BiasedArray::read_with(reader, endian, BiasedCount::POLYGONS, |r| {
            Polygon::read_options(r, endian, version)
        })?;
        let polygons = lift(
            reader,
            InlineArray::new(BiasedCount::POLYGONS).forward(polygons),
        )?;

        let objects = BiasedArray::read_with(reader, endian, BiasedCount::OBJECTS, |r| {
            Object::read_options(r, endian, version)
        })?;
        let objects = lift(
            reader,
            InlineArray::new(BiasedCount::OBJECTS).forward(objects),
        )?;

        let pictures = match version {
            LevelVersion::Pot06 => Vec::new(),
            LevelVersion::Pot14 => {
                let pictures = BiasedArray::read_options(reader, endian, BiasedCount::PICTURES)?;
                lift(
                    reader,
                    InlineArray::new(BiasedCount::PICTURES).forward(pictures),
                )?
            }
        };

        Ok(Self {
            header,
            polygons,
            objects,
            pictures,
            top_scores: None,
        })
    }
}

impl BinRead for Level {
    type Args<'a> = &'a FormatOptions;

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        options: Self::Args<'_>,
    ) -> BinResult<Self> {
        let mut selector = Selector::new("level")
            .variant("POT14", |r: &mut R| Self::read_body(r, endian, LevelVersion::Pot14));
        if options.legacy_levels {
            selector = selector
                .variant("POT06", |r: &mut R| Self::read_body(r, endian, LevelVersion::Pot06));
        }
        let mut level = selector.decode(reader)?;

        lift(reader, integrity::validate(&level))?;

        if level.version() == LevelVersion::Pot14 {
            level.top_scores = optional_tail(reader, "top scores", |r| {
                TopScores::read_options(r, endian, ())
            })?;
        }
        Ok(level)
    }
}

impl BinWrite for Level {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        let version = self.version();
        if version == LevelVersion::Pot06 {
            if !self.pictures.is_empty() {
                return raise(
                    writer,
                    FormatError::ValueOutOfRange {
                        field: "POT06 pictures",
                        value: self.pictures.len() as i64,
                    },
                );
            }
            if self.top_scores.is_some() {
                return raise(
                    writer,
                    FormatError::ValueOutOfRange {
                        field: "POT06 top scores",
                        value: 1,
                    },
                );
            }
        }

        self.header.write_options(writer, endian, ())?;

        let polygons = lift(
            writer,
            InlineArray::new(BiasedCount::POLYGONS).backward(&self.polygons),
        )?;
        polygons.write_with(writer, endian, |polygon, w| {
            polygon.write_options(w, endian, version)
        })?;

        let objects = lift(
            writer,
            InlineArray::new(BiasedCount::OBJECTS).backward(&self.objects),
        )?;
        objects.write_with(writer, endian, |object, w| {
            object.write_options(w, endian, version)
        })?;

        if version == LevelVersion::Pot14 {
            let pictures = lift(
                writer,
                InlineArray::new(BiasedCount::PICTURES).backward(&self.pictures),
            )?;
            pictures.write_options(writer, endian, ())?;
        }

        if let Some(top_scores) = &self.top_scores {
            top_scores.write_options(writer, endian, ())?;
        }
        Ok(())
    }
}

impl crate::AcrossFormat for Level {
    fn parse(data: &[u8]) -> Result<Self> {
        Self::parse(data)
    }

    fn build(&self) -> Result<Vec<u8>> {
        self.build()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::codec::FixedString;
    use crate::integrity::Integrity;
    use crate::level::{Clipping, Gravity, ObjectType, Pot06Header, TopScore, Vertex};
    use crate::options::IntegrityPolicy;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample_pot14() -> Level {
        let mut level = Level::new(LevelHeader::Pot14(Pot14Header {
            link_number: 123_456,
            title: FixedString::try_from("Test Track").unwrap(),
            lgr: FixedString::try_from("default").unwrap(),
            ground: FixedString::try_from("ground").unwrap(),
            sky: FixedString::try_from("sky").unwrap(),
            ..Pot14Header::default()
        }));
        level.polygons.push(Polygon::new(vec![
            Vertex::new(-10.0, -5.0),
            Vertex::new(10.0, -5.0),
            Vertex::new(10.0, 5.0),
            Vertex::new(-10.0, 5.0),
        ]));
        level.objects.extend([
            Object::new(-8.0, 3.0, ObjectType::Start),
            Object::new(8.0, 3.0, ObjectType::Flower),
        ]);
        level.objects.push(Object {
            gravity: Gravity::Up,
            ..Object::new(0.0, 1.0, ObjectType::Apple)
        });
        level.pictures.push(Picture {
            picture: FixedString::try_from("barrel").unwrap(),
            texture: FixedString::default(),
            mask: FixedString::default(),
            x: 1.5,
            y: 2.5,
            distance: 450,
            clipping: Clipping::Ground,
        });
        level
    }

    fn build_seeded(level: &Level) -> Vec<u8> {
        level
            .build_with_rng(&FormatOptions::default(), &mut StdRng::seed_from_u64(11))
            .unwrap()
    }

    #[test]
    fn test_pot14_round_trip() {
        let level = sample_pot14();
        let bytes = build_seeded(&level);
        assert_eq!(&bytes[..5], b"POT14");

        let parsed = Level::parse(&bytes).unwrap();
        assert!(parsed.has_valid_integrity());
        assert_eq!(parsed.polygons, level.polygons);
        assert_eq!(parsed.objects, level.objects);
        assert_eq!(parsed.pictures, level.pictures);
        assert_eq!(parsed.top_scores, None);
        assert_eq!(parsed.header.link_number(), 123_456);

        assert_eq!(parsed.build().unwrap(), bytes);
        Level::verify_round_trip(&bytes).unwrap();
    }

    #[test]
    fn test_biased_counts_on_disk() {
        let bytes = build_seeded(&sample_pot14());
        let polygon_count = f64::from_le_bytes(bytes[130..138].try_into().unwrap());
        assert_eq!(polygon_count, 1.0 + 0.4643643);
    }

    #[test]
    fn test_pot14_with_top_scores() {
        let mut level = sample_pot14();
        level.top_scores = Some(TopScores {
            single: vec![TopScore {
                time: 1999,
                player_a: FixedString::try_from("rider").unwrap(),
                player_b: FixedString::try_from("rider").unwrap(),
            }],
            multi: Vec::new(),
        });
        let bytes = build_seeded(&level);
        let parsed = Level::parse(&bytes).unwrap();
        assert_eq!(parsed.top_scores, level.top_scores);
        assert_eq!(parsed.build().unwrap(), bytes);
    }

    #[test]
    fn test_damaged_top_scores_are_absent() {
        let mut level = sample_pot14();
        level.top_scores = Some(TopScores::default());
        let mut bytes = build_seeded(&level);
        let len = bytes.len();
        bytes[len - 1] ^= 0xff;

        let parsed = Level::parse(&bytes).unwrap();
        assert_eq!(parsed.top_scores, None);
    }

    #[test]
    fn test_pot06_round_trip() {
        let mut level = Level::new(LevelHeader::Pot06(Pot06Header {
            link_number: 42,
            title: FixedString::try_from("Old Times").unwrap(),
            ..Pot06Header::default()
        }));
        level.polygons = sample_pot14().polygons;
        level.objects.extend([
            Object::new(0.0, 0.0, ObjectType::Start),
            Object::new(1.0, 0.0, ObjectType::Flower),
        ]);

        let bytes = build_seeded(&level);
        assert_eq!(&bytes[..5], b"POT06");
        assert_eq!(bytes.len(), 100 + 8 + (4 + 4 * 16) + 8 + 2 * 20);

        let parsed = Level::parse(&bytes).unwrap();
        assert_eq!(parsed.version(), LevelVersion::Pot06);
        assert_eq!(parsed.polygons, level.polygons);
        assert_eq!(parsed.objects, level.objects);
        assert_eq!(parsed.build().unwrap(), bytes);
    }

    #[test]
    fn test_pot06_rejected_when_legacy_disabled() {
        let level = Level::new(LevelHeader::Pot06(Pot06Header::default()));
        let bytes = build_seeded(&level);
        let err = Level::parse_with(&bytes, &FormatOptions::current_only()).unwrap_err();
        assert!(matches!(
            err,
            FormatError::NoVariantMatched { record: "level", ref attempts } if attempts.len() == 1
        ));
    }

    #[test]
    fn test_pot06_rejects_pictures() {
        let mut level = Level::new(LevelHeader::Pot06(Pot06Header::default()));
        level.pictures = sample_pot14().pictures;
        let err = level.build().unwrap_err();
        assert!(matches!(
            err,
            FormatError::ValueOutOfRange {
                field: "POT06 pictures",
                value: 1
            }
        ));
    }

    #[test]
    fn test_bad_hash_fails_without_fallback() {
        let mut bytes = build_seeded(&sample_pot14());
        // integrity_1 lives at offsets 11..19
        bytes[17] ^= 0x10;
        let err = Level::parse(&bytes).unwrap_err();
        assert!(matches!(err, FormatError::IntegrityCheckFailed(_)));
    }

    #[test]
    fn test_unknown_version() {
        let mut bytes = build_seeded(&sample_pot14());
        bytes[4] = b'9';
        let err = Level::parse(&bytes).unwrap_err();
        match err {
            FormatError::NoVariantMatched { attempts, .. } => {
                assert_eq!(attempts.len(), 2);
                assert!(attempts[0].starts_with("POT14"));
                assert!(attempts[1].starts_with("POT06"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncated_level() {
        let bytes = build_seeded(&sample_pot14());
        assert!(Level::parse(&bytes[..bytes.len() - 3]).is_err());
    }

    #[test]
    fn test_build_recomputes_hash_after_edit() {
        let bytes = build_seeded(&sample_pot14());
        let mut level = Level::parse(&bytes).unwrap();
        level.polygons[0].vertices[0].x = -11.0;

        let rebuilt = build_seeded(&level);
        let parsed = Level::parse(&rebuilt).unwrap();
        assert!(parsed.has_valid_integrity());
        assert_eq!(parsed.polygons[0].vertices[0].x, -11.0);
    }

    #[test]
    fn test_regenerate_policy_is_seeded() {
        let mut level = sample_pot14();
        level
            .header
            .set_integrity(Integrity::new(0.0, 12000.0, 12000.0, 12000.0));
        let options = FormatOptions {
            integrity: IntegrityPolicy::Regenerate,
            ..FormatOptions::default()
        };
        let a = level
            .build_with_rng(&options, &mut StdRng::seed_from_u64(1))
            .unwrap();
        let b = level
            .build_with_rng(&options, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(a, b);
        assert!(Level::parse(&a).unwrap().has_valid_integrity());
    }
}
