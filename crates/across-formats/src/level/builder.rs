//! Builder pattern for creating levels

use super::file::Level;
use super::header::{LevelHeader, LevelVersion, Pot06Header, Pot14Header};
use super::object::{Gravity, Object, ObjectType};
use super::picture::Picture;
use super::polygon::{Polygon, Vertex};
use super::top_scores::TopScores;
use crate::codec::FixedString;
use crate::error::{FormatError, Result};
use crate::integrity::Integrity;
use crate::options::{FormatOptions, StringOverflow};

/// Builder for creating levels
///
/// Collects names and geometry, then produces a [`Level`] whose strings have
/// been fitted to their slots under the chosen overflow policy. Integrity
/// fields are left for [`Level::build`] to compute.
///
/// # Example
///
/// ```rust
/// use across_formats::level::{LevelBuilder, ObjectType, Vertex};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let level = LevelBuilder::pot14()
///     .title("First Steps")
///     .add_polygon(vec![
///         Vertex::new(0.0, 0.0),
///         Vertex::new(20.0, 0.0),
///         Vertex::new(20.0, 10.0),
///     ])
///     .add_object(0.5, 1.0, ObjectType::Start)
///     .add_object(19.0, 1.0, ObjectType::Flower)
///     .build()?;
///
/// let bytes = level.build()?;
/// assert_eq!(&bytes[..5], b"POT14");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LevelBuilder {
    version: LevelVersion,
    link_number: u32,
    title: String,
    lgr: String,
    ground: String,
    sky: String,
    polygons: Vec<Polygon>,
    objects: Vec<Object>,
    pictures: Vec<Picture>,
    top_scores: Option<TopScores>,
    overflow: StringOverflow,
}

impl LevelBuilder {
    /// Empty builder for `version`
    pub fn new(version: LevelVersion) -> Self {
        let (lgr, ground, sky) = match version {
            LevelVersion::Pot06 => ("", "", ""),
            LevelVersion::Pot14 => ("default", "ground", "sky"),
        };
        Self {
            version,
            link_number: 0,
            title: String::new(),
            lgr: lgr.to_string(),
            ground: ground.to_string(),
            sky: sky.to_string(),
            polygons: Vec::new(),
            objects: Vec::new(),
            pictures: Vec::new(),
            top_scores: None,
            overflow: StringOverflow::default(),
        }
    }

    /// Builder for a current (`POT14`) level
    pub fn pot14() -> Self {
        Self::new(LevelVersion::Pot14)
    }

    /// Builder for a legacy (`POT06`) level
    pub fn pot06() -> Self {
        Self::new(LevelVersion::Pot06)
    }

    /// Start from an existing level
    pub fn from_level(level: &Level) -> Self {
        let mut builder = Self::new(level.version());
        builder.link_number = level.header.link_number();
        builder.title = String::from_utf8_lossy(level.header.title()).into_owned();
        if let LevelHeader::Pot14(header) = &level.header {
            builder.lgr = header.lgr.to_string_lossy().into_owned();
            builder.ground = header.ground.to_string_lossy().into_owned();
            builder.sky = header.sky.to_string_lossy().into_owned();
        }
        builder.polygons.clone_from(&level.polygons);
        builder.objects.clone_from(&level.objects);
        builder.pictures.clone_from(&level.pictures);
        builder.top_scores.clone_from(&level.top_scores);
        builder
    }

    /// Set the link number shared with replays of this level
    #[must_use]
    pub fn link_number(mut self, link_number: u32) -> Self {
        self.link_number = link_number;
        self
    }

    /// Set the title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the graphics set file name (`POT14` only)
    #[must_use]
    pub fn lgr(mut self, lgr: impl Into<String>) -> Self {
        self.lgr = lgr.into();
        self
    }

    /// Set the ground texture (`POT14` only)
    #[must_use]
    pub fn ground(mut self, ground: impl Into<String>) -> Self {
        self.ground = ground.into();
        self
    }

    /// Set the sky texture (`POT14` only)
    #[must_use]
    pub fn sky(mut self, sky: impl Into<String>) -> Self {
        self.sky = sky.into();
        self
    }

    /// Choose what happens to names longer than their slot
    #[must_use]
    pub fn string_overflow(mut self, overflow: StringOverflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Take the string overflow policy from `options`
    #[must_use]
    pub fn with_options(self, options: &FormatOptions) -> Self {
        self.string_overflow(options.string_overflow)
    }

    /// Add a plain polygon
    #[must_use]
    pub fn add_polygon(mut self, vertices: Vec<Vertex>) -> Self {
        self.polygons.push(Polygon::new(vertices));
        self
    }

    /// Add a grass polygon (`POT14` only)
    #[must_use]
    pub fn add_grass_polygon(mut self, vertices: Vec<Vertex>) -> Self {
        self.polygons.push(Polygon { grass: 1, vertices });
        self
    }

    /// Add an object with default gravity and animation
    #[must_use]
    pub fn add_object(mut self, x: f64, y: f64, kind: ObjectType) -> Self {
        self.objects.push(Object::new(x, y, kind));
        self
    }

    /// Add an apple that changes gravity (`POT14` only)
    #[must_use]
    pub fn add_apple(mut self, x: f64, y: f64, gravity: Gravity, animation: u32) -> Self {
        self.objects.push(Object {
            x,
            y,
            kind: ObjectType::Apple,
            gravity,
            animation,
        });
        self
    }

    /// Add a picture (`POT14` only)
    #[must_use]
    pub fn add_picture(mut self, picture: Picture) -> Self {
        self.pictures.push(picture);
        self
    }

    /// Attach a leaderboard (`POT14` only)
    #[must_use]
    pub fn top_scores(mut self, top_scores: TopScores) -> Self {
        self.top_scores = Some(top_scores);
        self
    }

    /// Produce the level
    ///
    /// # Errors
    /// - `LengthMismatch` if a name does not fit under
    ///   [`StringOverflow::Reject`]
    /// - `ValueOutOfRange` if a `POT06` level carries `POT14`-only content
    pub fn build(self) -> Result<Level> {
        let header = match self.version {
            LevelVersion::Pot06 => {
                self.check_pot06()?;
                LevelHeader::Pot06(Pot06Header {
                    link_number: self.link_number,
                    integrity: Integrity::default(),
                    title: self.fit(&self.title)?,
                })
            }
            LevelVersion::Pot14 => LevelHeader::Pot14(Pot14Header {
                link_number: self.link_number,
                integrity: Integrity::default(),
                title: self.fit(&self.title)?,
                lgr: self.fit(&self.lgr)?,
                ground: self.fit(&self.ground)?,
                sky: self.fit(&self.sky)?,
            }),
        };

        Ok(Level {
            header,
            polygons: self.polygons,
            objects: self.objects,
            pictures: self.pictures,
            top_scores: self.top_scores,
        })
    }

    fn fit<const N: usize>(&self, value: &str) -> Result<FixedString<N>> {
        FixedString::with_overflow(value.as_bytes(), self.overflow)
    }

    fn check_pot06(&self) -> Result<()> {
        let unsupported = [
            ("POT06 lgr", self.lgr.len()),
            ("POT06 ground", self.ground.len()),
            ("POT06 sky", self.sky.len()),
            ("POT06 pictures", self.pictures.len()),
            ("POT06 top scores", usize::from(self.top_scores.is_some())),
            (
                "POT06 grass polygons",
                self.polygons.iter().filter(|p| p.grass != 0).count(),
            ),
            (
                "POT06 object gravity",
                self.objects
                    .iter()
                    .filter(|o| o.gravity != Gravity::Normal || o.animation != 0)
                    .count(),
            ),
        ];
        match unsupported.into_iter().find(|&(_, count)| count > 0) {
            Some((field, count)) => Err(FormatError::ValueOutOfRange {
                field,
                value: count as i64,
            }),
            None => Ok(()),
        }
    }
}

impl Default for LevelBuilder {
    fn default() -> Self {
        Self::pot14()
    }
}
