//! Level (`.lev`) files
//!
//! Two variants exist, both little endian:
//!
//! - **`POT06`** (Across 1.0/1.1): 100-byte padded header, polygons and
//!   objects
//! - **`POT14`** (Across 1.2+): longer header with graphics set and texture
//!   names, grass polygons, objects with gravity and animation, pictures and
//!   an optional encrypted top-scores block
//!
//! Polygon, object and picture counts are stored as `f64` values with an
//! additive bias. Each header carries four integrity fields (see
//! [`integrity`](crate::integrity)) which are checked on parse and
//! recomputed on build.
//!
//! # Example
//!
//! ```rust,no_run
//! use across_formats::level::Level;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("QWQUU001.LEV")?;
//! let level = Level::parse(&data)?;
//!
//! println!("{} ({:?})", String::from_utf8_lossy(level.header.title()), level.version());
//! println!("{} polygons, {} objects", level.polygons.len(), level.objects.len());
//!
//! std::fs::write("copy.lev", level.build()?)?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod file;
mod header;
mod object;
mod picture;
mod polygon;
mod top_scores;

pub use builder::LevelBuilder;
pub use file::Level;
pub use header::{
    LevelHeader, LevelVersion, POT06_HEADER_SIZE, POT14_HEADER_SIZE, Pot06Header, Pot14Header,
};
pub use object::{Gravity, Object, ObjectType};
pub use picture::{Clipping, Picture};
pub use polygon::{Polygon, Vertex};
pub use top_scores::{
    BLOCK_SIZE as TOP_SCORES_SIZE, PlayerName, TABLE_CAPACITY, TopScore, TopScoreColumns,
    TopScores,
};
