//! Parsers and builders for Across data files
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_possible_wrap)] // Intentional for binary operations
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::cast_precision_loss)] // Biased float counts
#![allow(clippy::doc_markdown)] // Format tags like POT14 don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::float_cmp)] // Binary format requirements
#![allow(clippy::ptr_arg)] // Adapters expose Vec
#![allow(clippy::derive_partial_eq_without_eq)] // Binary format structs
#![allow(clippy::derivable_impls)] // Defaults next to coded enums
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::use_self)] // Type clarity
//! This crate provides symmetric (parser and builder) implementations of the
//! three binary formats used by the Across motorbike game.
//!
//! # Supported Formats
//!
//! - **Level** (`.lev`): `POT06` and `POT14` level geometry with integrity
//!   fields and an optional encrypted top-scores block
//! - **Replay** (`.rec`): frame columns and events, current and legacy
//!   headers
//! - **Resource** (`.res`): archive of named files behind an encrypted table
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: Both parsing and building supported
//! - **Derived Fields**: Counts, offsets and integrity hashes are recomputed
//!   on build, never copied
//! - **Round-Trip Guarantee**: build(parse(data)) == data for genuine files
//! - **Deterministic Builds**: the randomness behind integrity companion
//!   fields is injectable
//!
//! # Example
//!
//! ```rust
//! use across_formats::AcrossFormat;
//! use across_formats::level::{Level, LevelBuilder, ObjectType, Vertex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let level = LevelBuilder::pot14()
//!     .title("Hello")
//!     .add_polygon(vec![
//!         Vertex::new(0.0, 0.0),
//!         Vertex::new(10.0, 0.0),
//!         Vertex::new(10.0, 5.0),
//!     ])
//!     .add_object(1.0, 1.0, ObjectType::Start)
//!     .build()?;
//!
//! let bytes = level.build()?;
//! Level::verify_round_trip(&bytes)?;
//! assert!(<Level as AcrossFormat>::parse(&bytes)?.has_valid_integrity());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod batch;
pub mod codec;
pub mod error;
pub mod integrity;
pub mod level;
pub mod options;
pub mod replay;
pub mod resource;

pub use error::{FormatError, Result};
pub use options::{FormatOptions, IntegrityPolicy, StringOverflow};

/// Common format trait implemented by levels, replays and resource archives
pub trait AcrossFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>>;

    /// Verify round-trip correctness
    ///
    /// Fails with [`FormatError::RoundTripMismatch`] at the first differing
    /// byte, or at the length of the shorter buffer.
    fn verify_round_trip(data: &[u8]) -> Result<()> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data == rebuilt.as_slice() {
            return Ok(());
        }
        let offset = data
            .iter()
            .zip(&rebuilt)
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| data.len().min(rebuilt.len()));
        Err(FormatError::RoundTripMismatch { offset })
    }
}
