//! Pictures placed in `POT14` levels

use crate::codec::{FixedString, coded_enum};
use binrw::{BinRead, BinWrite};

coded_enum! {
    /// Which surfaces clip the picture
    pub enum Clipping: u32 as "picture clipping" {
        /// Drawn over everything
        Unclipped = 0,
        /// Clipped by ground
        Ground = 1,
        /// Clipped by sky
        Sky = 2,
    }
}

/// Picture, texture or mask placed at a position
#[derive(Debug, Clone, PartialEq, BinRead, BinWrite)]
pub struct Picture {
    /// Picture name
    pub picture: FixedString<10>,
    /// Texture name
    pub texture: FixedString<10>,
    /// Mask name
    pub mask: FixedString<10>,
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
    /// Drawing distance (z-order)
    pub distance: u32,
    /// Clipping mode
    pub clipping: Clipping,
}

impl Picture {
    /// Encoded size in bytes
    pub const SIZE: usize = 3 * 10 + 2 * 8 + 4 + 4;
}
