//! Per-frame bike state
//!
//! A replay stores its frames as fourteen parallel columns of `frame count`
//! values each, in this order:
//!
//! | column | type |
//! |---|---|
//! | bike x, bike y | f32 |
//! | left wheel x, left wheel y | f32 |
//! | right wheel x, right wheel y | f32 |
//! | bike, left wheel, right wheel angle | f32 |
//! | direction | u8 (0 = left, 1 = right) |
//! | engine rpm | f32 |
//! | throttle | u8 (0/1) |
//! | friction 1, friction 2 | f32 |
//!
//! [`FrameColumns`] is the on-disk shape; [`Frame`] is one row of it.

use crate::codec::{
    Adapter, BoolMapping, CountContext, Sliced, coded_enum, read_array, read_array_with,
    write_array,
};
use crate::error::lift;
use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::io::{Read, Seek, Write};

/// Columns per frame
pub const FRAME_COLUMNS: usize = 14;

/// Encoded bytes per frame (summed over all columns)
pub const FRAME_SIZE: usize = 12 * 4 + 2;

const THROTTLE: BoolMapping = BoolMapping::new("frame throttle");

coded_enum! {
    /// Direction the bike faces
    pub enum Direction: u8 as "frame direction" {
        /// Facing left
        Left = 0,
        /// Facing right
        Right = 1,
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::Left
    }
}

/// One time-sampled snapshot of the bike
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    /// Bike x
    pub bike_x: f32,
    /// Bike y
    pub bike_y: f32,
    /// Left wheel x
    pub left_wheel_x: f32,
    /// Left wheel y
    pub left_wheel_y: f32,
    /// Right wheel x
    pub right_wheel_x: f32,
    /// Right wheel y
    pub right_wheel_y: f32,
    /// Bike rotation
    pub bike_angle: f32,
    /// Left wheel rotation
    pub left_wheel_angle: f32,
    /// Right wheel rotation
    pub right_wheel_angle: f32,
    /// Facing direction
    pub direction: Direction,
    /// Engine speed
    pub engine_rpm: f32,
    /// Whether the throttle is held
    pub throttle: bool,
    /// Friction volume of the first wheel
    pub friction_1: f32,
    /// Friction volume of the second wheel
    pub friction_2: f32,
}

/// Frame data as stored: one vector per column, named after the
/// [`Frame`] fields
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameColumns {
    pub bike_x: Vec<f32>,
    pub bike_y: Vec<f32>,
    pub left_wheel_x: Vec<f32>,
    pub left_wheel_y: Vec<f32>,
    pub right_wheel_x: Vec<f32>,
    pub right_wheel_y: Vec<f32>,
    pub bike_angle: Vec<f32>,
    pub left_wheel_angle: Vec<f32>,
    pub right_wheel_angle: Vec<f32>,
    pub direction: Vec<Direction>,
    pub engine_rpm: Vec<f32>,
    pub throttle: Vec<bool>,
    pub friction_1: Vec<f32>,
    pub friction_2: Vec<f32>,
}

impl Sliced for Frame {
    type Columns = FrameColumns;

    fn column_lengths(c: &FrameColumns) -> Vec<(&'static str, usize)> {
        vec![
            ("bike_x", c.bike_x.len()),
            ("bike_y", c.bike_y.len()),
            ("left_wheel_x", c.left_wheel_x.len()),
            ("left_wheel_y", c.left_wheel_y.len()),
            ("right_wheel_x", c.right_wheel_x.len()),
            ("right_wheel_y", c.right_wheel_y.len()),
            ("bike_angle", c.bike_angle.len()),
            ("left_wheel_angle", c.left_wheel_angle.len()),
            ("right_wheel_angle", c.right_wheel_angle.len()),
            ("direction", c.direction.len()),
            ("engine_rpm", c.engine_rpm.len()),
            ("throttle", c.throttle.len()),
            ("friction_1", c.friction_1.len()),
            ("friction_2", c.friction_2.len()),
        ]
    }

    fn empty_columns(rows: usize) -> FrameColumns {
        FrameColumns {
            bike_x: Vec::with_capacity(rows),
            bike_y: Vec::with_capacity(rows),
            left_wheel_x: Vec::with_capacity(rows),
            left_wheel_y: Vec::with_capacity(rows),
            right_wheel_x: Vec::with_capacity(rows),
            right_wheel_y: Vec::with_capacity(rows),
            bike_angle: Vec::with_capacity(rows),
            left_wheel_angle: Vec::with_capacity(rows),
            right_wheel_angle: Vec::with_capacity(rows),
            direction: Vec::with_capacity(rows),
            engine_rpm: Vec::with_capacity(rows),
            throttle: Vec::with_capacity(rows),
            friction_1: Vec::with_capacity(rows),
            friction_2: Vec::with_capacity(rows),
        }
    }

    fn row(c: &FrameColumns, i: usize) -> Self {
        Self {
            bike_x: c.bike_x[i],
            bike_y: c.bike_y[i],
            left_wheel_x: c.left_wheel_x[i],
            left_wheel_y: c.left_wheel_y[i],
            right_wheel_x: c.right_wheel_x[i],
            right_wheel_y: c.right_wheel_y[i],
            bike_angle: c.bike_angle[i],
            left_wheel_angle: c.left_wheel_angle[i],
            right_wheel_angle: c.right_wheel_angle[i],
            direction: c.direction[i],
            engine_rpm: c.engine_rpm[i],
            throttle: c.throttle[i],
            friction_1: c.friction_1[i],
            friction_2: c.friction_2[i],
        }
    }

    fn push_row(&self, c: &mut FrameColumns) {
        c.bike_x.push(self.bike_x);
        c.bike_y.push(self.bike_y);
        c.left_wheel_x.push(self.left_wheel_x);
        c.left_wheel_y.push(self.left_wheel_y);
        c.right_wheel_x.push(self.right_wheel_x);
        c.right_wheel_y.push(self.right_wheel_y);
        c.bike_angle.push(self.bike_angle);
        c.left_wheel_angle.push(self.left_wheel_angle);
        c.right_wheel_angle.push(self.right_wheel_angle);
        c.direction.push(self.direction);
        c.engine_rpm.push(self.engine_rpm);
        c.throttle.push(self.throttle);
        c.friction_1.push(self.friction_1);
        c.friction_2.push(self.friction_2);
    }
}

impl BinRead for FrameColumns {
    type Args<'a> = CountContext;

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        ctx: Self::Args<'_>,
    ) -> BinResult<Self> {
        let n = ctx.count;
        Ok(Self {
            bike_x: read_array(reader, endian, n)?,
            bike_y: read_array(reader, endian, n)?,
            left_wheel_x: read_array(reader, endian, n)?,
            left_wheel_y: read_array(reader, endian, n)?,
            right_wheel_x: read_array(reader, endian, n)?,
            right_wheel_y: read_array(reader, endian, n)?,
            bike_angle: read_array(reader, endian, n)?,
            left_wheel_angle: read_array(reader, endian, n)?,
            right_wheel_angle: read_array(reader, endian, n)?,
            direction: read_array(reader, endian, n)?,
            engine_rpm: read_array(reader, endian, n)?,
            throttle: read_array_with(reader, n, |r| {
                let stored = u8::read_options(r, endian, ())?;
                lift(r, THROTTLE.forward(stored))
            })?,
            friction_1: read_array(reader, endian, n)?,
            friction_2: read_array(reader, endian, n)?,
        })
    }
}

impl BinWrite for FrameColumns {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        write_array(writer, endian, &self.bike_x)?;
        write_array(writer, endian, &self.bike_y)?;
        write_array(writer, endian, &self.left_wheel_x)?;
        write_array(writer, endian, &self.left_wheel_y)?;
        write_array(writer, endian, &self.right_wheel_x)?;
        write_array(writer, endian, &self.right_wheel_y)?;
        write_array(writer, endian, &self.bike_angle)?;
        write_array(writer, endian, &self.left_wheel_angle)?;
        write_array(writer, endian, &self.right_wheel_angle)?;
        write_array(writer, endian, &self.direction)?;
        write_array(writer, endian, &self.engine_rpm)?;
        for throttle in &self.throttle {
            let stored = lift(writer, THROTTLE.backward(throttle))?;
            stored.write_options(writer, endian, ())?;
        }
        write_array(writer, endian, &self.friction_1)?;
        write_array(writer, endian, &self.friction_2)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codec::Slicing;
    use crate::error::FormatError;
    use binrw::BinWriterExt;
    use proptest::prelude::*;
    use std::io::Cursor;

    fn frame(i: f32) -> Frame {
        Frame {
            bike_x: i,
            bike_y: i + 0.5,
            direction: if i > 1.0 {
                Direction::Right
            } else {
                Direction::Left
            },
            throttle: i > 0.0,
            engine_rpm: 100.0 * i,
            ..Frame::default()
        }
    }

    #[test]
    fn test_columns_are_stored_in_order() {
        let frames = vec![frame(0.0), frame(1.0), frame(2.0)];
        let columns = Slicing::<Frame>::new().backward(&frames).unwrap();
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_le(&columns).unwrap();
        let bytes = cursor.into_inner();

        assert_eq!(bytes.len(), 3 * FRAME_SIZE);
        assert_eq!(&bytes[..4], &0.0f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[12..16], &0.5f32.to_le_bytes());
        // direction column follows nine f32 columns
        assert_eq!(&bytes[9 * 12..9 * 12 + 3], &[0, 0, 1]);
        // throttle column follows the rpm column
        assert_eq!(&bytes[9 * 12 + 3 + 12..9 * 12 + 3 + 12 + 3], &[0, 1, 1]);

        let parsed = FrameColumns::read_options(
            &mut Cursor::new(bytes),
            Endian::Little,
            CountContext::new(3),
        )
        .unwrap();
        assert_eq!(Slicing::<Frame>::new().forward(parsed).unwrap(), frames);
    }

    #[test]
    fn test_invalid_throttle() {
        let frames = vec![frame(1.0)];
        let columns = Slicing::<Frame>::new().backward(&frames).unwrap();
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_le(&columns).unwrap();
        let mut bytes = cursor.into_inner();
        bytes[9 * 4 + 1 + 4] = 2;

        let err = FrameColumns::read_options(
            &mut Cursor::new(bytes),
            Endian::Little,
            CountContext::new(1),
        )
        .unwrap_err();
        assert!(matches!(
            FormatError::from(err),
            FormatError::ValueOutOfRange {
                field: "frame throttle",
                value: 2
            }
        ));
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let mut columns = Slicing::<Frame>::new().backward(&vec![frame(1.0)]).unwrap();
        columns.friction_2.push(0.0);
        let err = Slicing::<Frame>::new().forward(columns).unwrap_err();
        assert!(matches!(
            err,
            FormatError::LengthMismatch {
                field: "friction_2",
                expected: 1,
                actual: 2
            }
        ));
    }

    proptest! {
        #[test]
        fn prop_slicing_inverse(values in prop::collection::vec((-1000.0f32..1000.0, any::<bool>()), 0..50)) {
            let frames: Vec<Frame> = values
                .iter()
                .map(|&(v, throttle)| Frame { bike_x: v, friction_1: -v, throttle, ..Frame::default() })
                .collect();
            let slicing = Slicing::<Frame>::new();
            let columns = slicing.backward(&frames).unwrap();
            prop_assert_eq!(&columns.bike_x, &values.iter().map(|v| v.0).collect::<Vec<_>>());
            prop_assert_eq!(slicing.forward(columns).unwrap(), frames);
        }
    }
}
