//! Structural combinators: arrays, counts, selection and optional sections

use crate::codec::primitives::{FixedSize, read_padding, write_padding};
use crate::error::{FormatError, lift, raise, rewind};
use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::io::{Read, Seek, Write};
use tracing::trace;

/// Upper bound on speculative preallocation for counts read from a file
const PREALLOC_LIMIT: usize = 4096;

/// Context for records whose element count is stored elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountContext {
    /// Number of elements to read
    pub count: usize,
}

impl CountContext {
    /// Context for `count` elements
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

/// Read exactly `count` consecutive elements
pub fn read_array<R, T>(reader: &mut R, endian: Endian, count: usize) -> BinResult<Vec<T>>
where
    R: Read + Seek,
    T: for<'a> BinRead<Args<'a> = ()>,
{
    read_array_with(reader, count, |r| T::read_options(r, endian, ()))
}

/// Read exactly `count` elements with a custom element decoder
pub fn read_array_with<R, T>(
    reader: &mut R,
    count: usize,
    mut element: impl FnMut(&mut R) -> BinResult<T>,
) -> BinResult<Vec<T>>
where
    R: Read + Seek,
{
    let mut items = Vec::with_capacity(count.min(PREALLOC_LIMIT));
    for _ in 0..count {
        items.push(element(reader)?);
    }
    Ok(items)
}

/// Write every element back to back
pub fn write_array<W, T>(writer: &mut W, endian: Endian, items: &[T]) -> BinResult<()>
where
    W: Write + Seek,
    T: for<'a> BinWrite<Args<'a> = ()>,
{
    for item in items {
        item.write_options(writer, endian, ())?;
    }
    Ok(())
}

/// Derive a `u32` count field from a collection length
pub fn count_u32(field: &'static str, len: usize) -> Result<u32, FormatError> {
    u32::try_from(len).map_err(|_| FormatError::LengthMismatch {
        field,
        expected: u32::MAX as usize,
        actual: len,
    })
}

/// Read a `u32` count followed by that many elements
pub fn read_u32_prefixed<R, T>(reader: &mut R, endian: Endian) -> BinResult<Vec<T>>
where
    R: Read + Seek,
    T: for<'a> BinRead<Args<'a> = ()>,
{
    let count = u32::read_options(reader, endian, ())?;
    read_array(reader, endian, count as usize)
}

/// Write the element count as `u32`, recomputed from `items`, then the elements
pub fn write_u32_prefixed<W, T>(
    writer: &mut W,
    endian: Endian,
    field: &'static str,
    items: &[T],
) -> BinResult<()>
where
    W: Write + Seek,
    T: for<'a> BinWrite<Args<'a> = ()>,
{
    let count = lift(writer, count_u32(field, items.len()))?;
    count.write_options(writer, endian, ())?;
    write_array(writer, endian, items)
}

/// Element count stored as an `f64` with a fixed additive bias.
///
/// The writer stores `len + bias`; the reader truncates the stored value
/// toward zero. The bias values are part of the format and must be kept
/// bit-exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasedCount {
    bias: f64,
}

impl BiasedCount {
    /// Bias used for level polygons
    pub const POLYGONS: Self = Self::new(0.4643643);
    /// Bias used for level objects
    pub const OBJECTS: Self = Self::new(0.4643643);
    /// Bias used for level pictures
    pub const PICTURES: Self = Self::new(0.2345672);

    /// Create a biased count codec
    pub const fn new(bias: f64) -> Self {
        Self { bias }
    }

    /// The additive bias
    pub fn bias(self) -> f64 {
        self.bias
    }

    /// Stored representation of `len`
    pub fn encode(self, len: usize) -> f64 {
        len as f64 + self.bias
    }

    /// Element count represented by a stored value
    pub fn decode(self, stored: f64) -> Result<usize, FormatError> {
        if !stored.is_finite() || stored < 0.0 || stored >= u32::MAX as f64 {
            return Err(FormatError::ValueOutOfRange {
                field: "biased count",
                value: stored as i64,
            });
        }
        Ok(stored.trunc() as usize)
    }

    /// Read the stored count and decode it
    pub fn read<R: Read + Seek>(self, reader: &mut R, endian: Endian) -> BinResult<usize> {
        let stored = f64::read_options(reader, endian, ())?;
        lift(reader, self.decode(stored))
    }

    /// Write the count for `len` elements
    pub fn write<W: Write + Seek>(
        self,
        writer: &mut W,
        endian: Endian,
        len: usize,
    ) -> BinResult<()> {
        self.encode(len).write_options(writer, endian, ())
    }
}

/// Administrative wrapper around an array prefixed by a biased count.
///
/// Callers normally see only `items`; the
/// [`InlineArray`](crate::codec::adapters::InlineArray) adapter strips and
/// rebuilds the wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasedArray<T> {
    /// Stored count, including the bias
    pub count: f64,
    /// Payload
    pub items: Vec<T>,
}

impl<T> BiasedArray<T> {
    /// Read the stored count, then that many elements with `element`
    pub fn read_with<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        bias: BiasedCount,
        element: impl FnMut(&mut R) -> BinResult<T>,
    ) -> BinResult<Self> {
        let count = f64::read_options(reader, endian, ())?;
        let len = lift(reader, bias.decode(count))?;
        let items = read_array_with(reader, len, element)?;
        Ok(Self { count, items })
    }

    /// Write the stored count, then every element with `element`
    pub fn write_with<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        mut element: impl FnMut(&T, &mut W) -> BinResult<()>,
    ) -> BinResult<()> {
        self.count.write_options(writer, endian, ())?;
        for item in &self.items {
            element(item, writer)?;
        }
        Ok(())
    }
}

impl<T> BinRead for BiasedArray<T>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    type Args<'a> = BiasedCount;

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        bias: Self::Args<'_>,
    ) -> BinResult<Self> {
        Self::read_with(reader, endian, bias, |r| T::read_options(r, endian, ()))
    }
}

impl<T> BinWrite for BiasedArray<T>
where
    T: for<'a> BinWrite<Args<'a> = ()>,
{
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        self.write_with(writer, endian, |item, w| item.write_options(w, endian, ()))
    }
}

/// Read `count` elements out of a region sized for `capacity` elements.
///
/// The unused tail of the region is skipped.
pub fn read_preallocated<R, T>(
    reader: &mut R,
    endian: Endian,
    field: &'static str,
    count: usize,
    capacity: usize,
) -> BinResult<Vec<T>>
where
    R: Read + Seek,
    T: FixedSize + for<'a> BinRead<Args<'a> = ()>,
{
    if count > capacity {
        return raise(
            reader,
            FormatError::LengthMismatch {
                field,
                expected: capacity,
                actual: count,
            },
        );
    }
    let items = read_array(reader, endian, count)?;
    read_padding(reader, (capacity - count) * T::SIZE)?;
    Ok(items)
}

/// Write `items` into a region sized for `capacity` elements, zero-filling
/// the unused tail
pub fn write_preallocated<W, T>(
    writer: &mut W,
    endian: Endian,
    field: &'static str,
    items: &[T],
    capacity: usize,
) -> BinResult<()>
where
    W: Write + Seek,
    T: FixedSize + for<'a> BinWrite<Args<'a> = ()>,
{
    if items.len() > capacity {
        return raise(
            writer,
            FormatError::LengthMismatch {
                field,
                expected: capacity,
                actual: items.len(),
            },
        );
    }
    write_array(writer, endian, items)?;
    write_padding(writer, (capacity - items.len()) * T::SIZE)
}

type Decoder<'a, R, T> = Box<dyn Fn(&mut R) -> BinResult<T> + 'a>;

/// Ordered list of mutually exclusive record shapes.
///
/// Decoding tries each candidate from the same start offset; the first one
/// that decodes and validates wins. When every candidate fails the result is
/// `FormatError::NoVariantMatched` listing each rejection.
pub struct Selector<'a, R, T> {
    record: &'static str,
    variants: Vec<(&'static str, Decoder<'a, R, T>)>,
}

impl<'a, R: Read + Seek, T> Selector<'a, R, T> {
    /// Start an empty selector for `record`
    pub fn new(record: &'static str) -> Self {
        Self {
            record,
            variants: Vec::new(),
        }
    }

    /// Append a candidate; earlier candidates take precedence
    #[must_use]
    pub fn variant(
        mut self,
        name: &'static str,
        decode: impl Fn(&mut R) -> BinResult<T> + 'a,
    ) -> Self {
        self.variants.push((name, Box::new(decode)));
        self
    }

    /// Decode with the first matching candidate
    pub fn decode(&self, reader: &mut R) -> BinResult<T> {
        let start = reader.stream_position()?;
        let mut attempts = Vec::with_capacity(self.variants.len());

        for (name, decode) in &self.variants {
            rewind(reader, start)?;
            match decode(reader) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    let e = FormatError::from(e);
                    trace!(record = self.record, variant = name, error = %e, "variant rejected");
                    attempts.push(format!("{name}: {e}"));
                }
            }
        }

        rewind(reader, start)?;
        raise(
            reader,
            FormatError::NoVariantMatched {
                record: self.record,
                attempts,
            },
        )
    }
}

/// Decode an optional trailing section.
///
/// Any failure (early end of data, mismatching leading constant, ...) makes
/// the section absent; the reader is then left where the section would have
/// started.
pub fn optional_tail<R, T>(
    reader: &mut R,
    section: &'static str,
    decode: impl FnOnce(&mut R) -> BinResult<T>,
) -> BinResult<Option<T>>
where
    R: Read + Seek,
{
    let start = reader.stream_position()?;
    match decode(reader) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            trace!(section, error = %FormatError::from(e), "optional section absent");
            rewind(reader, start)?;
            Ok(None)
        }
    }
}
