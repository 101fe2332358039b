//! Primitive field codecs: fixed-width strings, constants and padding
//!
//! Integers and floats are read and written directly through binrw's
//! built-in impls (`u32::read_le`, `f64::write_le`, ...); this module adds the
//! field kinds binrw has no direct equivalent for.

use crate::error::{FormatError, Result, raise};
use crate::options::StringOverflow;
use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::borrow::Cow;
use std::fmt;
use std::io::{Read, Seek, Write};

/// Records with a constant encoded size.
///
/// Needed wherever the size has to be known before any value exists: the
/// byte budget of an encrypted block or the padding of a preallocated array.
pub trait FixedSize {
    /// Encoded size in bytes
    const SIZE: usize;
}

impl FixedSize for i32 {
    const SIZE: usize = 4;
}

impl FixedSize for u32 {
    const SIZE: usize = 4;
}

/// Zero-terminated string stored in a fixed-width slot of `N` bytes.
///
/// Decoding reads the whole slot and keeps everything before the first zero
/// byte. Encoding left-justifies the payload and zero-fills the remainder.
/// The payload never exceeds `N` bytes and never contains a zero byte, so
/// encoding cannot fail and decode-then-encode is stable.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct FixedString<const N: usize> {
    bytes: Vec<u8>,
}

impl<const N: usize> FixedString<N> {
    /// Width of the on-disk slot
    pub const WIDTH: usize = N;

    /// Create a string, rejecting payloads wider than the slot.
    ///
    /// The payload ends at its first zero byte, if any.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::with_overflow(bytes, StringOverflow::Reject)
    }

    /// Create a string, cutting payloads wider than the slot
    pub fn truncated(bytes: impl Into<Vec<u8>>) -> Self {
        let mut bytes = terminated(bytes.into());
        bytes.truncate(N);
        Self { bytes }
    }

    /// Create a string using the given overflow policy
    pub fn with_overflow(bytes: impl Into<Vec<u8>>, policy: StringOverflow) -> Result<Self> {
        let bytes = terminated(bytes.into());
        if bytes.len() > N {
            return match policy {
                StringOverflow::Reject => Err(FormatError::LengthMismatch {
                    field: "fixed string",
                    expected: N,
                    actual: bytes.len(),
                }),
                StringOverflow::Truncate => Ok(Self::truncated(bytes)),
            };
        }
        Ok(Self { bytes })
    }

    /// Raw payload without terminator or padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Payload as text, replacing invalid UTF-8
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

fn terminated(mut bytes: Vec<u8>) -> Vec<u8> {
    if let Some(end) = bytes.iter().position(|&b| b == 0) {
        bytes.truncate(end);
    }
    bytes
}

impl<const N: usize> TryFrom<&str> for FixedString<N> {
    type Error = FormatError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value.as_bytes())
    }
}

impl<const N: usize> fmt::Debug for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl<const N: usize> fmt::Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_string_lossy())
    }
}

impl<const N: usize> FixedSize for FixedString<N> {
    const SIZE: usize = N;
}

impl<const N: usize> BinRead for FixedString<N> {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<Self> {
        let mut slot = [0u8; N];
        reader.read_exact(&mut slot)?;
        Ok(Self {
            bytes: terminated(slot.to_vec()),
        })
    }
}

impl<const N: usize> BinWrite for FixedString<N> {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        writer.write_all(&self.bytes)?;
        write_padding(writer, N - self.bytes.len())
    }
}

/// Constant 32-bit marker, checked on read and emitted on write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Marker<const V: u32>;

impl<const V: u32> Marker<V> {
    /// The marker value
    pub const VALUE: u32 = V;
}

impl<const V: u32> FixedSize for Marker<V> {
    const SIZE: usize = 4;
}

impl<const V: u32> BinRead for Marker<V> {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<Self> {
        let found = u32::read_options(reader, endian, ())?;
        if found != V {
            return raise(
                reader,
                FormatError::ConstMismatch {
                    field: "marker",
                    expected: format!("{V:#x}"),
                    found: format!("{found:#x}"),
                },
            );
        }
        Ok(Self)
    }
}

impl<const V: u32> BinWrite for Marker<V> {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        (): Self::Args<'_>,
    ) -> BinResult<()> {
        V.write_options(writer, endian, ())
    }
}

/// Read a constant byte tag such as a version string
pub fn read_tag<R: Read + Seek>(reader: &mut R, field: &'static str, tag: &[u8]) -> BinResult<()> {
    let mut found = vec![0u8; tag.len()];
    reader.read_exact(&mut found)?;
    if found != tag {
        return raise(reader, FormatError::const_mismatch(field, tag, &found));
    }
    Ok(())
}

/// Skip `len` padding bytes; their content is ignored
pub fn read_padding<R: Read + Seek>(reader: &mut R, len: usize) -> BinResult<()> {
    let mut skipped = vec![0u8; len];
    reader.read_exact(&mut skipped)?;
    Ok(())
}

/// Emit `len` zero bytes
pub fn write_padding<W: Write + Seek>(writer: &mut W, len: usize) -> BinResult<()> {
    writer.write_all(&vec![0u8; len])?;
    Ok(())
}
