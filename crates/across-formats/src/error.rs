//! Error types shared by every Across format

use std::io::{Seek, SeekFrom};
use thiserror::Error;

/// Errors that can occur when parsing or building Across files
#[derive(Debug, Error)]
pub enum FormatError {
    /// A fixed or magic value did not match
    #[error("Constant mismatch in {field}: expected {expected}, found {found}")]
    ConstMismatch {
        /// Field holding the constant
        field: &'static str,
        /// Expected value (hex)
        expected: String,
        /// Value actually read (hex)
        found: String,
    },

    /// An array, record, string or encrypted block had the wrong length
    #[error("Length mismatch in {field}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Field whose length was violated
        field: &'static str,
        /// Expected (or maximum) length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// None of the candidate record shapes matched
    #[error("No variant of {record} matched: {}", attempts.join("; "))]
    NoVariantMatched {
        /// Record being selected
        record: &'static str,
        /// One line per rejected variant
        attempts: Vec<String>,
    },

    /// Checksum or bounds validation failed
    #[error("Integrity check failed: {0}")]
    IntegrityCheckFailed(String),

    /// A stored value lies outside its domain
    #[error("Value out of range for {field}: {value}")]
    ValueOutOfRange {
        /// Field holding the value
        field: &'static str,
        /// Offending value
        value: i64,
    },

    /// Re-encoding decoded data did not reproduce the input
    #[error("Round-trip mismatch at byte {offset}")]
    RoundTripMismatch {
        /// First differing byte (or the shorter length)
        offset: usize,
    },

    /// Input ended before the record was complete
    #[error("Unexpected end of data")]
    UnexpectedEof,

    /// Any other binrw failure
    #[error("Binary parsing error: {0}")]
    Binary(String),

    /// IO error during parsing or building
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    /// Box this error into a `binrw::Error` positioned at the stream's
    /// current offset
    pub fn at<S: Seek>(self, stream: &mut S) -> binrw::Error {
        binrw::Error::Custom {
            pos: stream.stream_position().unwrap_or(0),
            err: Box::new(self),
        }
    }

    /// Build a [`FormatError::ConstMismatch`] from raw byte slices
    pub fn const_mismatch(field: &'static str, expected: &[u8], found: &[u8]) -> Self {
        Self::ConstMismatch {
            field,
            expected: format!("0x{}", hex::encode(expected)),
            found: format!("0x{}", hex::encode(found)),
        }
    }
}

impl From<binrw::Error> for FormatError {
    fn from(e: binrw::Error) -> Self {
        match e {
            binrw::Error::Custom { err, .. } => match err.downcast::<FormatError>() {
                Ok(inner) => *inner,
                Err(other) => Self::Binary(other.to_string()),
            },
            binrw::Error::Backtrace(bt) => Self::from(*bt.error),
            binrw::Error::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                Self::UnexpectedEof
            }
            binrw::Error::Io(io) => Self::Io(io),
            other => Self::Binary(other.to_string()),
        }
    }
}

/// Result type alias for format operations
pub type Result<T> = std::result::Result<T, FormatError>;

/// Convert a `FormatError` raised inside a binrw read or write
pub(crate) fn raise<S: Seek, T>(stream: &mut S, err: FormatError) -> binrw::BinResult<T> {
    Err(err.at(stream))
}

/// Carry the outcome of a value-level transform into a binrw read or write
pub(crate) fn lift<S: Seek, T>(stream: &mut S, result: Result<T>) -> binrw::BinResult<T> {
    result.or_else(|e| raise(stream, e))
}

/// Seek back to `pos`, used before retrying an alternative decoding
pub(crate) fn rewind<S: Seek>(stream: &mut S, pos: u64) -> binrw::BinResult<()> {
    stream.seek(SeekFrom::Start(pos))?;
    Ok(())
}
