//! Declarative building blocks shared by the level, replay and resource
//! schemas.
//!
//! Everything here runs on top of `binrw`'s [`BinRead`](binrw::BinRead) and
//! [`BinWrite`](binrw::BinWrite) traits:
//!
//! - [`primitives`]: fixed-width strings, magic markers, byte tags, padding
//! - [`combinators`]: counted arrays, biased float counts, first-match
//!   selection, optional trailing sections, preallocated arrays
//! - [`adapters`]: bidirectional value transforms (boolean mapping, slicing,
//!   inline array unwrapping)
//! - [`encrypted`]: transparent cipher wrapper around an inner record
//!
//! Domain failures raised inside a read or write are carried through binrw as
//! custom errors and surface as [`FormatError`](crate::error::FormatError) at
//! the public boundary.

pub mod adapters;
pub mod combinators;
pub mod encrypted;
pub mod primitives;

pub use adapters::{Adapter, BoolMapping, InlineArray, Sliced, Slicing};
pub use combinators::{
    BiasedArray, BiasedCount, CountContext, Selector, count_u32, optional_tail, read_array,
    read_array_with, read_preallocated, read_u32_prefixed, write_array, write_preallocated,
    write_u32_prefixed,
};
pub use encrypted::EncryptedBlock;
pub use primitives::{FixedSize, FixedString, Marker, read_padding, read_tag, write_padding};

/// Define a field-less enum stored on disk as an integer code.
///
/// Generates `from_code`/`code` plus `BinRead`/`BinWrite` impls; reading an
/// unknown code fails with `FormatError::ValueOutOfRange`.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $repr:ty as $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Parse from the stored integer code
            pub fn from_code(code: $repr) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Integer code stored on disk
            pub fn code(self) -> $repr {
                match self {
                    $( Self::$variant => $code, )+
                }
            }
        }

        impl binrw::BinRead for $name {
            type Args<'a> = ();

            fn read_options<R: std::io::Read + std::io::Seek>(
                reader: &mut R,
                endian: binrw::Endian,
                (): Self::Args<'_>,
            ) -> binrw::BinResult<Self> {
                let code = <$repr as binrw::BinRead>::read_options(reader, endian, ())?;
                match Self::from_code(code) {
                    Some(value) => Ok(value),
                    None => $crate::error::raise(
                        reader,
                        $crate::error::FormatError::ValueOutOfRange {
                            field: $field,
                            value: i64::from(code),
                        },
                    ),
                }
            }
        }

        impl binrw::BinWrite for $name {
            type Args<'a> = ();

            fn write_options<W: std::io::Write + std::io::Seek>(
                &self,
                writer: &mut W,
                endian: binrw::Endian,
                (): Self::Args<'_>,
            ) -> binrw::BinResult<()> {
                <$repr as binrw::BinWrite>::write_options(&self.code(), writer, endian, ())
            }
        }
    };
}

pub(crate) use coded_enum;
