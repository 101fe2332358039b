//! Bidirectional value adapters.
//!
//! An [`Adapter`] converts between the shape a value has on disk (`Stored`)
//! and the shape callers work with (`Exposed`). `forward` runs after
//! decoding, `backward` before encoding; both validate their input.

use crate::codec::combinators::{BiasedArray, BiasedCount};
use crate::error::{FormatError, Result};
use std::marker::PhantomData;

/// Bidirectional transform between a stored and an exposed representation
pub trait Adapter {
    /// On-disk representation
    type Stored;
    /// Caller-facing representation
    type Exposed;

    /// Stored to exposed (decode direction)
    fn forward(&self, stored: Self::Stored) -> Result<Self::Exposed>;

    /// Exposed to stored (encode direction)
    fn backward(&self, exposed: &Self::Exposed) -> Result<Self::Stored>;
}

/// Boolean stored as an integer `0`/`1`
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolMapping {
    field: &'static str,
}

impl BoolMapping {
    /// Mapping for the named field
    pub const fn new(field: &'static str) -> Self {
        Self { field }
    }
}

impl Adapter for BoolMapping {
    type Stored = u8;
    type Exposed = bool;

    fn forward(&self, stored: u8) -> Result<bool> {
        match stored {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(FormatError::ValueOutOfRange {
                field: self.field,
                value: i64::from(other),
            }),
        }
    }

    fn backward(&self, exposed: &bool) -> Result<u8> {
        Ok(u8::from(*exposed))
    }
}

/// Row type that can be stored as a set of parallel columns
/// (struct-of-arrays on disk, array-of-structs in memory)
pub trait Sliced: Sized {
    /// Column storage
    type Columns;

    /// Name and length of every column
    fn column_lengths(columns: &Self::Columns) -> Vec<(&'static str, usize)>;

    /// Empty columns with room for `rows` rows
    fn empty_columns(rows: usize) -> Self::Columns;

    /// Assemble row `index`; every column is known to hold it
    fn row(columns: &Self::Columns, index: usize) -> Self;

    /// Append this row to the end of every column
    fn push_row(&self, columns: &mut Self::Columns);
}

/// Homogeneous rows: `N` columns of `T` become rows `[T; N]`
impl<T: Clone, const N: usize> Sliced for [T; N] {
    type Columns = [Vec<T>; N];

    fn column_lengths(columns: &Self::Columns) -> Vec<(&'static str, usize)> {
        columns.iter().map(|c| ("column", c.len())).collect()
    }

    fn empty_columns(rows: usize) -> Self::Columns {
        std::array::from_fn(|_| Vec::with_capacity(rows))
    }

    fn row(columns: &Self::Columns, index: usize) -> Self {
        std::array::from_fn(|k| columns[k][index].clone())
    }

    fn push_row(&self, columns: &mut Self::Columns) {
        for (column, value) in columns.iter_mut().zip(self) {
            column.push(value.clone());
        }
    }
}

/// Transposes parallel columns into rows and back.
///
/// Decoding fails with `LengthMismatch` unless every column has the same
/// length. Rows are statically typed, so every row necessarily carries the
/// same set of fields when encoding.
#[derive(Debug)]
pub struct Slicing<T>(PhantomData<T>);

impl<T> Slicing<T> {
    /// Create the adapter
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Slicing<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sliced> Adapter for Slicing<T> {
    type Stored = T::Columns;
    type Exposed = Vec<T>;

    fn forward(&self, columns: T::Columns) -> Result<Vec<T>> {
        let lengths = T::column_lengths(&columns);
        let rows = lengths.first().map_or(0, |&(_, len)| len);
        if let Some(&(field, actual)) = lengths.iter().find(|&&(_, len)| len != rows) {
            return Err(FormatError::LengthMismatch {
                field,
                expected: rows,
                actual,
            });
        }
        Ok((0..rows).map(|index| T::row(&columns, index)).collect())
    }

    fn backward(&self, rows: &Vec<T>) -> Result<T::Columns> {
        let mut columns = T::empty_columns(rows.len());
        for row in rows {
            row.push_row(&mut columns);
        }
        Ok(columns)
    }
}

/// Hides a [`BiasedArray`] wrapper behind its payload.
///
/// `forward` checks the stored count against the payload and returns the
/// items; `backward` rebuilds the wrapper with a recomputed count.
#[derive(Debug)]
pub struct InlineArray<T> {
    count: BiasedCount,
    _items: PhantomData<T>,
}

impl<T> InlineArray<T> {
    /// Adapter for arrays counted with `count`
    pub const fn new(count: BiasedCount) -> Self {
        Self {
            count,
            _items: PhantomData,
        }
    }
}

impl<T: Clone> Adapter for InlineArray<T> {
    type Stored = BiasedArray<T>;
    type Exposed = Vec<T>;

    fn forward(&self, stored: BiasedArray<T>) -> Result<Vec<T>> {
        let expected = self.count.decode(stored.count)?;
        if expected != stored.items.len() {
            return Err(FormatError::LengthMismatch {
                field: "inline array",
                expected,
                actual: stored.items.len(),
            });
        }
        Ok(stored.items)
    }

    fn backward(&self, items: &Vec<T>) -> Result<BiasedArray<T>> {
        Ok(BiasedArray {
            count: self.count.encode(items.len()),
            items: items.clone(),
        })
    }
}
