//! Transparent cipher wrapper around a fixed-length inner record

use crate::error::{FormatError, raise};
use across_crypto::{CipherParams, XorStreamCipher};
use binrw::BinResult;
use std::io::{Cursor, Read, Seek, Write};

/// Region of exactly `length` bytes protected by the XOR stream cipher.
///
/// Reading pulls the ciphertext, decrypts it and hands a cursor over the
/// plaintext to the inner decoder, which must consume it completely. Writing
/// runs the inner encoder into a scratch buffer, checks that it produced
/// exactly `length` bytes, encrypts and emits it. The length therefore has to
/// be known before the inner record is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptedBlock {
    params: CipherParams,
    length: usize,
}

impl EncryptedBlock {
    /// Block of `length` bytes keyed by `params`
    pub const fn new(params: CipherParams, length: usize) -> Self {
        Self { params, length }
    }

    /// Encrypted region size in bytes
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Decrypt the region and decode it with `decode`
    pub fn read<R, T>(
        &self,
        reader: &mut R,
        decode: impl FnOnce(&mut Cursor<Vec<u8>>) -> BinResult<T>,
    ) -> BinResult<T>
    where
        R: Read + Seek,
    {
        let mut plaintext = vec![0u8; self.length];
        reader.read_exact(&mut plaintext)?;
        XorStreamCipher::new(self.params).apply_keystream(&mut plaintext);

        let mut inner = Cursor::new(plaintext);
        let value = decode(&mut inner)?;

        let consumed = inner.position() as usize;
        if consumed != self.length {
            return raise(
                reader,
                FormatError::LengthMismatch {
                    field: "encrypted block",
                    expected: self.length,
                    actual: consumed,
                },
            );
        }
        Ok(value)
    }

    /// Encode with `encode`, then encrypt and write the region
    pub fn write<W>(
        &self,
        writer: &mut W,
        encode: impl FnOnce(&mut Cursor<Vec<u8>>) -> BinResult<()>,
    ) -> BinResult<()>
    where
        W: Write + Seek,
    {
        let mut inner = Cursor::new(Vec::with_capacity(self.length));
        encode(&mut inner)?;

        let mut ciphertext = inner.into_inner();
        if ciphertext.len() != self.length {
            return raise(
                writer,
                FormatError::LengthMismatch {
                    field: "encrypted block",
                    expected: self.length,
                    actual: ciphertext.len(),
                },
            );
        }
        XorStreamCipher::new(self.params).apply_keystream(&mut ciphertext);
        writer.write_all(&ciphertext)?;
        Ok(())
    }
}
