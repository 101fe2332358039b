//! Four-parameter XOR stream cipher with 16-bit feedback.
//!
//! The keystream is defined by a parameter tuple `(a, b, c, d)`:
//!
//! - the first byte is XORed with `a`
//! - a signed 16-bit register starts at `(b + a * c) * d + c`
//! - every later byte is XORed with the low 8 bits of the register, after
//!   which the register advances by `signed_mod(x, c) * c * d`
//!
//! Only the low 16 bits of the register ever influence the output, so the
//! register is kept as an `i16` and all arithmetic wraps.
//!
//! ## Usage
//!
//! ```rust
//! use across_crypto::stream::{CipherParams, XorStreamCipher};
//!
//! let params = CipherParams::new(21, 9783, 3389, 31).expect("non-zero modulus");
//!
//! let mut data = b"top secret".to_vec();
//! XorStreamCipher::new(params).apply_keystream(&mut data);
//! assert_ne!(&data[..], b"top secret");
//!
//! // Same parameters, fresh cipher: back to plaintext
//! XorStreamCipher::new(params).apply_keystream(&mut data);
//! assert_eq!(&data[..], b"top secret");
//! ```

use crate::error::CryptoError;

/// Parameters protecting the level top-scores block
pub const LEVEL_TOP_SCORES: CipherParams = CipherParams {
    a: 21,
    b: 9783,
    c: 3389,
    d: 31,
};

/// Parameters protecting the resource archive file table
pub const RESOURCE_TABLE: CipherParams = CipherParams {
    a: 23,
    b: 9782,
    c: 3391,
    d: 31,
};

/// Key of the XOR stream cipher.
///
/// The modulus `c` is guaranteed to be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CipherParams {
    a: i32,
    b: i32,
    c: i32,
    d: i32,
}

impl CipherParams {
    /// Create a parameter tuple.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::ZeroModulus`] if `c` is zero.
    pub fn new(a: i32, b: i32, c: i32, d: i32) -> Result<Self, CryptoError> {
        if c == 0 {
            return Err(CryptoError::ZeroModulus);
        }
        Ok(Self { a, b, c, d })
    }

    /// The `(a, b, c, d)` tuple
    pub fn as_tuple(self) -> (i32, i32, i32, i32) {
        (self.a, self.b, self.c, self.d)
    }

    fn initial_register(self) -> i16 {
        let (a, b, c, d) = (
            i64::from(self.a),
            i64::from(self.b),
            i64::from(self.c),
            i64::from(self.d),
        );
        b.wrapping_add(a.wrapping_mul(c))
            .wrapping_mul(d)
            .wrapping_add(c) as i16
    }
}

/// Sign-preserving remainder of a 16-bit register value.
///
/// The register is interpreted as two's complement. For a positive `c`, a
/// non-negative value yields a result in `[0, c)` and a negative one a result
/// in `[-c, 0)`, so exact negative multiples of `c` map to `-c`.
pub fn signed_mod(x: i16, c: i32) -> i64 {
    let unsigned = i64::from(x as u16);
    let c = i64::from(c);
    if c == 0 {
        return 0;
    }
    let r = floor_mod(unsigned, c);
    if x < 0 {
        -c + floor_mod(r - 0x10000, c)
    } else {
        r
    }
}

/// Remainder carrying the sign of the divisor
fn floor_mod(x: i64, m: i64) -> i64 {
    let r = x % m;
    if r != 0 && (r < 0) != (m < 0) {
        r + m
    } else {
        r
    }
}

/// Stateful XOR stream cipher.
///
/// Encryption and decryption are the same operation. A cipher instance keeps
/// its position, so a block may be processed in several calls; use a fresh
/// instance for every independent block.
#[derive(Debug, Clone)]
pub struct XorStreamCipher {
    params: CipherParams,
    register: i16,
    started: bool,
}

impl XorStreamCipher {
    /// Create a cipher positioned at the start of a block
    pub fn new(params: CipherParams) -> Self {
        Self {
            params,
            register: params.initial_register(),
            started: false,
        }
    }

    /// Parameters this cipher was created with
    pub fn params(&self) -> CipherParams {
        self.params
    }

    fn next_keystream_byte(&mut self) -> u8 {
        if !self.started {
            self.started = true;
            return self.params.a as u8;
        }

        let key = self.register as u8;
        let step = signed_mod(self.register, self.params.c)
            .wrapping_mul(i64::from(self.params.c))
            .wrapping_mul(i64::from(self.params.d));
        self.register = i64::from(self.register).wrapping_add(step) as i16;
        key
    }

    /// XOR the keystream into `data` in place
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data {
            *byte ^= self.next_keystream_byte();
        }
    }

    /// Encrypt `data` into a new buffer
    pub fn encrypt(&mut self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .map(|&byte| byte ^ self.next_keystream_byte())
            .collect()
    }

    /// Decrypt `data` into a new buffer.
    ///
    /// Identical to [`encrypt`](Self::encrypt).
    pub fn decrypt(&mut self, data: &[u8]) -> Vec<u8> {
        self.encrypt(data)
    }
}
