//! Keyed XOR stream cipher for Across data files
//!
//! Across hides two sensitive regions of its files behind a small keyed XOR
//! stream: the top-scores table at the end of a level and the file table of
//! the resource archive. The keystream is driven by four integer parameters
//! and a 16-bit feedback register, so applying the cipher twice with the same
//! parameters restores the original bytes.
//!
//! # Example
//!
//! ```
//! use across_crypto::{XorStreamCipher, LEVEL_TOP_SCORES};
//!
//! let plaintext = b"Jappe 1:23:45";
//! let ciphertext = XorStreamCipher::new(LEVEL_TOP_SCORES).encrypt(plaintext);
//! let decrypted = XorStreamCipher::new(LEVEL_TOP_SCORES).decrypt(&ciphertext);
//! assert_eq!(&decrypted[..], plaintext);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod stream;

pub use error::CryptoError;
pub use stream::{CipherParams, LEVEL_TOP_SCORES, RESOURCE_TABLE, XorStreamCipher, signed_mod};
