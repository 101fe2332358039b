//! Error types for cryptographic operations

use thiserror::Error;

/// Errors that can occur when setting up a cipher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The modulus parameter `c` was zero
    #[error("Invalid cipher parameters: modulus 'c' must be non-zero")]
    ZeroModulus,
}
