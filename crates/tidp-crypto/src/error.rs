//! Error type for cryptographic operations.

use thiserror::Error;

/// Error type for cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The key material could not be parsed or is not an RSA key.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The signing primitive failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Input was not valid standard base64.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// The system random source failed.
    #[error("random generation failed: {0}")]
    Random(String),
}

impl From<base64::DecodeError> for CryptoError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64Decode(err.to_string())
    }
}
