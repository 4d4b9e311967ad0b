//! Injectable cryptographic capability.
//!
//! The signing pipeline never calls aws-lc-rs directly. It asks a
//! [`CryptoProvider`] for digests, signatures and random bytes, which lets
//! tests run the full pipeline against a deterministic fake.

use crate::error::CryptoError;
use crate::hash::sha256;
use crate::random::{format_id, random_bytes, ID_ENTROPY_BYTES};
use crate::rsa::RsaSigningKey;

/// Digest, sign and random-generation capability.
pub trait CryptoProvider: Send + Sync {
    /// Private key handle accepted by [`CryptoProvider::sign`].
    type Key: Send + Sync;

    /// Computes the SHA-256 digest of `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying primitive fails.
    fn digest(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Signs `data` with RSASSA-PKCS1-v1.5 / SHA-256.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unusable or signing fails.
    fn sign(&self, key: &Self::Key, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Returns `len` unguessable random bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the random source fails.
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, CryptoError>;

    /// Generates an XML identifier (`_` + hex) from [`CryptoProvider::random_bytes`].
    ///
    /// # Errors
    ///
    /// Returns an error if the random source fails.
    fn new_random_id(&self) -> Result<String, CryptoError> {
        Ok(format_id(&self.random_bytes(ID_ENTROPY_BYTES)?))
    }
}

/// Production provider backed by aws-lc-rs and the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsLcProvider;

impl CryptoProvider for AwsLcProvider {
    type Key = RsaSigningKey;

    fn digest(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(sha256(data))
    }

    fn sign(&self, key: &RsaSigningKey, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        key.sign(data)
    }

    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, CryptoError> {
        Ok(random_bytes(len))
    }
}
