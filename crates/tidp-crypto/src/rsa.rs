//! RSA signing keys.
//!
//! Signatures are RSASSA-PKCS1-v1.5 over SHA-256, the `rsa-sha256` method
//! that XML-DSig relying parties are expected to accept. PKCS#1 v1.5 padding
//! is deterministic: signing the same bytes with the same key always yields
//! the same signature.

use std::fmt;

use aws_lc_rs::{
    rand::SystemRandom,
    signature::{self, KeyPair, RsaKeyPair, UnparsedPublicKey, RSA_PKCS1_2048_8192_SHA256},
};

use crate::encoding::pem_to_der;
use crate::error::CryptoError;

/// An RSA private key used only for producing signatures.
///
/// The key material is never serialized or exposed; `Debug` prints only the
/// modulus size.
pub struct RsaSigningKey {
    key_pair: RsaKeyPair,
}

impl RsaSigningKey {
    /// Creates a signing key from a PKCS#8 DER-encoded private key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if the DER is not an RSA PKCS#8 key.
    pub fn from_pkcs8(pkcs8_der: &[u8]) -> Result<Self, CryptoError> {
        let key_pair = RsaKeyPair::from_pkcs8(pkcs8_der)
            .map_err(|e| CryptoError::InvalidKey(format!("Invalid RSA PKCS#8 key: {e}")))?;
        Ok(Self { key_pair })
    }

    /// Creates a signing key from a PKCS#1 (`RSAPrivateKey`) DER-encoded key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if the DER is not an RSA key.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let key_pair = RsaKeyPair::from_der(der)
            .map_err(|e| CryptoError::InvalidKey(format!("Invalid RSA DER key: {e}")))?;
        Ok(Self { key_pair })
    }

    /// Creates a signing key from a PEM document.
    ///
    /// Accepts both `PRIVATE KEY` (PKCS#8) and `RSA PRIVATE KEY` (PKCS#1)
    /// armour.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if no RSA key block is found or the
    /// key inside it is not usable for RSA signing.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        if let Some(der) = pem_to_der(pem, "PRIVATE KEY") {
            return Self::from_pkcs8(&der);
        }
        if let Some(der) = pem_to_der(pem, "RSA PRIVATE KEY") {
            return Self::from_der(&der);
        }
        Err(CryptoError::InvalidKey(
            "no PRIVATE KEY or RSA PRIVATE KEY block in PEM".to_string(),
        ))
    }

    /// Returns the modulus size in bits.
    #[must_use]
    pub fn modulus_bits(&self) -> usize {
        self.key_pair.public_modulus_len() * 8
    }

    /// Returns the public key as PKCS#1 `RSAPublicKey` DER.
    #[must_use]
    pub fn public_key_der(&self) -> Vec<u8> {
        self.key_pair.public_key().as_ref().to_vec()
    }

    /// Signs `data` with RSASSA-PKCS1-v1.5 / SHA-256.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Signing`] if the primitive fails.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let rng = SystemRandom::new();
        let mut sig = vec![0u8; self.key_pair.public_modulus_len()];

        self.key_pair
            .sign(&signature::RSA_PKCS1_SHA256, &rng, data, &mut sig)
            .map_err(|e| CryptoError::Signing(format!("RSA signing failed: {e}")))?;

        Ok(sig)
    }
}

impl fmt::Debug for RsaSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigningKey")
            .field("modulus_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

/// Verifies an RSASSA-PKCS1-v1.5 / SHA-256 signature.
///
/// `public_key_der` is a PKCS#1 `RSAPublicKey` as returned by
/// [`RsaSigningKey::public_key_der`].
#[must_use]
pub fn rsa_verify_sha256(public_key_der: &[u8], data: &[u8], sig: &[u8]) -> bool {
    UnparsedPublicKey::new(&RSA_PKCS1_2048_8192_SHA256, public_key_der)
        .verify(data, sig)
        .is_ok()
}
