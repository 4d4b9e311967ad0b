//! Standard base64 transport encoding.
//!
//! SAML bindings use the standard alphabet with padding; URL-safe variants
//! are not accepted by relying parties for `SAMLResponse` values.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::CryptoError;

/// Encodes bytes as standard, padded base64.
#[must_use]
pub fn encode_base64(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(data)
}

/// Decodes standard base64.
///
/// # Errors
///
/// Returns [`CryptoError::Base64Decode`] if the input is not valid base64.
pub fn decode_base64(encoded: impl AsRef<[u8]>) -> Result<Vec<u8>, CryptoError> {
    Ok(STANDARD.decode(encoded)?)
}

/// Returns the base64 body of the first PEM block with the given label.
///
/// Whitespace inside the body is removed. Returns `None` if no such block
/// exists.
#[must_use]
pub fn pem_body(pem: &str, label: &str) -> Option<String> {
    let begin = format!("-----BEGIN {label}-----");
    let end = format!("-----END {label}-----");

    let start = pem.find(&begin)? + begin.len();
    let end_pos = start + pem[start..].find(&end)?;

    Some(
        pem[start..end_pos]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect(),
    )
}

/// Extracts and decodes the DER payload of a PEM block.
#[must_use]
pub fn pem_to_der(pem: &str, label: &str) -> Option<Vec<u8>> {
    pem_body(pem, label).and_then(|body| STANDARD.decode(body).ok())
}
