//! Cryptographically secure random generation.
//!
//! XML `ID` attributes in SAML messages must be unguessable and must be
//! valid `xs:ID` values, which cannot start with a digit.

use std::fmt::Write;

use rand::Rng;

/// Number of random bytes behind every generated XML identifier.
pub const ID_ENTROPY_BYTES: usize = 20;

/// Generates `len` cryptographically secure random bytes.
///
/// Uses the thread-local generator, which is cryptographically secure and
/// reseeded from the operating system.
#[must_use]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes[..]);
    bytes
}

/// Formats random bytes as an XML identifier: `_` followed by lowercase hex.
#[must_use]
pub fn format_id(bytes: &[u8]) -> String {
    let mut id = String::with_capacity(1 + bytes.len() * 2);
    id.push('_');
    for b in bytes {
        // Writing to a String cannot fail.
        let _ = write!(id, "{b:02x}");
    }
    id
}
