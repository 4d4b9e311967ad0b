//! # tidp-crypto
//!
//! Cryptographic primitives for the test identity provider, backed by aws-lc-rs.
//!
//! ## Algorithms
//!
//! SAML 2.0 relying parties overwhelmingly expect RSA-SHA256 signatures, so
//! this crate deliberately exposes a single fixed suite:
//!
//! - **Digest** - SHA-256
//! - **Signature** - RSASSA-PKCS1-v1.5 with SHA-256
//! - **Transport encoding** - standard base64 (padded, not URL-safe)
//!
//! Everything the signing pipeline needs is reachable through the
//! [`CryptoProvider`] trait so that callers can swap in a deterministic
//! provider under test.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod encoding;
pub mod error;
pub mod hash;
pub mod provider;
pub mod random;
pub mod rsa;

pub use encoding::{decode_base64, encode_base64};
pub use error::CryptoError;
pub use hash::sha256;
pub use provider::{AwsLcProvider, CryptoProvider};
pub use random::random_bytes;
pub use rsa::{rsa_verify_sha256, RsaSigningKey};
