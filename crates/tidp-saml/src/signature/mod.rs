//! XML Signature support for SAML.
//!
//! Assertions are signed with an enveloped XML-DSig signature using a fixed
//! suite: exclusive C14N as the declared canonicalization, RSA-SHA256 as the
//! signature method and SHA-256 as the digest method.
//!
//! No canonicalization is actually performed. The digest is taken over the
//! template engine's normalized output, which is emitted in canonical form:
//! no comments, no self-closing tags, attributes in canonical order and only
//! the character references C14N itself writes (see [`crate::template`]).
//! A relying party that canonicalizes the received assertion therefore
//! arrives at the same bytes.

mod signer;

pub use signer::*;
