//! Signed SAML 2.0 responses for a test identity provider.
//!
//! This crate builds the `Response` an identity provider posts back to a
//! service provider after authenticating a user:
//!
//! - **Template engine** - deterministic, whitespace-normalized XML
//! - **Assertion builder** - subject, conditions and attribute statement
//! - **Signature builder** - enveloped XML-DSig over the assertion
//! - **Response assembler** - `Response` envelope and base64 transport encoding
//! - **Bindings** - decoding incoming `AuthnRequest`s and the POST form for responses
//!
//! # Example
//!
//! ```rust,ignore
//! use tidp_crypto::AwsLcProvider;
//! use tidp_saml::{encode_assertion, AssertionData, Certificate};
//!
//! let data = AssertionData::builder()
//!     .assertion_id(provider.new_random_id()?)
//!     // ...
//!     .build()?;
//! let saml_response = encode_assertion(&AwsLcProvider, &key, &certificate, &data)?;
//! ```
//!
//! # Specifications
//!
//! - [SAML 2.0 Core](https://docs.oasis-open.org/security/saml/v2.0/saml-core-2.0-os.pdf)
//! - [SAML 2.0 Bindings](https://docs.oasis-open.org/security/saml/v2.0/saml-bindings-2.0-os.pdf)
//! - [XML Signature](https://www.w3.org/TR/xmldsig-core1/)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assertion;
pub mod authn_request;
pub mod bindings;
pub mod error;
pub mod response;
pub mod signature;
pub mod template;
pub mod types;

#[cfg(test)]
mod test_support;

pub use assertion::build_assertion;
pub use authn_request::{parse_authn_request, AuthnRequestInfo};
pub use error::{SamlError, SamlResult};
pub use response::{build_response, build_status_success, encode_assertion};
pub use signature::{SignedAssertion, XmlSigner};
pub use template::{normalize, render, Value, XmlFragment};
pub use types::*;
