//! SAML error types.
//!
//! Every failure in the signing pipeline is surfaced synchronously as a
//! [`SamlError`]. Nothing is retried: all primitives are deterministic, so a
//! failing call fails identically on retry.

use thiserror::Error;

use tidp_crypto::CryptoError;

use crate::types::status_codes;

/// Result type for SAML operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// SAML protocol errors.
#[derive(Debug, Error)]
pub enum SamlError {
    /// The signing key is unusable or of the wrong algorithm family.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    /// The digest, signing or random primitive failed.
    #[error("crypto provider failure: {0}")]
    CryptoProviderFailure(String),

    /// A required assertion field or the certificate is missing or malformed.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Invalid incoming SAML request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Base64 decoding error.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// Deflate decompression error.
    #[error("deflate error: {0}")]
    Deflate(String),

    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// No application is registered under the requested id.
    #[error("unknown application: {0}")]
    UnknownApp(String),
}

impl SamlError {
    /// Returns the SAML status code for this error.
    #[must_use]
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_)
            | Self::Base64Decode(_)
            | Self::Deflate(_)
            | Self::XmlParse(_) => status_codes::REQUESTER,
            Self::UnknownApp(_) => status_codes::UNKNOWN_PRINCIPAL,
            _ => status_codes::RESPONDER,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest(_)
            | Self::MalformedInput(_)
            | Self::Base64Decode(_)
            | Self::Deflate(_)
            | Self::XmlParse(_) => 400,
            Self::UnknownApp(_) => 404,
            Self::InvalidKey(_) | Self::CryptoProviderFailure(_) => 500,
        }
    }
}

impl From<CryptoError> for SamlError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidKey(msg) => Self::InvalidKey(msg),
            CryptoError::Base64Decode(msg) => Self::Base64Decode(msg),
            CryptoError::Signing(_) | CryptoError::Random(_) => {
                Self::CryptoProviderFailure(err.to_string())
            }
        }
    }
}

impl From<std::io::Error> for SamlError {
    fn from(err: std::io::Error) -> Self {
        Self::Deflate(err.to_string())
    }
}

impl From<quick_xml::Error> for SamlError {
    fn from(err: quick_xml::Error) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for SamlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::XmlParse(err.to_string())
    }
}
