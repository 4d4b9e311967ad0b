//! Signing certificate embedded in `KeyInfo`.

use std::fmt;

use tidp_crypto::decode_base64;
use tidp_crypto::encoding::pem_body;

use crate::error::{SamlError, SamlResult};

const PEM_LABEL: &str = "CERTIFICATE";

/// Public X.509 certificate body: base64 DER with armour and whitespace removed.
///
/// The body is emitted verbatim as the content of `ds:X509Certificate`.
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate(String);

impl Certificate {
    /// Creates a certificate from a bare base64 DER body.
    ///
    /// Whitespace (including line breaks) is removed.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::MalformedInput`] if the body is empty or not
    /// valid base64.
    pub fn from_base64(body: &str) -> SamlResult<Self> {
        let body: String = body.chars().filter(|c| !c.is_whitespace()).collect();
        if body.is_empty() {
            return Err(SamlError::MalformedInput("certificate is empty".to_string()));
        }
        decode_base64(&body).map_err(|e| {
            SamlError::MalformedInput(format!("certificate is not valid base64: {e}"))
        })?;
        Ok(Self(body))
    }

    /// Creates a certificate from PEM text.
    ///
    /// Text without a `CERTIFICATE` block is treated as a bare body.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::MalformedInput`] if no usable body remains.
    pub fn from_pem(pem: &str) -> SamlResult<Self> {
        match pem_body(pem, PEM_LABEL) {
            Some(body) => Self::from_base64(&body),
            None if pem.contains("-----BEGIN") => Err(SamlError::MalformedInput(
                "PEM does not contain a CERTIFICATE block".to_string(),
            )),
            None => Self::from_base64(pem),
        }
    }

    /// Returns the base64 body.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("body_len", &self.0.len())
            .finish()
    }
}
