//! HTTP-Redirect Binding implementation.
//!
//! Implements the SAML 2.0 HTTP-Redirect binding: messages travel in the
//! query string, DEFLATE-compressed (raw, no zlib header) and base64-encoded.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use tidp_crypto::{decode_base64, encode_base64};
use tracing::debug;

use crate::error::{SamlError, SamlResult};
use crate::types::params;

use super::xml_from_utf8;

/// HTTP-Redirect binding encoder/decoder.
pub struct HttpRedirectBinding;

impl HttpRedirectBinding {
    /// Encodes an `AuthnRequest` as a redirect URL to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::Deflate`] if compression fails.
    pub fn encode_request(
        xml: &str,
        destination: &str,
        relay_state: Option<&str>,
    ) -> SamlResult<String> {
        let encoded = encode_base64(deflate_compress(xml.as_bytes())?);

        let separator = if destination.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{}{}{}={}",
            destination,
            separator,
            params::SAML_REQUEST,
            urlencoding::encode(&encoded)
        );

        if let Some(rs) = relay_state {
            url.push_str(&format!("&{}={}", params::RELAY_STATE, urlencoding::encode(rs)));
        }

        Ok(url)
    }

    /// Decodes a `SAMLRequest` query parameter into the request XML.
    ///
    /// Payloads that do not inflate to UTF-8 markup are taken as
    /// uncompressed XML, which some service providers send.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::Base64Decode`] if the value is not base64 and
    /// [`SamlError::InvalidRequest`] if the payload is not UTF-8.
    pub fn decode(saml_request: &str) -> SamlResult<String> {
        // URL decode (may already be done by the web framework)
        let url_decoded = urlencoding::decode(saml_request)
            .map_err(|e| SamlError::InvalidRequest(format!("URL decode error: {e}")))?;

        let compressed = decode_base64(url_decoded.as_bytes())?;

        match deflate_decompress(&compressed) {
            Ok(inflated) if looks_like_xml(&inflated) => xml_from_utf8(inflated),
            Ok(_) | Err(_) => {
                debug!("SAMLRequest did not inflate, treating as uncompressed XML");
                xml_from_utf8(compressed)
            }
        }
    }
}

fn looks_like_xml(bytes: &[u8]) -> bool {
    std::str::from_utf8(bytes).is_ok_and(|s| s.trim_start().starts_with('<'))
}

/// Compresses data using DEFLATE (raw, no zlib header).
fn deflate_compress(data: &[u8]) -> SamlResult<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompresses DEFLATE data.
fn deflate_decompress(data: &[u8]) -> SamlResult<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}
