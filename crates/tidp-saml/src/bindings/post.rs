//! HTTP-POST Binding implementation.
//!
//! Implements the SAML 2.0 HTTP-POST binding for sending SAML messages
//! via HTML form POST.

use tidp_crypto::decode_base64;

use crate::error::SamlResult;
use crate::types::params;

use super::xml_from_utf8;

/// HTTP-POST binding encoder/decoder.
pub struct HttpPostBinding;

impl HttpPostBinding {
    /// Builds the auto-submitting form that delivers a response to the SP.
    ///
    /// `saml_response` is the already base64-encoded `Response` document.
    #[must_use]
    pub fn response_form(saml_response: &str, destination: &str, relay_state: Option<&str>) -> String {
        let relay_state_input = relay_state
            .map(|rs| {
                format!(
                    r#"<input type="hidden" name="{}" value="{}"/>"#,
                    params::RELAY_STATE,
                    html_escape(rs)
                )
            })
            .unwrap_or_default();

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Signing you in</title>
</head>
<body onload="document.forms[0].submit()">
    <noscript>
        <p>JavaScript is disabled. Click the button below to continue.</p>
    </noscript>
    <form method="post" action="{}">
        <input type="hidden" name="{}" value="{}"/>
        {}
        <noscript>
            <input type="submit" value="Continue"/>
        </noscript>
    </form>
</body>
</html>"#,
            html_escape(destination),
            params::SAML_RESPONSE,
            html_escape(saml_response),
            relay_state_input
        )
    }

    /// Decodes a `SAMLRequest` form value into the request XML.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SamlError::Base64Decode`] if the value is not base64
    /// and [`crate::SamlError::InvalidRequest`] if the payload is not UTF-8.
    pub fn decode(saml_request: &str) -> SamlResult<String> {
        // Form posts may wrap the value across lines.
        let compact: String = saml_request.chars().filter(|c| !c.is_whitespace()).collect();
        xml_from_utf8(decode_base64(compact)?)
    }
}

/// Escapes HTML special characters.
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
