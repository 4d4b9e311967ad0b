//! `saml2p:Response` assembly and transport encoding.

use tidp_crypto::{encode_base64, CryptoProvider};
use tracing::{debug, info};

use crate::error::SamlResult;
use crate::signature::XmlSigner;
use crate::template::{render, XmlFragment};
use crate::types::{
    name_id_formats, status_codes, AssertionData, Certificate, SAMLP_NS, SAML_NS, SAML_VERSION,
};

/// Builds a `saml2p:Status` carrying the success status code.
#[must_use]
pub fn build_status_success() -> XmlFragment {
    render(
        &[
            r#"<saml2p:Status>
              <saml2p:StatusCode Value=""#,
            r#""></saml2p:StatusCode>
            </saml2p:Status>"#,
        ],
        &[status_codes::SUCCESS.into()],
    )
}

/// Wraps a signed assertion in a `saml2p:Response` addressed to the SP's ACS.
#[must_use]
pub fn build_response(data: &AssertionData, assertion: &XmlFragment) -> XmlFragment {
    let status = build_status_success();
    let issue_instant = data.issue_instant();

    render(
        &[
            r#"<saml2p:Response xmlns:saml2p=""#,
            r#"" Destination=""#,
            r#"" ID=""#,
            r#"" InResponseTo=""#,
            r#"" IssueInstant=""#,
            r#"" Version=""#,
            r#"">
              <saml2:Issuer xmlns:saml2=""#,
            r#"" Format=""#,
            r#"">"#,
            r#"</saml2:Issuer>
              "#,
            r#"
              "#,
            r#"
            </saml2p:Response>"#,
        ],
        &[
            SAMLP_NS.into(),
            data.sp_acs_url().into(),
            data.response_id().into(),
            data.session_id().into(),
            (&issue_instant).into(),
            SAML_VERSION.into(),
            SAML_NS.into(),
            name_id_formats::ENTITY.into(),
            data.idp_entity_id().into(),
            (&status).into(),
            assertion.into(),
        ],
    )
}

/// Produces the base64 `SAMLResponse` value for `data`.
///
/// Builds the assertion, signs it with `key`, wraps it in a `Response` and
/// base64-encodes the UTF-8 document.
///
/// # Errors
///
/// Returns an error if the provider fails to digest or sign.
pub fn encode_assertion<P: CryptoProvider>(
    provider: &P,
    key: &P::Key,
    certificate: &Certificate,
    data: &AssertionData,
) -> SamlResult<String> {
    let signed = XmlSigner::new(provider, key, certificate).sign(data)?;
    let response = build_response(data, &signed.assertion);
    debug!(
        response_id = data.response_id(),
        bytes = response.as_bytes().len(),
        "assembled response"
    );

    info!(
        assertion_id = data.assertion_id(),
        response_id = data.response_id(),
        in_response_to = data.session_id(),
        audience = data.sp_entity_id(),
        "issued signed SAML response"
    );
    Ok(encode_base64(response.as_bytes()))
}
