//! `saml2:Assertion` construction.

use crate::template::{render, XmlFragment};
use crate::types::{name_id_formats, AssertionData, CM_BEARER, SAML_NS, SAML_VERSION};

/// Builds the `saml2:Assertion` element.
///
/// With `signature == None` this is the unsigned form that gets digested.
/// With a signature, the output is byte-identical except for the
/// `ds:Signature` element inserted right after `saml2:Issuer`.
#[must_use]
pub fn build_assertion(data: &AssertionData, signature: Option<&XmlFragment>) -> XmlFragment {
    let no_signature = XmlFragment::empty();
    let signature = signature.unwrap_or(&no_signature);
    let issue_instant = data.issue_instant();
    let not_on_or_after = data.not_on_or_after();

    render(
        &[
            r#"<saml2:Assertion xmlns:saml2=""#,
            r#"" ID=""#,
            r#"" IssueInstant=""#,
            r#"" Version=""#,
            r#"">
              <saml2:Issuer Format=""#,
            r#"">"#,
            r#"</saml2:Issuer>
              "#,
            r#"
              <saml2:Subject>
                <saml2:NameID Format=""#,
            r#"">"#,
            r#"</saml2:NameID>
                <saml2:SubjectConfirmation Method=""#,
            r#"">
                  <saml2:SubjectConfirmationData InResponseTo=""#,
            r#"" NotOnOrAfter=""#,
            r#"" Recipient=""#,
            r#""></saml2:SubjectConfirmationData>
                </saml2:SubjectConfirmation>
              </saml2:Subject>
              <saml2:Conditions NotBefore=""#,
            r#"" NotOnOrAfter=""#,
            r#"">
                <saml2:AudienceRestriction><saml2:Audience>"#,
            r#"</saml2:Audience></saml2:AudienceRestriction>
              </saml2:Conditions>
              <saml2:AttributeStatement>
                <saml2:Attribute Name="email"><saml2:AttributeValue>"#,
            r#"</saml2:AttributeValue></saml2:Attribute>
                <saml2:Attribute Name="firstName"><saml2:AttributeValue>"#,
            r#"</saml2:AttributeValue></saml2:Attribute>
                <saml2:Attribute Name="lastName"><saml2:AttributeValue>"#,
            r#"</saml2:AttributeValue></saml2:Attribute>
              </saml2:AttributeStatement>
            </saml2:Assertion>"#,
        ],
        &[
            SAML_NS.into(),
            data.assertion_id().into(),
            (&issue_instant).into(),
            SAML_VERSION.into(),
            name_id_formats::ENTITY.into(),
            data.idp_entity_id().into(),
            signature.into(),
            name_id_formats::UNSPECIFIED.into(),
            data.subject_id().into(),
            CM_BEARER.into(),
            data.session_id().into(),
            (&not_on_or_after).into(),
            data.sp_acs_url().into(),
            (&issue_instant).into(),
            (&not_on_or_after).into(),
            data.sp_entity_id().into(),
            data.subject_id().into(),
            data.first_name().into(),
            data.last_name().into(),
        ],
    )
}
