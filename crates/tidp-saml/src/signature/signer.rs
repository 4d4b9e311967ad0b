//! Enveloped XML-DSig signature creation.
//!
//! The assertion is signed in two passes: it is rendered once without a
//! signature and digested, then `SignedInfo` is built around that digest and
//! signed, and finally the assertion is rendered again with the `Signature`
//! inserted after its `Issuer`. Both renders come from the same template, so
//! the digested bytes are exactly the signed assertion minus its
//! `Signature` element.

use tidp_crypto::{encode_base64, CryptoProvider};
use tracing::debug;

use crate::assertion::build_assertion;
use crate::error::SamlResult;
use crate::template::{render, XmlFragment};
use crate::types::{
    canonicalization_algorithms, digest_algorithms, signature_algorithms, transforms,
    AssertionData, Certificate, XMLDSIG_NS,
};

/// Intermediate and final products of signing one assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAssertion {
    /// Assertion as digested (no `Signature` element).
    pub unsigned: XmlFragment,
    /// Base64 SHA-256 digest of `unsigned`.
    pub digest_value: String,
    /// The `ds:SignedInfo` element whose bytes were signed.
    pub signed_info: XmlFragment,
    /// Base64 RSA-SHA256 signature over `signed_info`.
    pub signature_value: String,
    /// The complete `ds:Signature` element.
    pub signature: XmlFragment,
    /// Assertion with `signature` embedded.
    pub assertion: XmlFragment,
}

/// Signs assertions with a provider-held key.
pub struct XmlSigner<'a, P: CryptoProvider> {
    provider: &'a P,
    key: &'a P::Key,
    certificate: &'a Certificate,
}

impl<'a, P: CryptoProvider> XmlSigner<'a, P> {
    /// Creates a signer.
    pub fn new(provider: &'a P, key: &'a P::Key, certificate: &'a Certificate) -> Self {
        Self {
            provider,
            key,
            certificate,
        }
    }

    /// Builds and signs the assertion for `data`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SamlError::CryptoProviderFailure`] or
    /// [`crate::SamlError::InvalidKey`] if digesting or signing fails.
    pub fn sign(&self, data: &AssertionData) -> SamlResult<SignedAssertion> {
        let unsigned = build_assertion(data, None);
        let digest_value = encode_base64(self.provider.digest(unsigned.as_bytes())?);
        debug!(
            assertion_id = data.assertion_id(),
            digest = %digest_value,
            "digested unsigned assertion"
        );

        let signed_info = build_signed_info(data.assertion_id(), &digest_value);
        let signature_value =
            encode_base64(self.provider.sign(self.key, signed_info.as_bytes())?);
        debug!(assertion_id = data.assertion_id(), "signed SignedInfo");

        let key_info = build_key_info(self.certificate);
        let signature = build_signature(&signed_info, &signature_value, &key_info);
        let assertion = build_assertion(data, Some(&signature));

        Ok(SignedAssertion {
            unsigned,
            digest_value,
            signed_info,
            signature_value,
            signature,
            assertion,
        })
    }
}

/// Builds `ds:SignedInfo` referencing the element with ID `reference_id`.
#[must_use]
pub fn build_signed_info(reference_id: &str, digest_value: &str) -> XmlFragment {
    let reference_uri = format!("#{reference_id}");
    render(
        &[
            r#"<ds:SignedInfo xmlns:ds=""#,
            r#"">
              <ds:CanonicalizationMethod Algorithm=""#,
            r#""></ds:CanonicalizationMethod>
              <ds:SignatureMethod Algorithm=""#,
            r#""></ds:SignatureMethod>
              <ds:Reference URI=""#,
            r#"">
                <ds:Transforms>
                  <ds:Transform Algorithm=""#,
            r#""></ds:Transform>
                  <ds:Transform Algorithm=""#,
            r#""></ds:Transform>
                </ds:Transforms>
                <ds:DigestMethod Algorithm=""#,
            r#""></ds:DigestMethod>
                <ds:DigestValue>"#,
            r#"</ds:DigestValue>
              </ds:Reference>
            </ds:SignedInfo>"#,
        ],
        &[
            XMLDSIG_NS.into(),
            canonicalization_algorithms::EXCLUSIVE_C14N.into(),
            signature_algorithms::RSA_SHA256.into(),
            (&reference_uri).into(),
            transforms::ENVELOPED_SIGNATURE.into(),
            canonicalization_algorithms::EXCLUSIVE_C14N.into(),
            digest_algorithms::SHA256.into(),
            digest_value.into(),
        ],
    )
}

/// Builds `ds:KeyInfo` carrying the signing certificate.
#[must_use]
pub fn build_key_info(certificate: &Certificate) -> XmlFragment {
    render(
        &[
            r#"<ds:KeyInfo xmlns:ds=""#,
            r#"">
              <ds:X509Data>
                <ds:X509Certificate>
                  "#,
            r#"
                </ds:X509Certificate>
              </ds:X509Data>
            </ds:KeyInfo>"#,
        ],
        &[XMLDSIG_NS.into(), certificate.as_str().into()],
    )
}

/// Assembles the `ds:Signature` element.
#[must_use]
pub fn build_signature(
    signed_info: &XmlFragment,
    signature_value: &str,
    key_info: &XmlFragment,
) -> XmlFragment {
    render(
        &[
            r#"<ds:Signature xmlns:ds=""#,
            r#"">
              "#,
            r#"
              <ds:SignatureValue>"#,
            r#"</ds:SignatureValue>
              "#,
            r#"
            </ds:Signature>"#,
        ],
        &[
            XMLDSIG_NS.into(),
            signed_info.into(),
            signature_value.into(),
            key_info.into(),
        ],
    )
}
