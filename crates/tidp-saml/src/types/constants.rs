//! SAML 2.0 and XML-DSig constants.
//!
//! Every URI emitted by the signing pipeline is defined here. Relying parties
//! compare these byte-for-byte, so they must never be built dynamically.

/// SAML 2.0 assertion namespace URI (`saml2` prefix).
pub const SAML_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// SAML 2.0 protocol namespace URI (`saml2p` prefix).
pub const SAMLP_NS: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// XML Digital Signature namespace URI (`ds` prefix).
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// SAML protocol version emitted on every message.
pub const SAML_VERSION: &str = "2.0";

// ============================================================================
// Name ID formats
// ============================================================================

/// Name ID format URIs.
pub mod name_id_formats {
    /// Unspecified name ID format (used for the subject `NameID`).
    pub const UNSPECIFIED: &str = "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified";

    /// Entity identifier format (used for `Issuer`).
    pub const ENTITY: &str = "urn:oasis:names:tc:SAML:2.0:nameid-format:entity";
}

// ============================================================================
// Subject confirmation
// ============================================================================

/// Bearer subject confirmation method.
pub const CM_BEARER: &str = "urn:oasis:names:tc:SAML:2.0:cm:bearer";

// ============================================================================
// Status codes
// ============================================================================

/// Top-level status code URIs.
pub mod status_codes {
    /// Request succeeded.
    pub const SUCCESS: &str = "urn:oasis:names:tc:SAML:2.0:status:Success";

    /// Request could not be performed due to an error on the requester's side.
    pub const REQUESTER: &str = "urn:oasis:names:tc:SAML:2.0:status:Requester";

    /// Request could not be performed due to an error on the responder's side.
    pub const RESPONDER: &str = "urn:oasis:names:tc:SAML:2.0:status:Responder";

    /// The principal is unknown to the responder.
    pub const UNKNOWN_PRINCIPAL: &str = "urn:oasis:names:tc:SAML:2.0:status:UnknownPrincipal";
}

// ============================================================================
// XML-DSig algorithms
// ============================================================================

/// Signature method URIs.
pub mod signature_algorithms {
    /// RSA PKCS#1 v1.5 with SHA-256.
    pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
}

/// Digest method URIs.
pub mod digest_algorithms {
    /// SHA-256.
    pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
}

/// Canonicalization method URIs.
pub mod canonicalization_algorithms {
    /// Exclusive XML canonicalization without comments.
    pub const EXCLUSIVE_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
}

/// Reference transform URIs.
pub mod transforms {
    /// Enveloped signature transform.
    pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";
}

// ============================================================================
// Bindings
// ============================================================================

/// Form/query parameter names used by the HTTP bindings.
pub mod params {
    /// Parameter carrying an encoded `AuthnRequest`.
    pub const SAML_REQUEST: &str = "SAMLRequest";

    /// Parameter carrying an encoded `Response`.
    pub const SAML_RESPONSE: &str = "SAMLResponse";

    /// Opaque state echoed back to the service provider.
    pub const RELAY_STATE: &str = "RelayState";
}
