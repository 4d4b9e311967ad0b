//! SAML endpoint integration tests.
//!
//! Tests for the SSO and login endpoints, including verification
//! of the signed responses the IdP hands to the service provider.

use reqwest::StatusCode;
use tidp_crypto::{decode_base64, encode_base64, rsa_verify_sha256, sha256};
use tidp_saml::bindings::HttpRedirectBinding;

use crate::common::{element, hidden_field, test_public_key, text_of, TestEnv};

const AUTHN_REQUEST: &str = r#"<samlp:AuthnRequest xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="_req123" Version="2.0" IssueInstant="2024-01-01T00:00:00Z" AssertionConsumerServiceURL="https://sp.example.com/acs"><saml:Issuer>https://sp.example.com</saml:Issuer></samlp:AuthnRequest>"#;

/// Submits the login form and returns the decoded `Response` document and
/// the auto-post page it came in.
async fn login(
    env: &TestEnv,
    saml_request: Option<&str>,
    relay_state: Option<&str>,
) -> anyhow::Result<(String, String)> {
    let mut form = vec![
        ("email", "alice@example.com"),
        ("first_name", "Alice"),
        ("last_name", "O'Brien"),
    ];
    if let Some(req) = saml_request {
        form.push(("SAMLRequest", req));
    }
    if let Some(rs) = relay_state {
        form.push(("RelayState", rs));
    }

    let response = env
        .client
        .post(env.app_url("demo", "login"))
        .form(&form)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let html = response.text().await?;
    let encoded = hidden_field(&html, "SAMLResponse")
        .ok_or_else(|| anyhow::anyhow!("no SAMLResponse in auto-post form"))?;
    let xml = String::from_utf8(decode_base64(encoded)?)?;
    Ok((xml, html))
}

/// Tests the health endpoint.
#[tokio::test]
async fn test_health() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .client
        .get(format!("{}/health", env.base_url))
        .send()
        .await?;
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "UP");

    Ok(())
}

/// Tests that the index lists the demo app with its endpoints.
#[tokio::test]
async fn test_index_lists_apps() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let apps: serde_json::Value = env.client.get(&env.base_url).send().await?.json().await?;
    let demo = &apps[0];
    assert_eq!(demo["id"], "demo");
    assert_eq!(demo["sso_url"], env.app_url("demo", "sso"));
    assert_eq!(demo["idp_entity_id"], format!("{}/apps/demo", env.base_url));

    Ok(())
}

/// Tests that every per-app endpoint answers 404 for an unknown app.
#[tokio::test]
async fn test_unknown_app() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    for endpoint in ["sso", "login"] {
        let response = env.client.get(env.app_url("nonexistent", endpoint)).send().await?;
        assert_eq!(
            response.status(),
            StatusCode::NOT_FOUND,
            "Expected 404 for /apps/nonexistent/{endpoint}"
        );
    }

    Ok(())
}

/// Tests that only the SSO and login endpoints exist under an app.
#[tokio::test]
async fn test_no_metadata_endpoint() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env.client.get(env.app_url("demo", "metadata")).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Tests that a redirect binding request is inflated and relayed to login.
#[tokio::test]
async fn test_sso_redirect_binding() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let url = HttpRedirectBinding::encode_request(
        AUTHN_REQUEST,
        &env.app_url("demo", "sso"),
        Some("rs-1"),
    )?;
    let response = env.client.get(&url).send().await?;
    assert_eq!(response.status(), StatusCode::FOUND);

    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(location.starts_with("/apps/demo/login?"), "got {location}");

    let relayed = url::Url::parse(&format!("{}{}", env.base_url, location))?;
    let pairs: Vec<(String, String)> = relayed.query_pairs().into_owned().collect();
    let saml_request = pairs
        .iter()
        .find(|(k, _)| k == "SAMLRequest")
        .map(|(_, v)| v.as_str())
        .unwrap_or("");
    assert_eq!(decode_base64(saml_request)?, AUTHN_REQUEST.as_bytes());
    assert!(pairs.contains(&("RelayState".to_string(), "rs-1".to_string())));

    Ok(())
}

/// Tests that an undecodable redirect request is rejected.
#[tokio::test]
async fn test_sso_redirect_garbage() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .client
        .get(env.app_url("demo", "sso"))
        .query(&[("SAMLRequest", "!!!not-base64!!!")])
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Tests that a POST binding request is relayed to login unchanged.
#[tokio::test]
async fn test_sso_post_binding() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let encoded = encode_base64(AUTHN_REQUEST);
    let response = env
        .client
        .post(env.app_url("demo", "sso"))
        .form(&[("SAMLRequest", encoded.as_str()), ("RelayState", "rs-2")])
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::FOUND);

    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let relayed = url::Url::parse(&format!("{}{}", env.base_url, location))?;
    let saml_request = relayed
        .query_pairs()
        .find(|(k, _)| k == "SAMLRequest")
        .map(|(_, v)| v.into_owned());
    assert_eq!(saml_request.as_deref(), Some(encoded.as_str()));

    Ok(())
}

/// Tests that the login page renders for a registered app.
#[tokio::test]
async fn test_login_page() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env.client.get(env.app_url("demo", "login")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    let html = response.text().await?;
    assert!(html.contains("Sign in to Demo SP"));
    assert!(html.contains("IdP-initiated"));

    Ok(())
}

/// Tests that a blank identity field re-renders the form.
#[tokio::test]
async fn test_login_missing_field() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .client
        .post(env.app_url("demo", "login"))
        .form(&[("email", "alice@example.com"), ("first_name", "Alice")])
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await?.contains("Last name is required"));

    Ok(())
}

/// Tests the SP-initiated flow end to end, including the signature.
#[tokio::test]
async fn test_sp_initiated_login_is_signed() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let (xml, html) = login(&env, Some(&encode_base64(AUTHN_REQUEST)), Some("rs-3")).await?;

    // Delivered to the requested ACS with the relay state
    assert!(html.contains(r#"action="https://sp.example.com/acs""#));
    assert_eq!(hidden_field(&html, "RelayState"), Some("rs-3"));

    assert!(xml.contains(r#"Destination="https://sp.example.com/acs""#));
    assert!(xml.contains(r#"InResponseTo="_req123""#));
    assert!(xml.contains(">alice@example.com</saml2:NameID>"));
    assert!(xml.contains("<saml2:AttributeValue>O'Brien</saml2:AttributeValue>"));
    assert!(xml.contains("<saml2:Audience>https://sp.example.com</saml2:Audience>"));

    // Digest covers the assertion without its signature
    let assertion =
        element(&xml, "saml2:Assertion").ok_or_else(|| anyhow::anyhow!("no assertion"))?;
    let signature =
        element(assertion, "ds:Signature").ok_or_else(|| anyhow::anyhow!("no signature"))?;
    let unsigned = assertion.replacen(signature, "", 1);
    assert_eq!(
        text_of(&xml, "ds:DigestValue"),
        Some(encode_base64(sha256(unsigned.as_bytes())).as_str())
    );

    // Signature covers SignedInfo
    let signed_info =
        element(&xml, "ds:SignedInfo").ok_or_else(|| anyhow::anyhow!("no SignedInfo"))?;
    let signature_value = decode_base64(text_of(&xml, "ds:SignatureValue").unwrap_or(""))?;
    assert!(rsa_verify_sha256(
        &test_public_key()?,
        signed_info.as_bytes(),
        &signature_value
    ));

    Ok(())
}

/// Tests the IdP-initiated flow: no request, registration decides the target.
#[tokio::test]
async fn test_idp_initiated_login() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let (first, html) = login(&env, None, None).await?;
    let (second, _) = login(&env, None, None).await?;

    assert!(html.contains(r#"action="https://sp.example.com/acs""#));
    assert_eq!(hidden_field(&html, "RelayState"), None);
    assert!(first.contains("<saml2:Audience>https://sp.example.com</saml2:Audience>"));

    // Every response gets its own IDs
    let id_of = |xml: &str| {
        let start = xml.find(r#" ID=""#).map_or(0, |i| i + 5);
        xml[start..].split('"').next().unwrap_or("").to_string()
    };
    assert!(id_of(&first).starts_with('_'));
    assert_ne!(id_of(&first), id_of(&second));

    Ok(())
}
