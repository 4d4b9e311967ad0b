//! Single Sign-On entry point.
//!
//! Service providers send their `AuthnRequest` here over either binding. The
//! request is not answered directly: it is normalized to plain base64 and the
//! browser is sent on to the login page, which carries it through the form.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tidp_crypto::encode_base64;
use tidp_saml::bindings::HttpRedirectBinding;
use tidp_saml::SamlError;

use crate::pages::error_page;
use crate::state::AppState;

/// Query parameters of the HTTP-Redirect binding.
#[derive(Debug, Default, Deserialize)]
pub struct SsoRedirectParams {
    /// Deflated, base64 `AuthnRequest`.
    #[serde(rename = "SAMLRequest")]
    pub saml_request: Option<String>,
    /// Opaque SP state.
    #[serde(rename = "RelayState")]
    pub relay_state: Option<String>,
}

/// Form fields of the HTTP-POST binding.
#[derive(Debug, Default, Deserialize)]
pub struct SsoPostForm {
    /// Base64 `AuthnRequest`.
    #[serde(rename = "SAMLRequest")]
    pub saml_request: Option<String>,
    /// Opaque SP state.
    #[serde(rename = "RelayState")]
    pub relay_state: Option<String>,
}

/// GET handler: inflates the request and relays it to the login page.
pub async fn sso_redirect(
    State(state): State<AppState>,
    Path(app_id): Path<String>,
    Query(params): Query<SsoRedirectParams>,
) -> Response {
    match relay_redirect(&state, &app_id, &params) {
        Ok(location) => found(&location),
        Err(e) => error_page(&e),
    }
}

/// POST handler: relays the form fields to the login page unchanged.
pub async fn sso_post(
    State(state): State<AppState>,
    Path(app_id): Path<String>,
    Form(form): Form<SsoPostForm>,
) -> Response {
    if let Err(e) = state.app(&app_id) {
        return error_page(&e);
    }
    tracing::debug!(app = %app_id, "Relaying POST binding request to login");
    found(&login_location(
        &app_id,
        form.saml_request.as_deref(),
        form.relay_state.as_deref(),
    ))
}

fn relay_redirect(
    state: &AppState,
    app_id: &str,
    params: &SsoRedirectParams,
) -> Result<String, SamlError> {
    state.app(app_id)?;

    let saml_request = match params.saml_request.as_deref() {
        Some(encoded) => {
            let xml = HttpRedirectBinding::decode(encoded)?;
            Some(encode_base64(xml))
        }
        None => None,
    };

    tracing::debug!(
        app = %app_id,
        sp_initiated = saml_request.is_some(),
        "Relaying redirect binding request to login"
    );
    Ok(login_location(
        app_id,
        saml_request.as_deref(),
        params.relay_state.as_deref(),
    ))
}

/// Builds `/apps/{id}/login` with the request carried in the query string.
pub fn login_location(app_id: &str, saml_request: Option<&str>, relay_state: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(req) = saml_request {
        query.append_pair("SAMLRequest", req);
    }
    if let Some(rs) = relay_state {
        query.append_pair("RelayState", rs);
    }
    let query = query.finish();

    if query.is_empty() {
        format!("/apps/{app_id}/login")
    } else {
        format!("/apps/{app_id}/login?{query}")
    }
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
