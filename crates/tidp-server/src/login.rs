//! Login page and SSO completion.
//!
//! The login form accepts any identity. Submitting it issues a signed SAML
//! response for that identity and auto-posts it to the service provider.
//! Without a `SAMLRequest` the response is unsolicited (IdP-initiated).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use chrono::Utc;
use serde::Deserialize;
use tidp_crypto::CryptoProvider;
use tidp_saml::bindings::HttpPostBinding;
use tidp_saml::{encode_assertion, parse_authn_request, AssertionData, SamlError};

use crate::apps::AppConfig;
use crate::pages::{error_page, render_page, LoginTemplate};
use crate::state::AppState;

/// Query parameters of the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    /// Base64 `AuthnRequest` relayed from the SSO endpoint.
    #[serde(rename = "SAMLRequest")]
    pub saml_request: Option<String>,
    /// Opaque SP state.
    #[serde(rename = "RelayState")]
    pub relay_state: Option<String>,
}

/// Form data for login submission.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    /// Subject email, used as `NameID` and the `email` attribute.
    #[serde(default)]
    pub email: String,
    /// Subject first name.
    #[serde(default)]
    pub first_name: String,
    /// Subject last name.
    #[serde(default)]
    pub last_name: String,
    /// Base64 `AuthnRequest`, absent for IdP-initiated logins.
    #[serde(rename = "SAMLRequest")]
    pub saml_request: Option<String>,
    /// Opaque SP state.
    #[serde(rename = "RelayState")]
    pub relay_state: Option<String>,
}

/// Where and to whom a response is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResponseTarget {
    session_id: String,
    sp_entity_id: String,
    acs_url: String,
}

/// Shows the login page.
pub async fn login_page(
    State(state): State<AppState>,
    Path(app_id): Path<String>,
    Query(params): Query<LoginParams>,
) -> Response {
    let app = match state.app(&app_id) {
        Ok(app) => app,
        Err(e) => return error_page(&e),
    };

    let template = login_template(
        app,
        params.saml_request,
        params.relay_state,
        LoginForm::default(),
        None,
    );
    render_page(&template, StatusCode::OK)
}

/// Handles login form submission.
pub async fn login_submit(
    State(state): State<AppState>,
    Path(app_id): Path<String>,
    Form(form): Form<LoginForm>,
) -> Response {
    let app = match state.app(&app_id) {
        Ok(app) => app,
        Err(e) => return error_page(&e),
    };

    if let Some(missing) = missing_field(&form) {
        let saml_request = form.saml_request.clone();
        let relay_state = form.relay_state.clone();
        let template = login_template(
            app,
            saml_request,
            relay_state,
            form,
            Some(format!("{missing} is required")),
        );
        return render_page(&template, StatusCode::UNPROCESSABLE_ENTITY);
    }

    match issue_response(&state, app, &form) {
        Ok((saml_response, acs_url)) => Html(HttpPostBinding::response_form(
            &saml_response,
            &acs_url,
            form.relay_state.as_deref(),
        ))
        .into_response(),
        Err(e) => error_page(&e),
    }
}

fn login_template(
    app: &AppConfig,
    saml_request: Option<String>,
    relay_state: Option<String>,
    form: LoginForm,
    error: Option<String>,
) -> LoginTemplate {
    LoginTemplate {
        app_name: app.name.clone(),
        sp_entity_id: app.sp_entity_id.clone(),
        action_url: format!("/apps/{}/login", app.id),
        idp_initiated: saml_request.is_none(),
        saml_request,
        relay_state,
        email: form.email,
        first_name: form.first_name,
        last_name: form.last_name,
        error,
    }
}

fn missing_field(form: &LoginForm) -> Option<&'static str> {
    [
        ("Email", &form.email),
        ("First name", &form.first_name),
        ("Last name", &form.last_name),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())
    .map(|(label, _)| label)
}

/// Builds, signs and encodes the response. Returns it with the ACS URL.
fn issue_response(
    state: &AppState,
    app: &AppConfig,
    form: &LoginForm,
) -> Result<(String, String), SamlError> {
    let target = resolve_target(state, app, form.saml_request.as_deref())?;

    let now = Utc::now();
    let expire = state
        .config
        .assertion_lifetime()
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| SamlError::MalformedInput("assertion lifetime out of range".to_string()))?;
    let data = AssertionData::builder()
        .assertion_id(state.crypto.new_random_id()?)
        .response_id(state.crypto.new_random_id()?)
        .idp_entity_id(state.config.idp_entity_id(&app.id))
        .sp_entity_id(&target.sp_entity_id)
        .sp_acs_url(&target.acs_url)
        .subject_id(form.email.trim())
        .first_name(form.first_name.trim())
        .last_name(form.last_name.trim())
        .session_id(&target.session_id)
        .now(now)
        .expire(expire)
        .build()?;

    let saml_response = encode_assertion(
        &state.crypto,
        state.signing_key.as_ref(),
        state.certificate.as_ref(),
        &data,
    )?;
    Ok((saml_response, target.acs_url))
}

/// Determines `InResponseTo`, audience and ACS for the response.
///
/// SP-initiated logins answer the parsed request, falling back to the app's
/// registration for fields the request omits. IdP-initiated logins use the
/// registration and a fresh session ID.
fn resolve_target(
    state: &AppState,
    app: &AppConfig,
    saml_request: Option<&str>,
) -> Result<ResponseTarget, SamlError> {
    let Some(encoded) = saml_request.filter(|s| !s.trim().is_empty()) else {
        tracing::info!(app = %app.id, "IdP-initiated login");
        return Ok(ResponseTarget {
            session_id: state.crypto.new_random_id()?,
            sp_entity_id: app.sp_entity_id.clone(),
            acs_url: app.sp_acs_url.clone(),
        });
    };

    let xml = HttpPostBinding::decode(encoded)?;
    let request = parse_authn_request(&xml)?;

    if let Some(acs) = request.assertion_consumer_service_url.as_deref() {
        if acs != app.sp_acs_url {
            tracing::warn!(
                app = %app.id,
                requested = %acs,
                registered = %app.sp_acs_url,
                "AuthnRequest asks for an unregistered ACS URL"
            );
        }
    }

    tracing::info!(
        app = %app.id,
        request_id = %request.id,
        issuer = request.issuer.as_deref().unwrap_or("-"),
        "SP-initiated login"
    );
    Ok(ResponseTarget {
        session_id: request.id,
        sp_entity_id: request
            .issuer
            .unwrap_or_else(|| app.sp_entity_id.clone()),
        acs_url: request
            .assertion_consumer_service_url
            .unwrap_or_else(|| app.sp_acs_url.clone()),
    })
}
