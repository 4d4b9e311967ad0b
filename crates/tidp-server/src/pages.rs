//! HTML pages: the login form and the SAML error page.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use tidp_saml::SamlError;

/// Login page template.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    /// Application display name.
    pub app_name: String,
    /// Audience the response will be issued for.
    pub sp_entity_id: String,
    /// Form action URL.
    pub action_url: String,
    /// Base64 `AuthnRequest` carried through the form.
    pub saml_request: Option<String>,
    /// Relay state carried through the form.
    pub relay_state: Option<String>,
    /// True when no `AuthnRequest` accompanies the login.
    pub idp_initiated: bool,
    /// Prefilled email.
    pub email: String,
    /// Prefilled first name.
    pub first_name: String,
    /// Prefilled last name.
    pub last_name: String,
    /// Error message to display.
    pub error: Option<String>,
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    message: &'a str,
    status_code: &'a str,
}

/// Renders a template into an HTML response with the given status.
pub fn render_page(template: &impl Template, status: StatusCode) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template render error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Creates an error response for SAML errors.
pub fn error_page(err: &SamlError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        tracing::error!(error = %err, "SAML request failed");
    } else {
        tracing::warn!(error = %err, "SAML request rejected");
    }

    let message = err.to_string();
    render_page(
        &ErrorTemplate {
            message: &message,
            status_code: err.status_code(),
        },
        status,
    )
}
