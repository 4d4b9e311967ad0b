//! Per-request assertion input.
//!
//! [`AssertionData`] carries everything the signing pipeline interpolates
//! into the `Assertion` and `Response`. It can only be obtained through
//! [`AssertionDataBuilder::build`], which validates eagerly so that the
//! pipeline never signs a structurally broken document.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{SamlError, SamlResult};

/// Formats an instant as `xs:dateTime` in UTC with second precision,
/// e.g. `2024-01-01T00:00:00Z`.
#[must_use]
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Immutable input for one signed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionData {
    assertion_id: String,
    response_id: String,
    idp_entity_id: String,
    sp_entity_id: String,
    sp_acs_url: String,
    subject_id: String,
    first_name: String,
    last_name: String,
    session_id: String,
    now: DateTime<Utc>,
    expire: DateTime<Utc>,
}

impl AssertionData {
    /// Starts building assertion data.
    #[must_use]
    pub fn builder() -> AssertionDataBuilder {
        AssertionDataBuilder::default()
    }

    /// The `ID` of the `Assertion` element.
    #[must_use]
    pub fn assertion_id(&self) -> &str {
        &self.assertion_id
    }

    /// The `ID` of the `Response` element.
    #[must_use]
    pub fn response_id(&self) -> &str {
        &self.response_id
    }

    /// Entity ID of this identity provider, emitted as `Issuer`.
    #[must_use]
    pub fn idp_entity_id(&self) -> &str {
        &self.idp_entity_id
    }

    /// Entity ID of the service provider, emitted as `Audience`.
    #[must_use]
    pub fn sp_entity_id(&self) -> &str {
        &self.sp_entity_id
    }

    /// Assertion Consumer Service URL of the service provider.
    #[must_use]
    pub fn sp_acs_url(&self) -> &str {
        &self.sp_acs_url
    }

    /// Subject identifier, typically an email address.
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Subject's first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Subject's last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// ID of the request being answered, emitted as `InResponseTo`.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Issue instant.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Expiry instant (exclusive).
    #[must_use]
    pub const fn expire(&self) -> DateTime<Utc> {
        self.expire
    }

    /// Issue instant as `xs:dateTime`.
    #[must_use]
    pub fn issue_instant(&self) -> String {
        format_instant(&self.now)
    }

    /// Expiry instant as `xs:dateTime`.
    #[must_use]
    pub fn not_on_or_after(&self) -> String {
        format_instant(&self.expire)
    }
}

/// Builder for [`AssertionData`].
#[derive(Debug, Clone, Default)]
pub struct AssertionDataBuilder {
    assertion_id: Option<String>,
    response_id: Option<String>,
    idp_entity_id: Option<String>,
    sp_entity_id: Option<String>,
    sp_acs_url: Option<String>,
    subject_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    session_id: Option<String>,
    now: Option<DateTime<Utc>>,
    expire: Option<DateTime<Utc>>,
}

impl AssertionDataBuilder {
    /// Sets the assertion ID.
    #[must_use]
    pub fn assertion_id(mut self, id: impl Into<String>) -> Self {
        self.assertion_id = Some(id.into());
        self
    }

    /// Sets the response ID.
    #[must_use]
    pub fn response_id(mut self, id: impl Into<String>) -> Self {
        self.response_id = Some(id.into());
        self
    }

    /// Sets the IdP entity ID.
    #[must_use]
    pub fn idp_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.idp_entity_id = Some(entity_id.into());
        self
    }

    /// Sets the SP entity ID.
    #[must_use]
    pub fn sp_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.sp_entity_id = Some(entity_id.into());
        self
    }

    /// Sets the SP Assertion Consumer Service URL.
    #[must_use]
    pub fn sp_acs_url(mut self, url: impl Into<String>) -> Self {
        self.sp_acs_url = Some(url.into());
        self
    }

    /// Sets the subject identifier.
    #[must_use]
    pub fn subject_id(mut self, subject: impl Into<String>) -> Self {
        self.subject_id = Some(subject.into());
        self
    }

    /// Sets the first name.
    #[must_use]
    pub fn first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Sets the ID of the request being answered.
    #[must_use]
    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Sets the issue instant.
    #[must_use]
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Sets the expiry instant.
    #[must_use]
    pub fn expire(mut self, expire: DateTime<Utc>) -> Self {
        self.expire = Some(expire);
        self
    }

    /// Validates and builds the assertion data.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::MalformedInput`] if a field is missing or blank,
    /// if an element ID is not a valid `xs:ID`, or if `expire` is not after
    /// `now`.
    pub fn build(self) -> SamlResult<AssertionData> {
        let assertion_id = require_id("assertion_id", self.assertion_id)?;
        let response_id = require_id("response_id", self.response_id)?;
        if assertion_id == response_id {
            return Err(SamlError::MalformedInput(
                "assertion_id and response_id must differ".to_string(),
            ));
        }

        let now = self
            .now
            .ok_or_else(|| SamlError::MalformedInput("now is required".to_string()))?;
        let expire = self
            .expire
            .ok_or_else(|| SamlError::MalformedInput("expire is required".to_string()))?;
        if expire <= now {
            return Err(SamlError::MalformedInput(format!(
                "expire ({}) must be after now ({})",
                format_instant(&expire),
                format_instant(&now)
            )));
        }

        Ok(AssertionData {
            assertion_id,
            response_id,
            idp_entity_id: require("idp_entity_id", self.idp_entity_id)?,
            sp_entity_id: require("sp_entity_id", self.sp_entity_id)?,
            sp_acs_url: require("sp_acs_url", self.sp_acs_url)?,
            subject_id: require("subject_id", self.subject_id)?,
            first_name: require("first_name", self.first_name)?,
            last_name: require("last_name", self.last_name)?,
            session_id: require("session_id", self.session_id)?,
            now,
            expire,
        })
    }
}

fn require(field: &str, value: Option<String>) -> SamlResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SamlError::MalformedInput(format!("{field} is required"))),
    }
}

/// Requires a value usable as an XML `ID` attribute (an NCName).
fn require_id(field: &str, value: Option<String>) -> SamlResult<String> {
    let id = require(field, value)?;

    let mut chars = id.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic());
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid_start && valid_rest {
        Ok(id)
    } else {
        Err(SamlError::MalformedInput(format!(
            "{field} '{id}' is not a valid XML ID"
        )))
    }
}
