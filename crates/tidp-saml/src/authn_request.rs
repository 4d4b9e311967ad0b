//! Incoming `AuthnRequest` parsing.
//!
//! Only the fields needed to address a response are extracted. The request
//! signature, if any, is not checked.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{SamlError, SamlResult};

/// The parts of an `AuthnRequest` the response depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthnRequestInfo {
    /// Request ID, echoed as `InResponseTo`.
    pub id: String,
    /// Entity ID of the requesting service provider.
    pub issuer: Option<String>,
    /// Where the SP wants the response posted.
    pub assertion_consumer_service_url: Option<String>,
}

/// Parses an `AuthnRequest` document.
///
/// The root element must be `AuthnRequest` (any namespace prefix) carrying
/// an `ID`. `Issuer` is read from the root's direct children.
///
/// # Errors
///
/// Returns [`SamlError::XmlParse`] for malformed XML and
/// [`SamlError::InvalidRequest`] if the root or its `ID` is missing.
pub fn parse_authn_request(xml: &str) -> SamlResult<AuthnRequestInfo> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut info: Option<AuthnRequestInfo> = None;
    let mut depth = 0usize;
    let mut in_issuer = false;
    let mut issuer = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match depth {
                    1 => info = Some(read_root(&e)?),
                    2 if e.local_name().as_ref() == b"Issuer" => in_issuer = true,
                    _ => {}
                }
            }
            Event::Empty(e) if depth == 0 => {
                info = Some(read_root(&e)?);
            }
            Event::Text(t) if in_issuer => issuer.push_str(&t.unescape()?),
            Event::End(_) => {
                if depth == 2 {
                    in_issuer = false;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut info =
        info.ok_or_else(|| SamlError::InvalidRequest("document has no root element".to_string()))?;
    let issuer = issuer.trim();
    if !issuer.is_empty() {
        info.issuer = Some(issuer.to_string());
    }
    Ok(info)
}

fn read_root(element: &BytesStart<'_>) -> SamlResult<AuthnRequestInfo> {
    if element.local_name().as_ref() != b"AuthnRequest" {
        return Err(SamlError::InvalidRequest(format!(
            "expected AuthnRequest, found {}",
            String::from_utf8_lossy(element.name().as_ref())
        )));
    }

    let mut info = AuthnRequestInfo::default();
    for attr in element.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.local_name().as_ref() {
            b"ID" => info.id = value,
            b"AssertionConsumerServiceURL" => info.assertion_consumer_service_url = Some(value),
            _ => {}
        }
    }

    if info.id.trim().is_empty() {
        return Err(SamlError::InvalidRequest(
            "AuthnRequest has no ID".to_string(),
        ));
    }
    Ok(info)
}
