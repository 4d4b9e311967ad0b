//! SAML bindings implementation.
//!
//! - **HTTP-POST Binding** - messages are base64-encoded and sent in HTML forms
//! - **HTTP-Redirect Binding** - messages are deflated, base64-encoded and
//!   URL-encoded into the query string
//!
//! Requests arrive over either binding; responses always leave over POST.

mod post;
mod redirect;

pub use post::*;
pub use redirect::*;

fn xml_from_utf8(bytes: Vec<u8>) -> crate::SamlResult<String> {
    String::from_utf8(bytes).map_err(|e| {
        crate::SamlError::InvalidRequest(format!("Invalid UTF-8 in message: {e}"))
    })
}
