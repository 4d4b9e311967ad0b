//! Shared fixtures for unit tests.

use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use tidp_crypto::{CryptoError, CryptoProvider, RsaSigningKey};

use crate::types::{AssertionData, AssertionDataBuilder, Certificate};

pub const TEST_KEY_PEM: &str = include_str!("../../tidp-crypto/testdata/test-key.pem");
pub const TEST_CERT_PEM: &str = include_str!("../../tidp-crypto/testdata/test-cert.pem");
pub const TEST_CERT_BODY_PREFIX: &str = "MIIDGzCCAgOgAwIBAgIU";

/// The `_a1` / `_r1` / `_req123` scenario.
pub fn sample_data() -> AssertionData {
    sample_builder().build().unwrap()
}

/// Builder preloaded with [`sample_data`], for tests that vary one field.
pub fn sample_builder() -> AssertionDataBuilder {
    AssertionData::builder()
        .assertion_id("_a1")
        .response_id("_r1")
        .idp_entity_id("https://idp.example")
        .sp_entity_id("https://sp.example")
        .sp_acs_url("https://sp.example/acs")
        .subject_id("alice@example.com")
        .first_name("Alice")
        .last_name("Example")
        .session_id("_req123")
        .now(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .expire(Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap())
}

pub fn test_key() -> RsaSigningKey {
    RsaSigningKey::from_pem(TEST_KEY_PEM).unwrap()
}

pub fn test_certificate() -> Certificate {
    Certificate::from_pem(TEST_CERT_PEM).unwrap()
}

/// Deterministic provider that records every input it signs.
///
/// Digests are the input length as a single byte; signatures are `signed`.
#[derive(Default)]
pub struct RecordingProvider {
    fail_signing: bool,
    signed: Mutex<Vec<Vec<u8>>>,
}

impl RecordingProvider {
    pub fn failing() -> Self {
        Self {
            fail_signing: true,
            ..Self::default()
        }
    }

    pub fn signed_inputs(&self) -> Vec<Vec<u8>> {
        self.signed.lock().unwrap().clone()
    }
}

impl CryptoProvider for RecordingProvider {
    type Key = ();

    fn digest(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(vec![(data.len() % 256) as u8])
    }

    fn sign(&self, _key: &(), data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if self.fail_signing {
            return Err(CryptoError::Signing("hardware token unplugged".to_string()));
        }
        self.signed.lock().unwrap().push(data.to_vec());
        Ok(b"signed".to_vec())
    }

    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, CryptoError> {
        Ok(vec![0xab; len])
    }
}

/// A parsed start (or empty) element.
#[derive(Debug, Clone)]
pub struct ParsedElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl ParsedElement {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parses `xml` strictly, returning every element and every text node.
pub fn parse(xml: &str) -> (Vec<ParsedElement>, Vec<String>) {
    let mut reader = Reader::from_str(xml);
    let mut elements = Vec::new();
    let mut texts = Vec::new();

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) => {
                let attributes = e
                    .attributes()
                    .map(|a| {
                        let a = a.unwrap();
                        (
                            String::from_utf8(a.key.as_ref().to_vec()).unwrap(),
                            a.unescape_value().unwrap().into_owned(),
                        )
                    })
                    .collect();
                elements.push(ParsedElement {
                    name: String::from_utf8(e.name().as_ref().to_vec()).unwrap(),
                    attributes,
                });
            }
            Event::Text(t) => texts.push(t.unescape().unwrap().into_owned()),
            Event::Eof => break,
            _ => {}
        }
    }

    (elements, texts)
}

pub fn elements_named<'a>(elements: &'a [ParsedElement], name: &str) -> Vec<&'a ParsedElement> {
    elements.iter().filter(|e| e.name == name).collect()
}
