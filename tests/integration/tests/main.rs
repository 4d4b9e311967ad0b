//! End-to-End Integration Tests
//!
//! These tests run the complete test IdP on a local port and drive it
//! over HTTP the way a browser and a service provider would.

mod common;
mod saml_endpoints;
